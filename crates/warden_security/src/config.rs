//! # Detection Configuration
//!
//! Thresholds and switches for every heuristic. Loaded once at startup from
//! TOML, validated, then shared read-only as `Arc<WardenConfig>`.
//!
//! Every key has a default, so a config file only lists what it overrides:
//!
//! ```toml
//! max_speed = 9.0
//! violations_before_ban = 5
//! kick_on_violation = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Process-wide detection configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    // ---------------------------------------------------------------------
    // Kinematics
    // ---------------------------------------------------------------------
    /// Maximum movement speed before a speedhack is reported (m/s).
    pub max_speed: f32,
    /// Maximum unsupported height above ground (metres).
    pub max_fly_height: f32,
    /// Largest single resource gather amount.
    pub max_resource_gather_rate: u32,
    /// Maximum input displacement per second of elapsed time (metres).
    pub max_tick_displacement: f32,
    /// Raise malformed input samples as violations.
    pub report_invalid_input: bool,

    // ---------------------------------------------------------------------
    // Escalation
    // ---------------------------------------------------------------------
    /// Kick on every violation below the ban threshold.
    pub kick_on_violation: bool,
    /// Violation count at which the player is banned.
    pub violations_before_ban: u32,
    /// Emit a log event per violation.
    pub log_violations: bool,
    /// History entries kept per player (oldest rotate out).
    pub max_history_entries: usize,

    // ---------------------------------------------------------------------
    // Visibility
    // ---------------------------------------------------------------------
    /// Minimum seconds between wall-trace passes for one player.
    pub wall_trace_check_interval: f64,
    /// Reach of the facing ray (metres).
    pub max_wall_trace_distance: f32,
    /// Occluded traces within the window before a violation.
    pub wall_traces_before_violation: u32,
    /// Seconds a tracked target is remembered.
    pub wall_trace_memory_duration: f64,
    /// Seconds of continuous aim on one target before a violation.
    pub tracking_dwell_threshold: f64,

    // ---------------------------------------------------------------------
    // Aim
    // ---------------------------------------------------------------------
    /// Angle between samples counted as a snap (degrees).
    pub suspicious_aim_snap_threshold: f32,
    /// Minimum seconds between aim samples.
    pub aim_snap_check_interval: f64,
    /// Snaps before a violation.
    pub required_snap_detections: u32,

    // ---------------------------------------------------------------------
    // Combat
    // ---------------------------------------------------------------------
    /// Upper clamp for the network desync time (seconds).
    pub max_desync_time: f32,
    /// Base of the ranged origin envelope (metres).
    pub projectile_origin_base_distance: f32,
    /// Movement allowance per envelope second for the ranged origin (m/s).
    pub projectile_origin_slack_speed: f32,
    /// Base of the ranged angle envelope (metres).
    pub projectile_angle_base_distance: f32,
    /// Angular tolerance of the ranged angle envelope (degrees).
    pub projectile_angle_tolerance: f32,
    /// Seconds an unhit projectile stays tracked.
    pub projectile_lifetime: f64,
    /// Base of the melee envelope (metres).
    pub melee_angle_base_distance: f32,
    /// Movement allowance per envelope second for melee (m/s).
    pub melee_slack_speed: f32,
    /// Extra melee slack against sleeping or wounded victims (metres).
    pub incapacitated_victim_bonus: f32,
    /// Reach below which a melee weapon counts as short (metres).
    pub short_reach_threshold: f32,
    /// Extra melee slack for short weapons (metres).
    pub short_reach_bonus: f32,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            max_speed: 7.5,
            max_fly_height: 10.0,
            max_resource_gather_rate: 100,
            max_tick_displacement: 10.0,
            report_invalid_input: true,

            kick_on_violation: true,
            violations_before_ban: 3,
            log_violations: true,
            max_history_entries: 100,

            wall_trace_check_interval: 0.5,
            max_wall_trace_distance: 300.0,
            wall_traces_before_violation: 5,
            wall_trace_memory_duration: 10.0,
            tracking_dwell_threshold: 5.0,

            suspicious_aim_snap_threshold: 60.0,
            aim_snap_check_interval: 0.1,
            required_snap_detections: 3,

            max_desync_time: 1.0,
            projectile_origin_base_distance: 1.0,
            projectile_origin_slack_speed: 5.5,
            projectile_angle_base_distance: 1.0,
            projectile_angle_tolerance: 3.0,
            projectile_lifetime: 8.0,
            melee_angle_base_distance: 0.5,
            melee_slack_speed: 5.5,
            incapacitated_victim_bonus: 1.0,
            short_reach_threshold: 1.5,
            short_reach_bonus: 0.5,
        }
    }
}

impl WardenConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded detection config from {}", path.display());
        Ok(config)
    }

    /// Serializes the config back to TOML (used to write out defaults).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        let distances = [
            ("max_speed", self.max_speed),
            ("max_fly_height", self.max_fly_height),
            ("max_tick_displacement", self.max_tick_displacement),
            ("max_wall_trace_distance", self.max_wall_trace_distance),
            ("suspicious_aim_snap_threshold", self.suspicious_aim_snap_threshold),
            ("projectile_origin_base_distance", self.projectile_origin_base_distance),
            ("projectile_angle_base_distance", self.projectile_angle_base_distance),
            ("melee_angle_base_distance", self.melee_angle_base_distance),
        ];
        for (key, value) in distances {
            positive(key, f64::from(value))?;
        }

        let non_negative = [
            ("max_desync_time", self.max_desync_time),
            ("projectile_origin_slack_speed", self.projectile_origin_slack_speed),
            ("projectile_angle_tolerance", self.projectile_angle_tolerance),
            ("melee_slack_speed", self.melee_slack_speed),
            ("incapacitated_victim_bonus", self.incapacitated_victim_bonus),
            ("short_reach_threshold", self.short_reach_threshold),
            ("short_reach_bonus", self.short_reach_bonus),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, format!("must be finite and >= 0, got {value}")));
            }
        }

        positive("wall_trace_memory_duration", self.wall_trace_memory_duration)?;
        positive("tracking_dwell_threshold", self.tracking_dwell_threshold)?;
        positive("projectile_lifetime", self.projectile_lifetime)?;
        for (key, value) in [
            ("wall_trace_check_interval", self.wall_trace_check_interval),
            ("aim_snap_check_interval", self.aim_snap_check_interval),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, format!("must be finite and >= 0, got {value}")));
            }
        }

        for (key, value) in [
            ("violations_before_ban", self.violations_before_ban),
            ("wall_traces_before_violation", self.wall_traces_before_violation),
            ("required_snap_detections", self.required_snap_detections),
        ] {
            if value == 0 {
                return Err(invalid(key, "must be at least 1".to_string()));
            }
        }

        if self.max_history_entries == 0 {
            return Err(invalid("max_history_entries", "must be at least 1".to_string()));
        }

        // Entries expire before they can fire otherwise.
        if self.tracking_dwell_threshold >= self.wall_trace_memory_duration {
            return Err(invalid(
                "tracking_dwell_threshold",
                format!(
                    "must be below wall_trace_memory_duration ({})",
                    self.wall_trace_memory_duration
                ),
            ));
        }

        Ok(())
    }
}

fn positive(key: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("must be finite and > 0, got {value}")))
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}
