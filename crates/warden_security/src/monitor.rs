//! # Monitor
//!
//! Entry points the host calls: one per tick per player, and one per game
//! event. Every detection funnels into [`Monitor::report_violation`].
//!
//! ## Event Flow
//!
//! ```text
//! tick ──────► kinematic ─────────────┐
//!          └─► record lock ─┬ wall    │
//!                           ├ track   ├──► report_violation ──► ledger
//!                           └ aim     │          │
//! hit / gather / input ───────────────┘          └──► escalation ──► host
//! ```
//!
//! Heuristics run under the player's record lock and only return what they
//! found. The lock is released before anything is reported.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::combat::{
    self, FiredProjectile, MeleeHit, ProjectileHit, ProjectileRegistry, TrackedProjectile,
};
use crate::config::WardenConfig;
use crate::error::{ConfigResult, InputRejection};
use crate::escalation::{EscalationAction, EscalationPolicy, SessionControl};
use crate::heuristics::input::{self, InputSample};
use crate::heuristics::{aim_snap, gather, kinematic, tracking, wall_trace};
use crate::ledger::{OverallSummary, PlayerSummary, ViolationLedger};
use crate::report::{self, ReportSink};
use crate::source::{GeometrySource, PlayerId, PlayerSnapshot, Timestamp};
use crate::violation::{Violation, ViolationKind};

/// A reported violation and what it led to.
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    /// What was detected.
    pub violation: Violation,
    /// Escalation taken for it.
    pub action: EscalationAction,
}

/// The detection engine bound to one host.
pub struct Monitor<G: GeometrySource + ?Sized, S: SessionControl + ?Sized> {
    config: Arc<WardenConfig>,
    geometry: Arc<G>,
    session: Arc<S>,
    ledger: ViolationLedger,
    policy: EscalationPolicy,
    projectiles: Mutex<ProjectileRegistry>,
}

impl<G: GeometrySource + ?Sized, S: SessionControl + ?Sized> Monitor<G, S> {
    /// Creates a monitor over the host's geometry and session layer.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] if `config` fails validation.
    pub fn new(config: WardenConfig, geometry: Arc<G>, session: Arc<S>) -> ConfigResult<Self> {
        config.validate()?;
        tracing::debug!(
            ban_after = config.violations_before_ban,
            kick = config.kick_on_violation,
            "WARDEN monitor started"
        );
        Ok(Self {
            ledger: ViolationLedger::new(config.max_history_entries),
            policy: EscalationPolicy::from_config(&config),
            config: Arc::new(config),
            geometry,
            session,
            projectiles: Mutex::new(ProjectileRegistry::new()),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    /// Host geometry source.
    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Host session layer.
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &ViolationLedger {
        &self.ledger
    }

    // =========================================================================
    // TICK - Per-player heuristics
    // =========================================================================

    /// Runs every per-tick heuristic for one player.
    ///
    /// Unknown, disconnected and sleeping players are skipped. Stale
    /// projectiles are swept for every attacker regardless.
    pub fn on_player_tick(&self, id: PlayerId) -> Vec<Finding> {
        let now = self.geometry.now();
        self.expire_projectiles(now);
        let Some(player) = self.active_player(id) else {
            return Vec::new();
        };
        let config = &*self.config;
        let geometry = &*self.geometry;

        let mut detections = Vec::new();
        detections.extend(kinematic::check_speed(&player, config));
        detections.extend(kinematic::check_fly(&player, config, geometry));

        self.ledger.with_record(id, now, |record| {
            detections.extend(wall_trace::check(record, &player, config, geometry, now));
            detections.extend(tracking::check(record, &player, config, geometry, now));
            detections.extend(aim_snap::check(record, &player, config, now));
        });

        self.report_all(&player, detections)
    }

    // =========================================================================
    // EVENTS - Host callbacks
    // =========================================================================

    /// Starts tracking a projectile the attacker just fired.
    pub fn on_projectile_fired(&self, attacker: PlayerId, fired: FiredProjectile) {
        let Some(player) = self.geometry.player(attacker) else {
            tracing::debug!(attacker, "Projectile from unknown player ignored");
            return;
        };
        let now = self.geometry.now();
        let mut projectiles = self.projectiles.lock();
        projectiles.expire(now, self.config.projectile_lifetime);
        projectiles.register(
            attacker,
            TrackedProjectile {
                fired,
                body_forward: player.body_forward,
                fired_at: now,
            },
        );
    }

    /// Validates a ranged hit against its tracked projectile.
    ///
    /// Hits from untracked projectiles are insufficient evidence and pass.
    pub fn on_projectile_hit(&self, attacker: PlayerId, hit: &ProjectileHit) -> Vec<Finding> {
        let Some(player) = self.geometry.player(attacker) else {
            return Vec::new();
        };
        if player.is_exempt() {
            return Vec::new();
        }
        let tracked = self.projectiles.lock().get(attacker, hit.projectile_id).copied();
        let Some(tracked) = tracked else {
            tracing::debug!(attacker, projectile = hit.projectile_id, "Untracked projectile hit");
            return Vec::new();
        };

        let violations = combat::validate_projectile_hit(
            &player,
            hit,
            &tracked,
            self.geometry.frame_timing(),
            &self.config,
        );
        self.report_all(&player, violations)
    }

    /// Validates a melee hit against the attacker's swing.
    pub fn on_melee_hit(&self, attacker: PlayerId, hit: &MeleeHit) -> Option<Finding> {
        let player = self.geometry.player(attacker)?;
        if player.is_exempt() {
            return None;
        }
        let victim = hit.victim.and_then(|id| self.geometry.player(id));
        let violation = combat::validate_melee_hit(
            &player,
            hit,
            victim.as_ref(),
            self.geometry.frame_timing(),
            &self.config,
        )?;
        let action = self.record(&player, &violation);
        Some(Finding { violation, action })
    }

    /// Caps a gather amount, reporting the player if it was over the cap.
    ///
    /// Returns the amount the host should grant.
    #[must_use]
    pub fn on_resource_gather(&self, player: PlayerId, item_kind: &str, amount: u32) -> u32 {
        let (granted, violation) = gather::check(amount, item_kind, &self.config);
        if let Some(violation) = violation {
            self.report_violation(player, violation);
        }
        granted
    }

    /// Sanity-checks one raw input sample.
    ///
    /// Displacement is measured from the host's current position for the
    /// player, over the time since their previous sample.
    ///
    /// # Errors
    ///
    /// Returns the [`InputRejection`] when the sample is dropped. It is also
    /// reported as an invalid-input violation if `report_invalid_input` is on.
    pub fn on_player_input(&self, id: PlayerId, sample: &InputSample) -> Result<(), InputRejection> {
        let Some(player) = self.geometry.player(id) else {
            return Ok(());
        };
        let now = self.geometry.now();
        let config = &*self.config;

        let result = self.ledger.with_record(id, now, |record| {
            let previous_at = record.last_input_at.replace(now);
            input::validate(
                sample,
                player.position,
                previous_at,
                now,
                player.is_exempt(),
                config,
            )
        });

        if let Err(rejection) = &result {
            tracing::warn!(player = id, name = %player.display_name, "Input rejected: {}", rejection);
            if config.report_invalid_input {
                let violation = Violation::new(
                    ViolationKind::InvalidInput,
                    format!("Invalid input: {rejection}"),
                );
                self.record(&player, &violation);
            }
        }
        result
    }

    // =========================================================================
    // REPORTING - The single ledger mutation path
    // =========================================================================

    /// Records a violation and escalates.
    ///
    /// The sole mutation path of the ledger. Unknown players are a no-op.
    pub fn report_violation(&self, id: PlayerId, violation: Violation) -> EscalationAction {
        match self.geometry.player(id) {
            Some(player) => self.record(&player, &violation),
            None => {
                tracing::debug!(player = id, "Violation for unknown player dropped");
                EscalationAction::None
            }
        }
    }

    fn record(&self, player: &PlayerSnapshot, violation: &Violation) -> EscalationAction {
        let now = self.geometry.now();
        let wall_clock = self.geometry.wall_clock();
        let policy = self.policy;
        let recorded = self
            .ledger
            .record_violation(player.id, now, wall_clock, violation, |count, banned| {
                policy.decide(count, banned)
            });

        if self.config.log_violations {
            tracing::info!(
                player = player.id,
                name = %player.display_name,
                kind = %violation.kind,
                count = recorded.violation_count,
                action = ?recorded.action,
                "WARDEN violation: {}",
                violation.description
            );
        }

        self.policy
            .enforce(&*self.session, player.id, recorded.action, &violation.description);
        recorded.action
    }

    fn report_all(&self, player: &PlayerSnapshot, violations: Vec<Violation>) -> Vec<Finding> {
        violations
            .into_iter()
            .map(|violation| {
                let action = self.record(player, &violation);
                Finding { violation, action }
            })
            .collect()
    }

    fn expire_projectiles(&self, now: Timestamp) {
        self.projectiles.lock().expire(now, self.config.projectile_lifetime);
    }

    fn active_player(&self, id: PlayerId) -> Option<PlayerSnapshot> {
        let player = self.geometry.player(id)?;
        (player.is_connected && !player.is_sleeping).then_some(player)
    }

    // =========================================================================
    // QUERIES - Operator tooling
    // =========================================================================

    /// One player's violations.
    #[must_use]
    pub fn player_summary(&self, id: PlayerId) -> Option<PlayerSummary> {
        self.ledger.player_summary(id)
    }

    /// Totals across all players.
    #[must_use]
    pub fn overall_summary(&self) -> OverallSummary {
        self.ledger.overall_summary()
    }

    /// Projectiles currently tracked, across all attackers.
    #[must_use]
    pub fn projectiles_in_flight(&self) -> usize {
        self.projectiles.lock().len()
    }

    /// Forgets a player entirely: record and in-flight projectiles.
    ///
    /// Returns whether a record existed.
    pub fn reset_player(&self, id: PlayerId) -> bool {
        self.projectiles.lock().forget(id);
        let existed = self.ledger.reset(id);
        tracing::info!(player = id, existed, "WARDEN record reset");
        existed
    }

    /// Writes the status command output: one player, or the totals.
    pub fn write_status<K: ReportSink + ?Sized>(&self, sink: &mut K, player: Option<PlayerId>) {
        match player {
            Some(id) => {
                let label = self
                    .geometry
                    .player(id)
                    .map_or_else(|| id.to_string(), |p| p.display_name);
                report::write_player_summary(sink, &label, self.player_summary(id).as_ref());
            }
            None => report::write_overall_summary(sink, &self.overall_summary()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockGeometrySource, MockSessionControl};
    use warden_shared::Vec3;

    fn monitor(config: WardenConfig) -> Monitor<MockGeometrySource, MockSessionControl> {
        Monitor::new(
            config,
            Arc::new(MockGeometrySource::new()),
            Arc::new(MockSessionControl::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WardenConfig {
            violations_before_ban: 0,
            ..WardenConfig::default()
        };
        let result = Monitor::new(
            config,
            Arc::new(MockGeometrySource::new()),
            Arc::new(MockSessionControl::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_tick_reports_speed_and_kicks() {
        let monitor = monitor(WardenConfig::default());
        let mut player = PlayerSnapshot::new(1, "runner", Vec3::ZERO);
        player.speed = 12.0;
        monitor.geometry().upsert_player(player);

        let findings = monitor.on_player_tick(1);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].violation.kind, ViolationKind::SpeedHack);
        assert_eq!(findings[0].action, EscalationAction::Kicked);
        assert_eq!(
            monitor.session().kicks(),
            vec![(1, "WARDEN: Speed hack detected: 12.00".to_owned())]
        );
    }

    #[test]
    fn test_sleeping_and_unknown_players_skipped() {
        let monitor = monitor(WardenConfig::default());
        let mut sleeper = PlayerSnapshot::new(1, "sleeper", Vec3::new(0.0, 50.0, 0.0));
        sleeper.is_sleeping = true;
        monitor.geometry().upsert_player(sleeper);

        assert!(monitor.on_player_tick(1).is_empty());
        assert!(monitor.on_player_tick(99).is_empty());
        assert!(monitor.ledger().is_empty());
    }

    #[test]
    fn test_report_for_unknown_player_is_noop() {
        let monitor = monitor(WardenConfig::default());
        let action = monitor.report_violation(5, Violation::new(ViolationKind::SpeedHack, "x"));
        assert_eq!(action, EscalationAction::None);
        assert!(monitor.player_summary(5).is_none());
    }

    #[test]
    fn test_write_status_uses_display_name() {
        let monitor = monitor(WardenConfig::default());
        monitor.geometry().upsert_player(PlayerSnapshot::new(3, "carol", Vec3::ZERO));

        let mut lines: Vec<String> = Vec::new();
        monitor.write_status(&mut lines, Some(3));
        monitor.write_status(&mut lines, Some(4));
        monitor.write_status(&mut lines, None);

        assert_eq!(lines[0], "No violations recorded for carol");
        assert_eq!(lines[1], "No violations recorded for 4");
        assert_eq!(lines[2], "WARDEN statistics:");
    }
}
