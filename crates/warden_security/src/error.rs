//! # Error Types
//!
//! Errors surfaced by the detection engine. None of them are fatal to the
//! host: configuration errors stop a load, session errors are logged, input
//! rejections drop a sample.

use thiserror::Error;

use crate::source::PlayerId;

/// Errors while loading or validating [`crate::WardenConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written back out.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value `{key}`: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure reported by the host session layer for a kick or ban.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The player is no longer connected.
    #[error("player {0} is not connected")]
    NotConnected(PlayerId),

    /// The session layer refused the action.
    #[error("session layer rejected {action} for player {player}: {reason}")]
    Rejected {
        /// `"kick"` or `"ban"`.
        action: &'static str,
        /// Target player.
        player: PlayerId,
        /// Host-supplied reason.
        reason: String,
    },
}

/// A raw input sample that failed sanity checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputRejection {
    /// Yaw or pitch is NaN or infinite.
    #[error("non-finite view angles (yaw {yaw}, pitch {pitch})")]
    NonFiniteAngles {
        /// Reported yaw.
        yaw: f32,
        /// Reported pitch.
        pitch: f32,
    },

    /// Position has a NaN or infinite component.
    #[error("non-finite position")]
    NonFinitePosition,

    /// The button mask carries bits no client sends.
    #[error("unknown movement buttons {bits:#x}")]
    UnknownButtons {
        /// Offending bits.
        bits: u32,
    },

    /// The player moved further than any legal movement allows.
    #[error("implausible displacement {distance:.2}m (allowed {allowed:.2}m)")]
    ImplausibleDisplacement {
        /// Distance from the server-side position.
        distance: f32,
        /// Maximum legal distance for the elapsed time.
        allowed: f32,
    },
}
