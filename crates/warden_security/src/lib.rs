//! # WARDEN Security - The Watchtower
//!
//! Runtime anti-cheat for live multiplayer sessions.
//!
//! ## Features
//!
//! - **Violation Ledger**: Per-player counters, history and escalation state
//! - **Kinematic Checks**: Speedhack and flyhack
//! - **Visibility Checks**: Aiming through walls, sustained lock-on
//! - **Aim-Snap Detection**: Inhuman turn rates between samples
//! - **Combat Validation**: Desync-aware ranged and melee hit envelopes
//! - **Escalation**: Kick on violation, ban at the threshold
//!
//! ## Architecture
//!
//! ```text
//! HOST GAME                          WARDEN
//!     │                                │
//!     │─── tick / hit / gather ───────►│ Monitor
//!     │                                │   │
//!     │◄── raycast / snapshot / clock ─│   ├─► heuristics
//!     │                                │   │
//!     │                                │   ▼
//!     │                         ┌──────────────┐
//!     │                         │   Ledger     │
//!     │                         │ (per player) │
//!     │                         └──────────────┘
//!     │                                │
//!     │◄─── kick / ban ────────────────┤ Escalation
//!     │                                │
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod combat;
pub mod config;
pub mod error;
pub mod escalation;
pub mod heuristics;
pub mod ledger;
pub mod mock;
pub mod monitor;
pub mod report;
pub mod source;
pub mod violation;

pub use combat::{FiredProjectile, MeleeHit, MeleeWeapon, ProjectileHit};
pub use config::WardenConfig;
pub use error::{ConfigError, ConfigResult, InputRejection, SessionError};
pub use escalation::{EscalationAction, EscalationPolicy, SessionControl};
pub use heuristics::input::{InputSample, MovementButtons};
pub use ledger::{OverallSummary, PlayerSummary, ViolationLedger};
pub use monitor::{Finding, Monitor};
pub use report::{ReportSink, TracingSink};
pub use source::{FrameTiming, GeometrySource, HitEntity, PlayerId, PlayerSnapshot, RayHit, Timestamp};
pub use violation::{Violation, ViolationKind};
