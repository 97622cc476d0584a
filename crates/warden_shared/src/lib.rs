//! # WARDEN Shared
//!
//! Common types used by both the detection engine and the host game.
//!
//! ## RULE
//!
//! This crate must NEVER depend on:
//! - the host engine's physics or entity APIs
//! - `warden_security`
//!
//! If you need detection state, put it in `warden_security`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod layers;
pub mod math;

pub use constants::{
    CLIENT_FRAME_RATE, DESYNC_FORGIVENESS, GROUND_PROBE_DISTANCE, WALL_TRACE_WINDOW,
};
pub use layers::LayerMask;
pub use math::{Ray, Vec3};
