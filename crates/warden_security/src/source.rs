//! # Host Interfaces
//!
//! Traits the host game implements so the engine can observe the world.
//!
//! The engine never computes positions, raycasts or time itself. Every
//! operation fetches a fresh [`PlayerSnapshot`] by [`PlayerId`], so the
//! ledger is never coupled to the lifetime of a live entity handle.
//!
//! ```text
//! Engine defines:          Host implements:
//! ┌──────────────────┐     ┌──────────────────────┐
//! │ GeometrySource   │ ◄── │ physics + clock      │
//! │ SessionControl   │ ◄── │ kick / ban           │
//! │ ReportSink       │ ◄── │ chat / console       │
//! └──────────────────┘     └──────────────────────┘
//! ```

use std::time::SystemTime;

use warden_shared::{LayerMask, Ray, Vec3};

/// Stable player identity (platform account id).
pub type PlayerId = u64;

/// Seconds on the host's monotonic clock.
pub type Timestamp = f64;

/// Everything the heuristics need to know about one player, right now.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Stable identity.
    pub id: PlayerId,
    /// Display label for logs and reports.
    pub display_name: String,
    /// Administrators are exempt from checks.
    pub is_admin: bool,
    /// Connected to the session.
    pub is_connected: bool,
    /// Asleep (logged out body still in the world).
    pub is_sleeping: bool,
    /// Seated in or on a vehicle/mount.
    pub is_mounted: bool,
    /// Downed and waiting for revival.
    pub is_wounded: bool,
    /// Feet position.
    pub position: Vec3,
    /// Camera position.
    pub eye_position: Vec3,
    /// Head bone position (ranged origin reference).
    pub head_position: Vec3,
    /// Camera facing direction.
    pub eye_forward: Vec3,
    /// Body facing direction.
    pub body_forward: Vec3,
    /// Network-derived movement speed (m/s).
    pub speed: f32,
    /// Network desync estimate (seconds).
    pub desync_time: f32,
}

impl PlayerSnapshot {
    /// Creates a connected, awake, non-admin player standing at `position`
    /// with a 1.6m eye height and facing +Z.
    #[must_use]
    pub fn new(id: PlayerId, display_name: impl Into<String>, position: Vec3) -> Self {
        let eye_position = position + Vec3::new(0.0, 1.6, 0.0);
        Self {
            id,
            display_name: display_name.into(),
            is_admin: false,
            is_connected: true,
            is_sleeping: false,
            is_mounted: false,
            is_wounded: false,
            position,
            eye_position,
            head_position: eye_position,
            eye_forward: Vec3::Z,
            body_forward: Vec3::Z,
            speed: 0.0,
            desync_time: 0.0,
        }
    }

    /// Exempt from detection.
    #[must_use]
    pub const fn is_exempt(&self) -> bool {
        self.is_admin
    }

    /// Sleeping or wounded: cannot aim or fight normally.
    #[must_use]
    pub const fn is_incapacitated(&self) -> bool {
        self.is_sleeping || self.is_wounded
    }
}

/// What a raycast struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitEntity {
    /// A player hitbox.
    Player(PlayerId),
    /// Terrain, world geometry or construction.
    Obstruction,
}

/// Nearest raycast intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the ray.
    pub distance: f32,
    /// What was hit.
    pub entity: HitEntity,
}

/// Host frame durations (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTiming {
    /// Duration of the current frame.
    pub delta: f32,
    /// Smoothed frame duration.
    pub smooth_delta: f32,
    /// Fixed physics step.
    pub fixed_delta: f32,
}

impl FrameTiming {
    /// Timing of a steady server at `rate` Hz.
    #[must_use]
    pub fn steady(rate: f32) -> Self {
        let frame = 1.0 / rate;
        Self {
            delta: frame,
            smooth_delta: frame,
            fixed_delta: frame,
        }
    }

    /// Largest of the three durations, ignoring garbage values.
    #[must_use]
    pub fn max_frame_time(self) -> f32 {
        [self.delta, self.smooth_delta, self.fixed_delta]
            .into_iter()
            .filter(|t| t.is_finite() && *t > 0.0)
            .fold(0.0, f32::max)
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::steady(30.0)
    }
}

/// Geometry and time provider implemented by the host.
///
/// All calls are synchronous and bounded; the engine may call them while
/// holding a player's record lock.
pub trait GeometrySource: Send + Sync {
    /// Current snapshot of a player, `None` if unknown.
    fn player(&self, id: PlayerId) -> Option<PlayerSnapshot>;

    /// Nearest hit along `ray` within `max_distance`, restricted to `mask`.
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    /// Current frame durations.
    fn frame_timing(&self) -> FrameTiming;

    /// Monotonic time.
    fn now(&self) -> Timestamp;

    /// Wall-clock time for audit history.
    fn wall_clock(&self) -> SystemTime;
}
