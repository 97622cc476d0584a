//! In-flight projectile registry.
//!
//! Ranged hits are only validated against projectiles the server saw being
//! fired. An unknown projectile id is insufficient evidence, not a
//! violation.

use std::collections::HashMap;

use warden_shared::Vec3;

use crate::source::{PlayerId, Timestamp};

/// A projectile as reported by the host when it was fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiredProjectile {
    /// Client-assigned id, unique per attacker.
    pub projectile_id: u32,
    /// Launch position.
    pub origin: Vec3,
    /// Launch velocity.
    pub velocity: Vec3,
}

/// Server-side record of a fired projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedProjectile {
    /// Launch data.
    pub fired: FiredProjectile,
    /// Attacker's body facing at launch.
    pub body_forward: Vec3,
    /// Launch time.
    pub fired_at: Timestamp,
}

/// Projectiles in flight, per attacker.
#[derive(Debug, Default)]
pub struct ProjectileRegistry {
    in_flight: HashMap<PlayerId, HashMap<u32, TrackedProjectile>>,
}

impl ProjectileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a newly fired projectile, replacing any with the same id.
    pub fn register(&mut self, attacker: PlayerId, projectile: TrackedProjectile) {
        self.in_flight
            .entry(attacker)
            .or_default()
            .insert(projectile.fired.projectile_id, projectile);
    }

    /// Looks up an in-flight projectile.
    #[must_use]
    pub fn get(&self, attacker: PlayerId, projectile_id: u32) -> Option<&TrackedProjectile> {
        self.in_flight.get(&attacker)?.get(&projectile_id)
    }

    /// Drops every projectile older than `lifetime` seconds, whoever fired it.
    pub fn expire(&mut self, now: Timestamp, lifetime: f64) {
        self.in_flight.retain(|_, projectiles| {
            projectiles.retain(|_, tracked| now - tracked.fired_at <= lifetime);
            !projectiles.is_empty()
        });
    }

    /// Drops everything an attacker has in flight.
    pub fn forget(&mut self, attacker: PlayerId) {
        self.in_flight.remove(&attacker);
    }

    /// Number of projectiles in flight across all attackers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.in_flight.values().map(HashMap::len).sum()
    }

    /// True when nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
