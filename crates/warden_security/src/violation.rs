//! Violation kinds and descriptions.

use std::fmt;

/// Category of detected cheat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Moving faster than allowed.
    SpeedHack,
    /// Hovering too far above ground.
    FlyHack,
    /// Gathering more than the per-hit cap.
    ResourceHack,
    /// Repeatedly aiming at players behind solid geometry.
    Wallhack,
    /// Aim locked on one target for too long.
    ConsistentTracking,
    /// Repeated inhuman aim snaps.
    Aimhack,
    /// Ranged shot origin too far from the attacker's head.
    ProjectileDesync,
    /// Ranged shot direction disagrees with the attacker's body.
    ProjectileAngle,
    /// Melee hit outside the swing envelope.
    MeleeAngle,
    /// Malformed client input.
    InvalidInput,
}

impl ViolationKind {
    /// Short machine-friendly label for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpeedHack => "speed_hack",
            Self::FlyHack => "fly_hack",
            Self::ResourceHack => "resource_hack",
            Self::Wallhack => "wallhack",
            Self::ConsistentTracking => "consistent_tracking",
            Self::Aimhack => "aimhack",
            Self::ProjectileDesync => "projectile_desync",
            Self::ProjectileAngle => "projectile_angle",
            Self::MeleeAngle => "melee_angle",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single detected anomaly, ready to be reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Category.
    pub kind: ViolationKind,
    /// Human-readable description with measured values.
    pub description: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(kind: ViolationKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
