//! Mathematical types shared between the engine and its host.
//!
//! These are the canonical representations of host geometry.

use serde::{Deserialize, Serialize};

/// 3D Vector - position, velocity, direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (up)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (forward)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Straight down
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// True when every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Unit vector in the same direction, `None` for (near) zero or
    /// non-finite input.
    #[must_use]
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len < 1e-6 {
            return None;
        }
        Some(self * (1.0 / len))
    }

    /// Angle to another direction in degrees, in `[0, 180]`.
    ///
    /// Returns `None` if either vector has no direction.
    #[must_use]
    pub fn angle_degrees(self, other: Self) -> Option<f32> {
        let a = self.try_normalize()?;
        let b = other.try_normalize()?;
        Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
    }

    /// Builds a facing direction from yaw/pitch in degrees.
    ///
    /// Yaw 0 faces +Z, positive pitch looks up.
    #[must_use]
    pub fn from_yaw_pitch(yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let (yaw_sin, yaw_cos) = yaw_degrees.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = pitch_degrees.to_radians().sin_cos();
        Self::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// A ray cast into the host's physics scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` toward `target`, with the distance between them.
    ///
    /// `None` when the two points coincide.
    #[must_use]
    pub fn between(origin: Vec3, target: Vec3) -> Option<(Self, f32)> {
        let delta = target - origin;
        let direction = delta.try_normalize()?;
        Some((Self::new(origin, direction), delta.length()))
    }
}
