//! Raw input sanity checks.
//!
//! Rejects samples no legitimate client produces: NaN or infinite view
//! angles, button bits outside [`MovementButtons`], and a claimed position
//! further from the server's than `max_tick_displacement` per second allows.
//!
//! Displacement is measured from the host's authoritative position, so a
//! server-side relocation (respawn, teleport, dismount) moves the baseline
//! with the player.

use bitflags::bitflags;
use warden_shared::{Vec3, CLIENT_FRAME_RATE};

use crate::config::WardenConfig;
use crate::error::InputRejection;
use crate::source::Timestamp;

bitflags! {
    /// Movement buttons a client may hold during one input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MovementButtons: u32 {
        /// Move forward.
        const FORWARD = 1 << 0;
        /// Move backward.
        const BACKWARD = 1 << 1;
        /// Strafe left.
        const LEFT = 1 << 2;
        /// Strafe right.
        const RIGHT = 1 << 3;
        /// Jump.
        const JUMP = 1 << 4;
        /// Crouch.
        const DUCK = 1 << 5;
        /// Sprint.
        const SPRINT = 1 << 6;
        /// Interact.
        const USE = 1 << 7;
        /// Primary attack.
        const FIRE_PRIMARY = 1 << 8;
        /// Secondary attack / aim.
        const FIRE_SECONDARY = 1 << 9;
        /// Reload.
        const RELOAD = 1 << 10;
    }
}

/// One client input sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSample {
    /// View yaw (degrees).
    pub yaw: f32,
    /// View pitch (degrees).
    pub pitch: f32,
    /// Movement button bit mask, as sent by the client.
    pub buttons: u32,
    /// Position the client claims after this input.
    pub position: Vec3,
}

impl InputSample {
    /// Decoded button mask, `None` if any unknown bit is set.
    #[must_use]
    pub fn movement_buttons(&self) -> Option<MovementButtons> {
        MovementButtons::from_bits(self.buttons)
    }
}

/// Validates `sample` against the server-side position `authoritative`.
///
/// `previous_at` is the time of the player's previous sample. The elapsed
/// time is floored at one client frame so two samples in the same server
/// tick still get a non-zero allowance. The first sample only sets the
/// baseline time.
///
/// # Errors
///
/// Returns the first [`InputRejection`] that applies. Displacement is not
/// checked for exempt players.
pub fn validate(
    sample: &InputSample,
    authoritative: Vec3,
    previous_at: Option<Timestamp>,
    now: Timestamp,
    exempt: bool,
    config: &WardenConfig,
) -> Result<(), InputRejection> {
    if !sample.yaw.is_finite() || !sample.pitch.is_finite() {
        return Err(InputRejection::NonFiniteAngles {
            yaw: sample.yaw,
            pitch: sample.pitch,
        });
    }
    if !sample.position.is_finite() {
        return Err(InputRejection::NonFinitePosition);
    }
    if sample.movement_buttons().is_none() {
        return Err(InputRejection::UnknownButtons {
            bits: sample.buttons & !MovementButtons::all().bits(),
        });
    }

    let Some(last_at) = previous_at else {
        return Ok(());
    };
    if exempt {
        return Ok(());
    }

    #[allow(clippy::cast_possible_truncation)]
    let elapsed = ((now - last_at) as f32).max(1.0 / CLIENT_FRAME_RATE);
    let allowed = config.max_tick_displacement * elapsed;
    let distance = sample.position.distance(authoritative);
    if distance > allowed {
        return Err(InputRejection::ImplausibleDisplacement { distance, allowed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(position: Vec3) -> InputSample {
        InputSample {
            yaw: 10.0,
            pitch: -5.0,
            buttons: (MovementButtons::FORWARD | MovementButtons::SPRINT).bits(),
            position,
        }
    }

    #[test]
    fn test_rejects_non_finite_angles() {
        let config = WardenConfig::default();
        let bad = InputSample {
            yaw: f32::NAN,
            ..sample(Vec3::ZERO)
        };
        assert!(matches!(
            validate(&bad, Vec3::ZERO, None, 0.0, false, &config),
            Err(InputRejection::NonFiniteAngles { .. })
        ));

        let bad = InputSample {
            pitch: f32::INFINITY,
            ..sample(Vec3::ZERO)
        };
        assert!(validate(&bad, Vec3::ZERO, None, 0.0, true, &config).is_err());
    }

    #[test]
    fn test_rejects_unknown_buttons() {
        let config = WardenConfig::default();
        let bad = InputSample {
            buttons: MovementButtons::JUMP.bits() | (1 << 20),
            ..sample(Vec3::ZERO)
        };
        assert_eq!(
            validate(&bad, Vec3::ZERO, None, 0.0, false, &config),
            Err(InputRejection::UnknownButtons { bits: 1 << 20 })
        );

        let every = InputSample {
            buttons: MovementButtons::all().bits(),
            ..sample(Vec3::ZERO)
        };
        assert!(validate(&every, Vec3::ZERO, None, 0.0, false, &config).is_ok());
    }

    #[test]
    fn test_rejects_teleport() {
        let config = WardenConfig::default();

        // 1 second at 10 m/s allowance
        assert!(validate(&sample(Vec3::new(9.0, 0.0, 0.0)), Vec3::ZERO, Some(1.0), 2.0, false, &config).is_ok());

        let err = validate(&sample(Vec3::new(50.0, 0.0, 0.0)), Vec3::ZERO, Some(1.0), 2.0, false, &config)
            .unwrap_err();
        assert_eq!(
            err,
            InputRejection::ImplausibleDisplacement {
                distance: 50.0,
                allowed: 10.0
            }
        );

        // Admins may teleport
        assert!(validate(&sample(Vec3::new(50.0, 0.0, 0.0)), Vec3::ZERO, Some(1.0), 2.0, true, &config).is_ok());
    }

    #[test]
    fn test_baseline_follows_server_position() {
        let config = WardenConfig::default();
        let relocated = Vec3::new(500.0, 0.0, 0.0);

        assert!(validate(&sample(relocated), relocated, Some(0.0), 0.1, false, &config).is_ok());
        assert!(validate(&sample(Vec3::ZERO), relocated, Some(0.0), 0.1, false, &config).is_err());
    }

    #[test]
    fn test_first_sample_is_accepted() {
        let config = WardenConfig::default();
        assert!(validate(&sample(Vec3::new(1e4, 0.0, 0.0)), Vec3::ZERO, None, 0.0, false, &config).is_ok());
    }
}
