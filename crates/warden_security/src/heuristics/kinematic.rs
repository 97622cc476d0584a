//! Speedhack and flyhack checks. Stateless, run every tick.

use warden_shared::{LayerMask, Ray, Vec3, GROUND_PROBE_DISTANCE};

use crate::config::WardenConfig;
use crate::source::{GeometrySource, PlayerSnapshot};
use crate::violation::{Violation, ViolationKind};

/// Reports a player moving faster than `max_speed`.
#[must_use]
pub fn check_speed(player: &PlayerSnapshot, config: &WardenConfig) -> Option<Violation> {
    if player.is_exempt() || !player.speed.is_finite() || player.speed <= config.max_speed {
        return None;
    }
    Some(Violation::new(
        ViolationKind::SpeedHack,
        format!("Speed hack detected: {:.2}", player.speed),
    ))
}

/// Height of the player's feet above terrain or world geometry.
///
/// Returns 0 when the downward probe hits nothing, so players beyond the
/// world bounds read as grounded.
pub fn height_above_ground<G: GeometrySource + ?Sized>(player: &PlayerSnapshot, geometry: &G) -> f32 {
    geometry
        .raycast(
            Ray::new(player.position, Vec3::DOWN),
            GROUND_PROBE_DISTANCE,
            LayerMask::GROUND,
        )
        .map_or(0.0, |hit| hit.distance)
}

/// Reports an unmounted player hovering above `max_fly_height`.
pub fn check_fly<G: GeometrySource + ?Sized>(
    player: &PlayerSnapshot,
    config: &WardenConfig,
    geometry: &G,
) -> Option<Violation> {
    if player.is_exempt() || player.is_mounted {
        return None;
    }
    let height = height_above_ground(player, geometry);
    if height <= config.max_fly_height {
        return None;
    }
    Some(Violation::new(
        ViolationKind::FlyHack,
        format!("Fly hack detected: {height:.2}m above ground"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGeometrySource;

    #[test]
    fn test_speed_over_limit() {
        let config = WardenConfig::default();
        let mut player = PlayerSnapshot::new(1, "runner", Vec3::ZERO);
        player.speed = 9.126;

        let violation = check_speed(&player, &config).unwrap();
        assert_eq!(violation.kind, ViolationKind::SpeedHack);
        assert_eq!(violation.description, "Speed hack detected: 9.13");
    }

    #[test]
    fn test_speed_at_limit_and_admin() {
        let config = WardenConfig::default();
        let mut player = PlayerSnapshot::new(1, "runner", Vec3::ZERO);
        player.speed = config.max_speed;
        assert!(check_speed(&player, &config).is_none());

        player.speed = 50.0;
        player.is_admin = true;
        assert!(check_speed(&player, &config).is_none());
    }

    #[test]
    fn test_fly_height() {
        let config = WardenConfig::default();
        let world = MockGeometrySource::new();

        let grounded = PlayerSnapshot::new(1, "walker", Vec3::new(0.0, 2.0, 0.0));
        assert!(check_fly(&grounded, &config, &world).is_none());

        let flying = PlayerSnapshot::new(2, "bird", Vec3::new(0.0, 25.0, 0.0));
        let violation = check_fly(&flying, &config, &world).unwrap();
        assert_eq!(violation.description, "Fly hack detected: 25.00m above ground");
    }

    #[test]
    fn test_fly_skips_mounted_and_out_of_bounds() {
        let config = WardenConfig::default();
        let world = MockGeometrySource::new();

        let mut pilot = PlayerSnapshot::new(1, "pilot", Vec3::new(0.0, 80.0, 0.0));
        pilot.is_mounted = true;
        assert!(check_fly(&pilot, &config, &world).is_none());

        // Below the terrain the probe finds nothing: reads as grounded
        let under = PlayerSnapshot::new(2, "mole", Vec3::new(0.0, -30.0, 0.0));
        assert_eq!(height_above_ground(&under, &world), 0.0);
        assert!(check_fly(&under, &config, &world).is_none());
    }
}
