//! # Combat Timing Validation
//!
//! Server-side validation of ranged and melee hits.
//!
//! ## Philosophy
//!
//! NEVER trust the client, but never expect exact agreement either. Network
//! latency and frame jitter mean the client's view of a hit always lags the
//! server's. Every check here is a tolerance window:
//!
//! ```text
//! envelope = (clamp(desync) + client_frames / 60 + server_frames * max_frame)
//!            * forgiveness
//! ```
//!
//! The envelope is strictly positive and only grows with desync and frame
//! time. Cheats that warp a shot's origin or angle land outside it.
//!
//! Ranged hits are measured against the launch the server recorded when the
//! projectile was fired. The hit event's own velocity is only compared to
//! that launch, never trusted on its own.

pub mod registry;

use warden_shared::constants::{
    MELEE_CLIENT_FRAMES, MELEE_SERVER_FRAMES, PROJECTILE_CLIENT_FRAMES,
    PROJECTILE_ORIGIN_PADDING, PROJECTILE_SERVER_FRAMES,
};
use warden_shared::{Vec3, CLIENT_FRAME_RATE, DESYNC_FORGIVENESS};

use crate::config::WardenConfig;
use crate::source::{FrameTiming, PlayerId, PlayerSnapshot};
use crate::violation::{Violation, ViolationKind};

pub use registry::{FiredProjectile, ProjectileRegistry, TrackedProjectile};

/// A ranged hit as claimed by the client.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileHit {
    /// Projectile this hit belongs to.
    pub projectile_id: u32,
    /// Claimed shot origin.
    pub claimed_origin: Vec3,
    /// Claimed projectile velocity.
    pub claimed_velocity: Vec3,
    /// Reported impact point.
    pub hit_position: Vec3,
}

impl ProjectileHit {
    fn is_finite(&self) -> bool {
        self.claimed_origin.is_finite()
            && self.claimed_velocity.is_finite()
            && self.hit_position.is_finite()
    }
}

/// Reach data for a melee weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeleeWeapon {
    /// Maximum strike distance from the eye (metres).
    pub reach: f32,
    /// Radius of the swing volume (metres).
    pub attack_radius: f32,
}

/// A melee hit as claimed by the client.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeleeHit {
    /// Player struck, if any.
    pub victim: Option<PlayerId>,
    /// Weapon used.
    pub weapon: MeleeWeapon,
    /// Reported impact point.
    pub hit_position: Vec3,
}

/// Measurements from one ranged validation, for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileAnalysis {
    /// Time envelope (seconds).
    pub envelope: f32,
    /// Head to claimed origin distance.
    pub origin_distance: f32,
    /// Recorded launch point to claimed origin distance.
    pub launch_distance: f32,
    /// Allowed distance for both origin measurements.
    pub allowed_origin_distance: f32,
    /// Divergence between the recorded flight and body aim, if measurable.
    pub angle_divergence: Option<f32>,
    /// Divergence between the claimed and the recorded flight, if measurable.
    pub claim_divergence: Option<f32>,
    /// Allowed divergence for both flight measurements.
    pub allowed_angle_divergence: f32,
}

fn time_envelope(
    desync_time: f32,
    max_desync_time: f32,
    timing: FrameTiming,
    client_frames: f32,
    server_frames: f32,
) -> f32 {
    let desync = if desync_time.is_finite() {
        desync_time.clamp(0.0, max_desync_time)
    } else {
        max_desync_time
    };
    let client = client_frames / CLIENT_FRAME_RATE;
    let server = server_frames * timing.max_frame_time();
    (desync + client + server) * DESYNC_FORGIVENESS
}

/// Time envelope for a ranged hit.
#[must_use]
pub fn projectile_time_envelope(desync_time: f32, timing: FrameTiming, config: &WardenConfig) -> f32 {
    time_envelope(
        desync_time,
        config.max_desync_time,
        timing,
        PROJECTILE_CLIENT_FRAMES,
        PROJECTILE_SERVER_FRAMES,
    )
}

/// Time envelope for a melee hit.
#[must_use]
pub fn melee_time_envelope(desync_time: f32, timing: FrameTiming, config: &WardenConfig) -> f32 {
    time_envelope(
        desync_time,
        config.max_desync_time,
        timing,
        MELEE_CLIENT_FRAMES,
        MELEE_SERVER_FRAMES,
    )
}

/// Largest legal distance between the attacker's head and a shot origin.
#[must_use]
pub fn allowed_origin_distance(envelope: f32, config: &WardenConfig) -> f32 {
    config.projectile_origin_base_distance
        + PROJECTILE_ORIGIN_PADDING
        + envelope * config.projectile_origin_slack_speed
}

/// Largest legal divergence between claimed and body-implied flight over
/// `envelope` seconds at `speed`.
#[must_use]
pub fn allowed_angle_divergence(envelope: f32, speed: f32, config: &WardenConfig) -> f32 {
    let half_tolerance = (config.projectile_angle_tolerance * 0.5).to_radians();
    config.projectile_angle_base_distance + 2.0 * speed * envelope * half_tolerance.sin()
}

/// Measures a ranged hit against its tracked projectile.
#[must_use]
pub fn analyze_projectile_hit(
    attacker: &PlayerSnapshot,
    hit: &ProjectileHit,
    tracked: &TrackedProjectile,
    timing: FrameTiming,
    config: &WardenConfig,
) -> ProjectileAnalysis {
    let envelope = projectile_time_envelope(attacker.desync_time, timing, config);
    let measured = tracked.fired.velocity;
    let speed = measured.length();
    let moving = speed > f32::EPSILON;

    // Every flight starts at the claimed origin and runs for the same slice.
    let realized = hit.claimed_origin + measured * envelope;
    let angle_divergence = tracked.body_forward.try_normalize().and_then(|forward| {
        moving.then(|| realized.distance(hit.claimed_origin + forward * (speed * envelope)))
    });
    let claim_divergence =
        moving.then(|| realized.distance(hit.claimed_origin + hit.claimed_velocity * envelope));

    ProjectileAnalysis {
        envelope,
        origin_distance: attacker.head_position.distance(hit.claimed_origin),
        launch_distance: tracked.fired.origin.distance(hit.claimed_origin),
        allowed_origin_distance: allowed_origin_distance(envelope, config),
        angle_divergence,
        claim_divergence,
        allowed_angle_divergence: allowed_angle_divergence(envelope, speed, config),
    }
}

/// Validates a ranged hit. Returns every violation found (at most two).
#[must_use]
pub fn validate_projectile_hit(
    attacker: &PlayerSnapshot,
    hit: &ProjectileHit,
    tracked: &TrackedProjectile,
    timing: FrameTiming,
    config: &WardenConfig,
) -> Vec<Violation> {
    if !hit.is_finite() {
        return invalid_geometry("projectile", config);
    }

    let analysis = analyze_projectile_hit(attacker, hit, tracked, timing, config);
    let mut violations = Vec::new();

    let allowed = analysis.allowed_origin_distance;
    if !attacker.is_mounted {
        let origin = if analysis.origin_distance > allowed {
            Some((analysis.origin_distance, "head"))
        } else if analysis.launch_distance > allowed {
            Some((analysis.launch_distance, "launch point"))
        } else {
            None
        };
        if let Some((distance, from)) = origin {
            violations.push(Violation::new(
                ViolationKind::ProjectileDesync,
                format!("Projectile desync: origin {distance:.2}m from {from} (allowed {allowed:.2}m)"),
            ));
        }
    }

    let allowed = analysis.allowed_angle_divergence;
    let exceeds = |divergence: Option<f32>| divergence.filter(|d| *d > allowed);
    let angle = exceeds(analysis.angle_divergence)
        .map(|d| (d, "body aim"))
        .or_else(|| exceeds(analysis.claim_divergence).map(|d| (d, "fired flight")));
    if let Some((divergence, from)) = angle {
        violations.push(Violation::new(
            ViolationKind::ProjectileAngle,
            format!("Invalid projectile angle: {divergence:.2}m off {from} (allowed {allowed:.2}m)"),
        ));
    }

    violations
}

/// Validates a melee hit against the attacker's swing envelope.
#[must_use]
pub fn validate_melee_hit(
    attacker: &PlayerSnapshot,
    hit: &MeleeHit,
    victim: Option<&PlayerSnapshot>,
    timing: FrameTiming,
    config: &WardenConfig,
) -> Option<Violation> {
    if !hit.hit_position.is_finite() {
        return invalid_geometry("melee", config).pop();
    }
    let MeleeWeapon { reach, attack_radius } = hit.weapon;
    if !(reach.is_finite() && reach > 0.0 && attack_radius.is_finite() && attack_radius >= 0.0) {
        tracing::debug!(player = attacker.id, reach, attack_radius, "Unusable melee weapon data");
        return None;
    }
    let forward = attacker.body_forward.try_normalize()?;

    let envelope = melee_time_envelope(attacker.desync_time, timing, config);
    let slack = envelope * config.melee_slack_speed;

    let eye = attacker.eye_position;
    let hit_distance = eye.distance(hit.hit_position);
    let near = hit_distance <= reach + slack;
    let strike_reach = if near { hit_distance.min(reach) } else { reach };
    let expected = eye + forward * strike_reach;
    let error = expected.distance(hit.hit_position);

    let mut allowed = attack_radius + config.melee_angle_base_distance + slack;
    if victim.is_some_and(PlayerSnapshot::is_incapacitated) {
        allowed += config.incapacitated_victim_bonus;
    }
    if reach < config.short_reach_threshold {
        allowed += config.short_reach_bonus;
    }

    (error > allowed).then(|| {
        Violation::new(
            ViolationKind::MeleeAngle,
            format!("Invalid melee attack angle: {error:.2}m off swing (allowed {allowed:.2}m)"),
        )
    })
}

fn invalid_geometry(what: &str, config: &WardenConfig) -> Vec<Violation> {
    if config.report_invalid_input {
        vec![Violation::new(
            ViolationKind::InvalidInput,
            format!("Invalid input: non-finite {what} hit geometry"),
        )]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attacker() -> PlayerSnapshot {
        PlayerSnapshot::new(1, "shooter", Vec3::ZERO)
    }

    fn tracked(forward: Vec3) -> TrackedProjectile {
        launched(forward, Vec3::new(0.0, 0.0, 300.0))
    }

    fn launched(forward: Vec3, velocity: Vec3) -> TrackedProjectile {
        TrackedProjectile {
            fired: FiredProjectile {
                projectile_id: 7,
                origin: Vec3::new(0.0, 1.6, 0.0),
                velocity,
            },
            body_forward: forward,
            fired_at: 0.0,
        }
    }

    fn shot(origin: Vec3, velocity: Vec3) -> ProjectileHit {
        ProjectileHit {
            projectile_id: 7,
            claimed_origin: origin,
            claimed_velocity: velocity,
            hit_position: origin + velocity * 0.1,
        }
    }

    #[test]
    fn test_envelopes_are_positive_and_grow() {
        let config = WardenConfig::default();
        let idle = FrameTiming {
            delta: 0.0,
            smooth_delta: 0.0,
            fixed_delta: 0.0,
        };
        assert!(projectile_time_envelope(0.0, idle, &config) > 0.0);
        assert!(melee_time_envelope(0.0, idle, &config) > 0.0);

        let steady = FrameTiming::steady(30.0);
        let base = projectile_time_envelope(0.0, steady, &config);
        assert!((base - 0.15).abs() < 1e-5);
        assert!(projectile_time_envelope(0.2, steady, &config) > base);
        assert!(projectile_time_envelope(0.0, FrameTiming::steady(10.0), &config) > base);

        // Desync is clamped, never negative
        assert_eq!(
            projectile_time_envelope(-3.0, steady, &config),
            projectile_time_envelope(0.0, steady, &config)
        );
        assert_eq!(
            projectile_time_envelope(50.0, steady, &config),
            projectile_time_envelope(config.max_desync_time, steady, &config)
        );
    }

    #[test]
    fn test_origin_inside_envelope_passes() {
        let config = WardenConfig::default();
        let attacker = attacker();
        let hit = shot(
            attacker.head_position + Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(0.0, 0.0, 300.0),
        );

        let violations =
            validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), FrameTiming::steady(30.0), &config);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_origin_ten_envelopes_away_is_desync() {
        let config = WardenConfig::default();
        let attacker = attacker();
        let timing = FrameTiming::steady(30.0);
        let envelope = projectile_time_envelope(attacker.desync_time, timing, &config);
        let allowed = allowed_origin_distance(envelope, &config);

        let hit = shot(
            attacker.head_position + Vec3::new(allowed * 10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 300.0),
        );
        let violations = validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), timing, &config);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ProjectileDesync);
        assert!(violations[0].description.starts_with("Projectile desync"));
    }

    #[test]
    fn test_mounted_attacker_skips_origin_check() {
        let config = WardenConfig::default();
        let mut attacker = attacker();
        attacker.is_mounted = true;
        let hit = shot(Vec3::new(100.0, 1.6, 0.0), Vec3::new(0.0, 0.0, 300.0));

        let violations =
            validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), FrameTiming::steady(30.0), &config);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_bent_projectile_angle() {
        let config = WardenConfig::default();
        let attacker = attacker();
        // 20 degrees off the body's facing
        let velocity = Vec3::from_yaw_pitch(20.0, 0.0) * 300.0;
        let hit = shot(attacker.head_position, velocity);

        let violations =
            validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), FrameTiming::steady(30.0), &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ProjectileAngle);

        // One degree is inside the tolerance
        let velocity = Vec3::from_yaw_pitch(1.0, 0.0) * 300.0;
        let hit = shot(attacker.head_position, velocity);
        assert!(
            validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), FrameTiming::steady(30.0), &config)
                .is_empty()
        );
    }

    #[test]
    fn test_recorded_launch_outranks_claimed_flight() {
        let config = WardenConfig::default();
        let attacker = attacker();
        let timing = FrameTiming::steady(30.0);
        // Fired sideways, hit event claims a straight shot
        let sideways = launched(Vec3::Z, Vec3::new(300.0, 0.0, 0.0));
        let hit = shot(attacker.head_position, Vec3::new(0.0, 0.0, 300.0));

        let violations = validate_projectile_hit(&attacker, &hit, &sideways, timing, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ProjectileAngle);
        assert!(violations[0].description.contains("off body aim"));
    }

    #[test]
    fn test_origin_far_from_launch_point_is_desync() {
        let config = WardenConfig::default();
        let mut attacker = attacker();
        // Host head position drifted with the shooter, launch stayed put
        attacker.head_position = Vec3::new(0.0, 1.6, 30.0);
        let hit = shot(attacker.head_position, Vec3::new(0.0, 0.0, 300.0));

        let violations =
            validate_projectile_hit(&attacker, &hit, &tracked(Vec3::Z), FrameTiming::steady(30.0), &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ProjectileDesync);
        assert!(violations[0].description.contains("from launch point"));
    }

    #[test]
    fn test_non_finite_projectile_geometry() {
        let config = WardenConfig::default();
        let hit = shot(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Z);
        let violations =
            validate_projectile_hit(&attacker(), &hit, &tracked(Vec3::Z), FrameTiming::default(), &config);
        assert_eq!(violations[0].kind, ViolationKind::InvalidInput);

        let quiet = WardenConfig {
            report_invalid_input: false,
            ..WardenConfig::default()
        };
        assert!(
            validate_projectile_hit(&attacker(), &hit, &tracked(Vec3::Z), FrameTiming::default(), &quiet)
                .is_empty()
        );
    }

    fn swing(hit_position: Vec3, reach: f32) -> MeleeHit {
        MeleeHit {
            victim: Some(2),
            weapon: MeleeWeapon {
                reach,
                attack_radius: 0.3,
            },
            hit_position,
        }
    }

    #[test]
    fn test_melee_in_front_passes() {
        let config = WardenConfig::default();
        let hit = swing(Vec3::new(0.0, 1.6, 1.5), 2.0);
        assert!(validate_melee_hit(&attacker(), &hit, None, FrameTiming::steady(30.0), &config).is_none());
    }

    #[test]
    fn test_melee_behind_or_beside_fails() {
        let config = WardenConfig::default();
        let beside = swing(Vec3::new(3.0, 1.6, 0.0), 2.0);
        let violation =
            validate_melee_hit(&attacker(), &beside, None, FrameTiming::steady(30.0), &config).unwrap();
        assert_eq!(violation.kind, ViolationKind::MeleeAngle);

        let behind = swing(Vec3::new(0.0, 1.6, -1.5), 2.0);
        assert!(validate_melee_hit(&attacker(), &behind, None, FrameTiming::steady(30.0), &config).is_some());
    }

    #[test]
    fn test_melee_relaxes_for_sleeping_victim() {
        let config = WardenConfig::default();
        let hit = swing(Vec3::new(1.8, 1.6, 0.9), 2.0);
        let timing = FrameTiming::steady(30.0);

        let awake = PlayerSnapshot::new(2, "victim", Vec3::new(1.8, 0.0, 0.9));
        assert!(validate_melee_hit(&attacker(), &hit, Some(&awake), timing, &config).is_some());

        let mut asleep = awake;
        asleep.is_sleeping = true;
        assert!(validate_melee_hit(&attacker(), &hit, Some(&asleep), timing, &config).is_none());
    }

    #[test]
    fn test_melee_relaxes_for_short_reach() {
        let config = WardenConfig::default();
        let timing = FrameTiming::steady(30.0);
        // 1.0 reach dagger, hit off to the side
        let hit = swing(Vec3::new(1.9, 1.6, 0.3), 1.0);

        let without_bonus = WardenConfig {
            short_reach_bonus: 0.0,
            ..WardenConfig::default()
        };
        assert!(validate_melee_hit(&attacker(), &hit, None, timing, &without_bonus).is_some());
        assert!(validate_melee_hit(&attacker(), &hit, None, timing, &config).is_none());
    }

    #[test]
    fn test_melee_envelope_grows_with_desync() {
        let config = WardenConfig::default();
        let hit = swing(Vec3::new(3.0, 1.6, 0.0), 2.0);
        let timing = FrameTiming::steady(30.0);

        let mut lagging = attacker();
        lagging.desync_time = 1.0;
        // 1s of desync allows 5.5m+ of slack
        assert!(validate_melee_hit(&attacker(), &hit, None, timing, &config).is_some());
        assert!(validate_melee_hit(&lagging, &hit, None, timing, &config).is_none());
    }
}
