//! # Aim-Snap Heuristic
//!
//! Samples the facing direction at most once per `aim_snap_check_interval`
//! and counts samples that turned further than a human can between two
//! samples. Each sample is compared with the one immediately before it.

use crate::config::WardenConfig;
use crate::ledger::PlayerViolationRecord;
use crate::source::{PlayerSnapshot, Timestamp};
use crate::violation::{Violation, ViolationKind};

/// Takes one aim sample for `player` if the interval allows.
pub fn check(
    record: &mut PlayerViolationRecord,
    player: &PlayerSnapshot,
    config: &WardenConfig,
    now: Timestamp,
) -> Option<Violation> {
    if player.is_exempt() {
        return None;
    }
    if let Some(last) = record.last_aim_sample_at {
        if now - last < config.aim_snap_check_interval {
            return None;
        }
    }

    let current = player.eye_forward.try_normalize()?;
    let previous = record.last_aim_direction.replace(current);
    record.last_aim_sample_at = Some(now);

    // First sample only sets the baseline.
    let angle = previous?.angle_degrees(current)?;
    if angle <= config.suspicious_aim_snap_threshold {
        return None;
    }

    record.aim_snap_detections += 1;
    if record.aim_snap_detections < config.required_snap_detections {
        return None;
    }

    record.aim_snap_detections = 0;
    Some(Violation::new(
        ViolationKind::Aimhack,
        format!("Aimhack detected: {angle:.1} degree snap"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_shared::Vec3;

    fn facing(yaw: f32) -> PlayerSnapshot {
        let mut player = PlayerSnapshot::new(1, "aimer", Vec3::ZERO);
        player.eye_forward = Vec3::from_yaw_pitch(yaw, 0.0);
        player
    }

    #[test]
    fn test_three_snaps_report_once() {
        let config = WardenConfig::default();
        let mut record = PlayerViolationRecord::new(0.0);

        // Baseline, then three 90 degree snaps
        assert!(check(&mut record, &facing(0.0), &config, 0.0).is_none());
        assert!(check(&mut record, &facing(90.0), &config, 0.2).is_none());
        assert!(check(&mut record, &facing(180.0), &config, 0.4).is_none());
        assert_eq!(record.aim_snap_detections, 2);

        let violation = check(&mut record, &facing(270.0), &config, 0.6).unwrap();
        assert_eq!(violation.kind, ViolationKind::Aimhack);
        assert_eq!(violation.description, "Aimhack detected: 90.0 degree snap");
        assert_eq!(record.aim_snap_detections, 0);
    }

    #[test]
    fn test_two_snaps_are_quiet() {
        let config = WardenConfig::default();
        let mut record = PlayerViolationRecord::new(0.0);

        check(&mut record, &facing(0.0), &config, 0.0);
        assert!(check(&mut record, &facing(90.0), &config, 0.2).is_none());
        assert!(check(&mut record, &facing(180.0), &config, 0.4).is_none());
        assert_eq!(record.aim_snap_detections, 2);
    }

    #[test]
    fn test_samples_inside_interval_are_ignored() {
        let config = WardenConfig::default();
        let mut record = PlayerViolationRecord::new(0.0);

        check(&mut record, &facing(0.0), &config, 0.0);
        // Too soon: no comparison and the baseline is kept
        assert!(check(&mut record, &facing(90.0), &config, 0.05).is_none());
        assert_eq!(record.last_aim_sample_at, Some(0.0));
        assert!(record.last_aim_direction.unwrap().distance(Vec3::Z) < 1e-5);
        assert_eq!(record.aim_snap_detections, 0);
    }

    #[test]
    fn test_compares_against_previous_sample() {
        let config = WardenConfig::default();
        let mut record = PlayerViolationRecord::new(0.0);

        check(&mut record, &facing(0.0), &config, 0.0);
        check(&mut record, &facing(90.0), &config, 0.2);
        assert_eq!(record.aim_snap_detections, 1);

        // Small turn from the new baseline is not a snap
        check(&mut record, &facing(100.0), &config, 0.4);
        assert_eq!(record.aim_snap_detections, 1);
        let stored = record.last_aim_direction.unwrap();
        assert!(stored.distance(Vec3::from_yaw_pitch(100.0, 0.0)) < 1e-5);
    }
}
