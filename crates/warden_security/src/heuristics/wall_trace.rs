//! # Wall-Trace Heuristic
//!
//! Detects players who keep aiming straight at opponents hidden behind solid
//! geometry. One occluded aim is noise (fog, near misses); repetition inside
//! a 30 second window is the signal.
//!
//! ```text
//!  eye ──facing ray (PLAYER)──────────► target
//!   │                                    ▲
//!   └──line of sight (SOLID)──█──────────┘
//!                             wall => suspicious trace
//! ```

use warden_shared::{LayerMask, Ray, WALL_TRACE_WINDOW};

use super::facing_target;
use crate::config::WardenConfig;
use crate::ledger::PlayerViolationRecord;
use crate::source::{GeometrySource, PlayerSnapshot, Timestamp};
use crate::violation::{Violation, ViolationKind};

/// Line of sight stops this far short of the target's feet so the ground it
/// stands on does not count as an obstruction.
const TARGET_CLEARANCE: f32 = 0.1;

/// Runs one wall-trace pass for `player`.
///
/// Rate limited to `wall_trace_check_interval`. Exempt and incapacitated
/// players are skipped.
pub fn check<G: GeometrySource + ?Sized>(
    record: &mut PlayerViolationRecord,
    player: &PlayerSnapshot,
    config: &WardenConfig,
    geometry: &G,
    now: Timestamp,
) -> Option<Violation> {
    if player.is_exempt() || player.is_incapacitated() {
        return None;
    }
    if let Some(last) = record.last_wall_trace_check_at {
        if now - last < config.wall_trace_check_interval {
            return None;
        }
    }
    record.last_wall_trace_check_at = Some(now);

    if now - record.wall_trace_window_started_at >= WALL_TRACE_WINDOW {
        record.suspicious_wall_traces = 0;
        record.wall_trace_window_started_at = now;
    }

    let target = facing_target(player, config.max_wall_trace_distance, geometry)?;
    let target_position = geometry.player(target)?.position;
    let (line_of_sight, distance) = Ray::between(player.eye_position, target_position)?;

    geometry.raycast(
        line_of_sight,
        (distance - TARGET_CLEARANCE).max(0.0),
        LayerMask::SOLID,
    )?;

    record.suspicious_wall_traces += 1;
    tracing::debug!(
        player = player.id,
        target,
        traces = record.suspicious_wall_traces,
        "Aim through obstruction"
    );

    if record.suspicious_wall_traces < config.wall_traces_before_violation {
        return None;
    }

    let traces = record.suspicious_wall_traces;
    record.suspicious_wall_traces = 0;
    Some(Violation::new(
        ViolationKind::Wallhack,
        format!("Wallhack detected: {traces} aims through solid geometry"),
    ))
}
