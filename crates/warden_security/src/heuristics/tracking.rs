//! # Target-Persistence Heuristic
//!
//! Detects sustained lock-on: the facing ray resting on the same player for
//! longer than `tracking_dwell_threshold`. Unlike the wall-trace check this
//! never looks for an obstruction; dwell time alone is the signal.

use std::collections::hash_map::Entry;

use super::facing_target;
use crate::config::WardenConfig;
use crate::ledger::PlayerViolationRecord;
use crate::source::{GeometrySource, PlayerSnapshot, Timestamp};
use crate::violation::{Violation, ViolationKind};

/// Runs one dwell pass for `player`.
///
/// Stale entries (older than `wall_trace_memory_duration`) are dropped
/// first, whether or not they ever fired.
pub fn check<G: GeometrySource + ?Sized>(
    record: &mut PlayerViolationRecord,
    player: &PlayerSnapshot,
    config: &WardenConfig,
    geometry: &G,
    now: Timestamp,
) -> Option<Violation> {
    let memory = config.wall_trace_memory_duration;
    record
        .tracked_targets
        .retain(|_, first_seen| now - *first_seen <= memory);

    if player.is_exempt() {
        return None;
    }

    let target = facing_target(player, config.max_wall_trace_distance, geometry)?;
    match record.tracked_targets.entry(target) {
        Entry::Vacant(slot) => {
            slot.insert(now);
            None
        }
        Entry::Occupied(slot) => {
            let dwell = now - *slot.get();
            if dwell <= config.tracking_dwell_threshold {
                return None;
            }
            slot.remove();
            Some(Violation::new(
                ViolationKind::ConsistentTracking,
                format!("Consistent tracking through walls: target {target} for {dwell:.1}s"),
            ))
        }
    }
}
