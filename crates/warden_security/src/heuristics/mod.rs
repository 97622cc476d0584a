//! # Detection Heuristics
//!
//! Each heuristic inspects one player and returns the violation it found,
//! if any. None of them report directly: the monitor releases the player's
//! record before reporting, so a heuristic never re-enters the ledger.
//!
//! ## Time Bases
//!
//! | Heuristic        | State            | Runs                          |
//! |------------------|------------------|-------------------------------|
//! | kinematic        | none             | every tick                    |
//! | wall_trace       | windowed counter | every `wall_trace_check_interval` |
//! | tracking         | dwell map        | every tick                    |
//! | aim_snap         | last sample      | every `aim_snap_check_interval`   |
//! | gather / input   | last position    | per host event                |

pub mod aim_snap;
pub mod gather;
pub mod input;
pub mod kinematic;
pub mod tracking;
pub mod wall_trace;

use warden_shared::{LayerMask, Ray};

use crate::source::{GeometrySource, HitEntity, PlayerId, PlayerSnapshot};

/// Player hit by the facing ray, ignoring the player itself.
///
/// `None` when the facing direction is degenerate, nothing is hit, or the
/// nearest player hitbox is the viewer's own.
pub fn facing_target<G: GeometrySource + ?Sized>(
    player: &PlayerSnapshot,
    max_distance: f32,
    geometry: &G,
) -> Option<PlayerId> {
    let direction = player.eye_forward.try_normalize()?;
    let hit = geometry.raycast(
        Ray::new(player.eye_position, direction),
        max_distance,
        LayerMask::PLAYER,
    )?;
    match hit.entity {
        HitEntity::Player(target) if target != player.id => Some(target),
        _ => None,
    }
}
