//! # In-Memory Host
//!
//! Scriptable implementations of [`GeometrySource`] and [`SessionControl`]
//! for tests, benchmarks and the audit tool.
//!
//! The world is a flat terrain plane at `y = 0`, axis-aligned construction
//! boxes, and one box-shaped hitbox per player:
//!
//! ```text
//!        ┌──┐ 2.0  player hitbox: 0.8 x 2.0 x 0.8, feet at `position`
//!        │  │
//!  ══════╧══╧══════ 0.0  terrain (TERRAIN layer)
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use warden_shared::{LayerMask, Ray, Vec3};

use crate::error::SessionError;
use crate::escalation::SessionControl;
use crate::source::{FrameTiming, GeometrySource, HitEntity, PlayerId, PlayerSnapshot, RayHit, Timestamp};

/// Half extents of every player hitbox.
const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 1.0, 0.4);

/// Wall clock at monotonic time zero.
const EPOCH_OFFSET_SECS: u64 = 1_700_000_000;

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Aabb {
    center: Vec3,
    half_extents: Vec3,
}

impl Aabb {
    fn player(position: Vec3) -> Self {
        Self {
            center: position + Vec3::new(0.0, PLAYER_HALF_EXTENTS.y, 0.0),
            half_extents: PLAYER_HALF_EXTENTS,
        }
    }

    /// Entry distance along `ray` (slab method), clamped to 0.
    fn ray_intersects(&self, ray: Ray) -> Option<f32> {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let origin = ray.origin;
        let inv = Vec3::new(1.0 / ray.direction.x, 1.0 / ray.direction.y, 1.0 / ray.direction.z);

        let t1 = (min.x - origin.x) * inv.x;
        let t2 = (max.x - origin.x) * inv.x;
        let t3 = (min.y - origin.y) * inv.y;
        let t4 = (max.y - origin.y) * inv.y;
        let t5 = (min.z - origin.z) * inv.z;
        let t6 = (max.z - origin.z) * inv.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax < 0.0 || tmin > tmax {
            None
        } else {
            Some(tmin.max(0.0))
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.half_extents.x
            && (point.y - self.center.y).abs() <= self.half_extents.y
            && (point.z - self.center.z).abs() <= self.half_extents.z
    }
}

#[derive(Debug)]
struct World {
    players: HashMap<PlayerId, PlayerSnapshot>,
    walls: Vec<Aabb>,
    terrain: bool,
    now: Timestamp,
    timing: FrameTiming,
}

/// Scriptable world: players, walls, terrain and a manual clock.
///
/// All setters take `&self` so a world can be shared with a monitor and
/// still be driven by the test.
#[derive(Debug)]
pub struct MockGeometrySource {
    world: RwLock<World>,
}

impl MockGeometrySource {
    /// Empty world with terrain, time zero and a steady 30 Hz server.
    #[must_use]
    pub fn new() -> Self {
        Self {
            world: RwLock::new(World {
                players: HashMap::new(),
                walls: Vec::new(),
                terrain: true,
                now: 0.0,
                timing: FrameTiming::default(),
            }),
        }
    }

    /// Adds or replaces a player.
    pub fn upsert_player(&self, player: PlayerSnapshot) {
        self.world.write().players.insert(player.id, player);
    }

    /// Edits a stored player in place. Returns false if unknown.
    pub fn update_player(&self, id: PlayerId, f: impl FnOnce(&mut PlayerSnapshot)) -> bool {
        match self.world.write().players.get_mut(&id) {
            Some(player) => {
                f(player);
                true
            }
            None => false,
        }
    }

    /// Removes a player.
    pub fn remove_player(&self, id: PlayerId) {
        self.world.write().players.remove(&id);
    }

    /// Adds a solid construction box.
    pub fn add_wall(&self, center: Vec3, half_extents: Vec3) {
        self.world.write().walls.push(Aabb { center, half_extents });
    }

    /// Enables or removes the terrain plane.
    pub fn set_terrain(&self, enabled: bool) {
        self.world.write().terrain = enabled;
    }

    /// Sets the monotonic clock.
    pub fn set_time(&self, now: Timestamp) {
        self.world.write().now = now;
    }

    /// Moves the monotonic clock forward.
    pub fn advance(&self, seconds: f64) {
        self.world.write().now += seconds;
    }

    /// Sets the frame durations reported to the engine.
    pub fn set_frame_timing(&self, timing: FrameTiming) {
        self.world.write().timing = timing;
    }
}

impl Default for MockGeometrySource {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometrySource for MockGeometrySource {
    fn player(&self, id: PlayerId) -> Option<PlayerSnapshot> {
        self.world.read().players.get(&id).cloned()
    }

    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let direction = ray.direction.try_normalize()?;
        let ray = Ray::new(ray.origin, direction);
        let world = self.world.read();
        let mut best: Option<RayHit> = None;
        let mut consider = |distance: f32, entity: HitEntity| {
            if distance <= max_distance && best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit { distance, entity });
            }
        };

        if world.terrain && mask.intersects(LayerMask::TERRAIN) && direction.y != 0.0 {
            let t = -ray.origin.y / direction.y;
            if t >= 0.0 {
                consider(t, HitEntity::Obstruction);
            }
        }

        if mask.intersects(LayerMask::CONSTRUCTION) {
            for wall in &world.walls {
                if let Some(t) = wall.ray_intersects(ray) {
                    consider(t, HitEntity::Obstruction);
                }
            }
        }

        if mask.intersects(LayerMask::PLAYER) {
            for player in world.players.values() {
                let hitbox = Aabb::player(player.position);
                // A ray cast from inside a hitbox belongs to that player
                if hitbox.contains(ray.origin) {
                    continue;
                }
                if let Some(t) = hitbox.ray_intersects(ray) {
                    consider(t, HitEntity::Player(player.id));
                }
            }
        }

        best
    }

    fn frame_timing(&self) -> FrameTiming {
        self.world.read().timing
    }

    fn now(&self) -> Timestamp {
        self.world.read().now
    }

    fn wall_clock(&self) -> SystemTime {
        let now = self.world.read().now.max(0.0);
        UNIX_EPOCH + Duration::from_secs(EPOCH_OFFSET_SECS) + Duration::from_secs_f64(now)
    }
}

/// Session layer that records kicks and bans instead of enforcing them.
#[derive(Debug, Default)]
pub struct MockSessionControl {
    kicks: Mutex<Vec<(PlayerId, String)>>,
    bans: Mutex<Vec<(PlayerId, String)>>,
    failing: AtomicBool,
}

impl MockSessionControl {
    /// Accepting session layer with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent kick and ban fail (still recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Kicks attempted so far, oldest first.
    #[must_use]
    pub fn kicks(&self) -> Vec<(PlayerId, String)> {
        self.kicks.lock().clone()
    }

    /// Bans attempted so far, oldest first.
    #[must_use]
    pub fn bans(&self) -> Vec<(PlayerId, String)> {
        self.bans.lock().clone()
    }

    fn outcome(&self, action: &'static str, player: PlayerId) -> Result<(), SessionError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SessionError::Rejected {
                action,
                player,
                reason: "session layer unavailable".to_owned(),
            })
        } else {
            Ok(())
        }
    }
}

impl SessionControl for MockSessionControl {
    fn kick(&self, player: PlayerId, reason: &str) -> Result<(), SessionError> {
        self.kicks.lock().push((player, reason.to_owned()));
        self.outcome("kick", player)
    }

    fn ban(&self, player: PlayerId, reason: &str) -> Result<(), SessionError> {
        self.bans.lock().push((player, reason.to_owned()));
        self.outcome("ban", player)
    }
}
