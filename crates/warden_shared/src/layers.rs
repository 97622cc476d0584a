//! Collision layer filters for raycast queries.
//!
//! The host maps these bits onto its own physics layers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bit set of collision layers a raycast may hit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct LayerMask: u32 {
        /// Heightmap terrain.
        const TERRAIN = 1 << 0;
        /// Static world geometry (rocks, cliffs, monuments).
        const WORLD = 1 << 1;
        /// Player-built structures.
        const CONSTRUCTION = 1 << 2;
        /// Player hitboxes.
        const PLAYER = 1 << 3;

        /// Ground used for height-above-ground probes.
        const GROUND = Self::TERRAIN.bits() | Self::WORLD.bits();
        /// Anything that blocks line of sight.
        const SOLID = Self::GROUND.bits() | Self::CONSTRUCTION.bits();
    }
}
