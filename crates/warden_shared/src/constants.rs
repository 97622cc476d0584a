//! # Detection Constants
//!
//! Fixed values baked into the detection engine.
//!
//! **NOTE:** Everything deployment-specific lives in `WardenConfig`.
//! These are properties of the host simulation, not tuning knobs.

// =============================================================================
// CLIENT / SERVER TIMING
// =============================================================================

/// Client simulation rate the desync envelopes assume (frames per second)
pub const CLIENT_FRAME_RATE: f32 = 60.0;

/// Client frames of slack granted to ranged hits (2 frames = 1/30 s)
pub const PROJECTILE_CLIENT_FRAMES: f32 = 2.0;

/// Server frames of slack granted to ranged hits
pub const PROJECTILE_SERVER_FRAMES: f32 = 2.0;

/// Client frames of slack granted to melee hits (swing animations run long)
pub const MELEE_CLIENT_FRAMES: f32 = 3.0;

/// Server frames of slack granted to melee hits
pub const MELEE_SERVER_FRAMES: f32 = 2.0;

/// Multiplier applied to every desync time envelope
pub const DESYNC_FORGIVENESS: f32 = 1.5;

/// Fixed padding added to the ranged origin envelope (metres)
pub const PROJECTILE_ORIGIN_PADDING: f32 = 3.0;

// =============================================================================
// HEURISTIC HORIZONS
// =============================================================================

/// Rolling window of the wall-trace counter (seconds)
pub const WALL_TRACE_WINDOW: f64 = 30.0;

/// Maximum reach of the height-above-ground probe (metres)
pub const GROUND_PROBE_DISTANCE: f32 = 1000.0;
