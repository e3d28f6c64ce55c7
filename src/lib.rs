//! Salmon Chase - a 2D arcade game about a salmon, hungry turtles and fish
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (pathfinding, steering, collisions, world state)
//! - `math`: 3x3 affine transforms for entity placement
//! - `mesh`: Salmon body mesh and its extremal vertices
//! - `assets`: Owned texture/sound registry shared by entity species
//! - `audio`: Sound effect seam toward the platform mixer
//! - `settings`: Data-driven game tuning

pub mod assets;
pub mod audio;
pub mod math;
pub mod mesh;
pub mod settings;
pub mod sim;

pub use assets::{AssetRegistry, Species, TextureHandle};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Grid spacing used by the sector search
    pub const SEARCH_STEP: f32 = 50.0;
    /// Waypoints closer than this are considered reached
    pub const WAYPOINT_REACHED: f32 = 10.0;
    /// Safety cap on sector expansions for unbounded validity predicates
    pub const MAX_EXPANSIONS: usize = 20_000;

    /// Fish search rectangle (min x, max x, min y, max y)
    pub const FISH_SEARCH_BOUNDS: [f32; 4] = [-200.0, 1400.0, -75.0, 875.0];
    /// Turtle search rectangle (looser vertically than the fish one)
    pub const TURTLE_SEARCH_BOUNDS: [f32; 4] = [-200.0, 1400.0, -100.0, 900.0];
    /// Padding added around the salmon's local bounds for fish avoidance
    pub const SALMON_AVOID_PADDING: f32 = 0.25;
    /// Fish flee toward this x coordinate
    pub const FISH_GOAL_X: f32 = -150.0;

    /// Entity limits and spawn delays
    pub const MAX_TURTLES: usize = 15;
    pub const MAX_FISH: usize = 5;
    pub const TURTLE_DELAY_MS: f32 = 3000.0;
    pub const FISH_DELAY_MS: f32 = 2000.0;
    /// Entities spawn this far past the right edge of the screen
    pub const SPAWN_OFFSET_X: f32 = 150.0;

    /// Salmon defaults
    pub const SALMON_START: [f32; 2] = [300.0, 400.0];
    pub const SALMON_SCALE: [f32; 2] = [-35.0, 35.0];
    pub const SALMON_X_BOUNDS: [f32; 2] = [-4.2, 4.2];
    pub const SALMON_Y_BOUNDS: [f32; 2] = [-3.8, 4.0];
    pub const SALMON_SINK_SPEED: f32 = 200.0;
    pub const SALMON_MOVE_SPEED: f32 = 3.0;
    pub const SALMON_ROTATE_AMOUNT: f32 = 0.035;
    pub const LIGHT_UP_MS: f32 = 1500.0;
    /// Momentum decay per tick in mode 1
    pub const MOMENTUM_DECAY: f32 = 0.02;

    /// Fish / turtle defaults
    pub const FISH_SPEED: f32 = 380.0;
    pub const FISH_SLOW_FACTOR: f32 = 0.5;
    pub const FISH_SLOW_MS: f32 = 2000.0;
    pub const TURTLE_SPEED: f32 = 200.0;
    pub const CRITTER_SCALE: [f32; 2] = [-0.4, 0.4];
    pub const RESKIN_SCALE: [f32; 2] = [-0.3, 0.3];
    /// Chasing turtle accelerates inside this distance
    pub const TURTLE_CHASE_RADIUS: f32 = 800.0;
    pub const TURTLE_CHASE_FALLOFF: f32 = 1500.0;
    /// Turtles further than this past the right edge are culled
    pub const TURTLE_CULL_MARGIN: f32 = 200.0;

    /// Pebble defaults
    pub const MAX_PEBBLES: usize = 25;
    pub const PEBBLE_LIFE_MS: f32 = 30_000.0;
    pub const PEBBLE_MIN_RADIUS: u32 = 7;
    pub const PEBBLE_MAX_RADIUS: u32 = 10;
    pub const PEBBLE_SPEED: f32 = 250.0;
    /// Half the launch spread, in degrees
    pub const PEBBLE_SPREAD_DEG: i32 = 15;

    /// How long a wall-hit vertex stays on the debug overlay
    pub const DEBUG_POINT_LIFE_MS: f32 = 1500.0;

    /// Circle-approximation factor for contact tests
    pub const CONTACT_RADIUS_FACTOR: f32 = 0.6;
    /// Seconds the world waits after the salmon dies before resetting
    pub const DEATH_RESET_MS: f32 = 5000.0;
}

/// Rotate a vector counter-clockwise by `radians`
#[inline]
pub fn rotate_vec(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Sign of a float as -1, 0 or 1 (zero stays zero)
#[inline]
pub fn axis_sign(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value / value.abs() }
}
