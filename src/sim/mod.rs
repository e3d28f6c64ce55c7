//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod fish;
pub mod geometry;
pub mod path;
pub mod pebbles;
pub mod salmon;
pub mod sector;
pub mod state;
pub mod steering;
pub mod tick;
pub mod turtle;

pub use fish::Fish;
pub use geometry::{Corners, Edge, EdgeHit, Rect, nearest_edge, reflect_velocity};
pub use path::{PathSearch, SearchResult, find_path};
pub use pebbles::{Pebble, Pebbles};
pub use salmon::Salmon;
pub use sector::{CostModel, Sector};
pub use state::{CollisionMark, GameEvent, GameState, Modes, PebbleGroup};
pub use tick::{Key, KeyAction, KeyEvent, TickInput, handle_key, shoot, tick};
pub use turtle::Turtle;
