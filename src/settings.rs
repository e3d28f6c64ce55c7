//! Game settings
//!
//! Tunables read from a JSON file next to the binary. Any missing field takes
//! its default, and an unreadable or malformed file falls back to defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geometry::Rect;

/// Frame skip bounds and increment
pub const FRAME_SKIP_MIN: u32 = 10;
pub const FRAME_SKIP_MAX: u32 = 100;
pub const FRAME_SKIP_STEP: u32 = 10;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical screen size
    pub screen: Vec2,
    /// Distance between the screen edge and the salmon's walls
    pub level_padding: f32,
    /// Ticks between path recomputes
    pub frame_skip: u32,
    /// Water current multiplier applied to critter movement and spawning
    pub current_speed: f32,

    // === Pebbles ===
    /// Downward acceleration added per tick
    pub gravity: f32,
    /// Delay between automatic pebble groups
    pub pebble_group_frequency_ms: f32,
    /// Delay between pebbles of one group
    pub pebble_frequency_ms: f32,
    /// Group size: minimum and random extra
    pub pebble_group_size: (u32, u32),
    /// Cooldown between shots in shooting mode
    pub shoot_frequency_ms: f32,

    // === Debug ===
    /// How long the salmon freezes on a wall hit in debug mode
    pub freeze_time_ms: f32,

    // === Audio ===
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,

    /// World RNG seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen: Vec2::new(1200.0, 800.0),
            level_padding: 50.0,
            frame_skip: 40,
            current_speed: 0.25,

            gravity: 2.0,
            pebble_group_frequency_ms: 500.0,
            pebble_frequency_ms: 200.0,
            pebble_group_size: (3, 5),
            shoot_frequency_ms: 1000.0,

            freeze_time_ms: 500.0,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            seed: 0x5A1_404,
        }
    }
}

impl Settings {
    /// Walls the salmon bounces off
    pub fn level_bounds(&self) -> Rect {
        let pad = Vec2::splat(self.level_padding);
        Rect::new(pad, self.screen - pad)
    }

    /// Clamp values the game steps through at runtime
    pub fn sanitized(mut self) -> Self {
        self.frame_skip = clamp_frame_skip(self.frame_skip);
        self.current_speed = self.current_speed.max(0.0);
        self
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }
}

/// Keep frame skip within its runtime range
pub fn clamp_frame_skip(frame_skip: u32) -> u32 {
    frame_skip.clamp(FRAME_SKIP_MIN, FRAME_SKIP_MAX)
}
