//! Prey fish
//!
//! Fish swim from the right edge toward the left while keeping out of the
//! salmon's way: every path recompute plans a route to the far left at the
//! fish's current height that avoids the salmon's padded bounds.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::Rect;
use super::path::{PathSearch, fish_sector_valid};
use super::salmon::Salmon;
use super::steering;
use crate::assets::{AssetRegistry, Skin, TextureHandle};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Fish {
    pub position: Vec2,
    pub scale: Vec2,
    pub texture: TextureHandle,
    base_speed: f32,
    speed: f32,
    /// Remaining slow-down time
    slow_ms: f32,
    path: VecDeque<Vec2>,
}

impl Fish {
    pub fn new(texture: TextureHandle, skin: Skin, position: Vec2) -> Self {
        Self {
            position,
            scale: skin_scale(skin),
            texture,
            base_speed: FISH_SPEED,
            speed: FISH_SPEED,
            slow_ms: 0.0,
            path: VecDeque::new(),
        }
    }

    /// Follow the current path; `ms` is already scaled by the current speed
    pub fn update(&mut self, ms: f32) {
        if self.slow_ms > 0.0 {
            self.slow_ms -= ms;
            if self.slow_ms <= 0.0 {
                self.speed = self.base_speed;
            }
        }

        let step = self.speed * (ms / 1000.0);
        self.position = steering::advance(&mut self.path, self.position, step);
    }

    /// Plan a route to the left edge around the salmon
    pub fn calculate_path(&mut self, salmon: &Salmon) {
        let goal = Vec2::new(FISH_GOAL_X, self.position.y);
        let bounds = Rect::from_extents(FISH_SEARCH_BOUNDS);
        let salmon_area = salmon.avoid_rect(SALMON_AVOID_PADDING);

        self.path = PathSearch::fish(salmon.position)
            .search(self.position, goal, |p| fish_sector_valid(p, &bounds, &salmon_area))
            .path;
    }

    pub fn path(&self) -> &VecDeque<Vec2> {
        &self.path
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Hit by a pebble in shooting mode
    pub fn slow_down(&mut self) {
        self.speed = self.base_speed * FISH_SLOW_FACTOR;
        self.slow_ms = FISH_SLOW_MS;
    }

    pub fn bounding_box(&self, assets: &AssetRegistry) -> Vec2 {
        assets.bounding_box(self.texture, self.scale)
    }

    /// Switch texture and the matching draw scale
    pub fn reskin(&mut self, texture: TextureHandle, skin: Skin) {
        self.texture = texture;
        self.scale = skin_scale(skin);
    }
}

pub(crate) fn skin_scale(skin: Skin) -> Vec2 {
    match skin {
        Skin::Default => Vec2::from(CRITTER_SCALE),
        Skin::Alternate => Vec2::from(RESKIN_SCALE),
    }
}
