//! Predator turtles
//!
//! Turtles normally drift left with the current. In chase mode a single lead
//! turtle hunts the salmon along a searched path and speeds up as it closes
//! in.

use std::collections::VecDeque;

use glam::Vec2;

use super::fish::{Fish, skin_scale};
use super::geometry::Rect;
use super::path::{PathSearch, turtle_sector_valid};
use super::steering;
use crate::assets::{AssetRegistry, Skin, TextureHandle};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Turtle {
    pub position: Vec2,
    pub scale: Vec2,
    pub texture: TextureHandle,
    base_speed: f32,
    speed: f32,
    /// -1 while drifting left, +1 after being turned around
    heading: f32,
    chasing: bool,
    path: VecDeque<Vec2>,
}

impl Turtle {
    pub fn new(texture: TextureHandle, skin: Skin, position: Vec2) -> Self {
        Self {
            position,
            scale: skin_scale(skin),
            texture,
            base_speed: TURTLE_SPEED,
            speed: TURTLE_SPEED,
            heading: -1.0,
            chasing: false,
            path: VecDeque::new(),
        }
    }

    /// `ms` is already scaled by the current speed
    pub fn update(&mut self, ms: f32) {
        let step = self.speed * (ms / 1000.0);
        if self.chasing {
            self.position = steering::advance(&mut self.path, self.position, step);
        } else {
            self.position.x += self.heading * step;
        }
    }

    /// Enter or leave chase mode; either way speed and path start over
    pub fn set_chasing(&mut self, chasing: bool) {
        self.chasing = chasing;
        self.speed = self.base_speed;
        self.path.clear();
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    /// Speed up when within reach of the salmon
    pub fn update_speed(&mut self, salmon_position: Vec2) {
        let dist = self.position.distance(salmon_position);
        if dist > TURTLE_CHASE_RADIUS {
            return;
        }
        self.speed = (dist - TURTLE_CHASE_RADIUS).powi(2) / TURTLE_CHASE_FALLOFF + self.base_speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Plan a route to the salmon. The fish do not block turtles yet.
    pub fn calculate_path(&mut self, salmon_position: Vec2, fishes: &[Fish]) {
        let bounds = Rect::from_extents(TURTLE_SEARCH_BOUNDS);
        self.path = PathSearch::turtle()
            .search(self.position, salmon_position, |p| turtle_sector_valid(p, &bounds, fishes))
            .path;
    }

    pub fn path(&self) -> &VecDeque<Vec2> {
        &self.path
    }

    /// Hit by a pebble in shooting mode: swim the other way
    pub fn turn_around(&mut self) {
        self.heading = -self.heading;
        self.scale.x = -self.scale.x;
    }

    pub fn bounding_box(&self, assets: &AssetRegistry) -> Vec2 {
        assets.bounding_box(self.texture, self.scale)
    }

    pub fn reskin(&mut self, texture: TextureHandle, skin: Skin) {
        self.texture = texture;
        let facing = self.scale.x.signum() * CRITTER_SCALE[0].signum();
        self.scale = skin_scale(skin);
        self.scale.x *= facing;
    }
}
