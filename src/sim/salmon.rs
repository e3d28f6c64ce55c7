//! The player-controlled salmon
//!
//! The salmon is the only mesh-based entity. Its transformed mesh is used for
//! wall collision and push-back, and its mesh extrema give the mouth (where
//! pebbles are emitted) and the corner quadrilateral pebbles bounce off.

use glam::Vec2;

use super::geometry::{self, Corners, Rect};
use crate::consts::*;
use crate::math::Transform;
use crate::mesh::Mesh;
use crate::{axis_sign, rotate_vec};

#[derive(Debug, Clone)]
pub struct Salmon {
    pub position: Vec2,
    /// Facing angle
    pub radians: f32,
    pub scale: Vec2,
    /// Local-space body extent along x (min, max)
    pub x_bounds: Vec2,
    /// Local-space body extent along y (min, max)
    pub y_bounds: Vec2,
    /// Sinking speed once dead (px/s)
    pub sink_speed: f32,
    pub move_speed: f32,
    pub rotate_amount: f32,
    /// Local velocity, rotated by the facing angle when applied
    velocity: Vec2,
    /// Turn direction while a turn key is held
    rotating: Option<f32>,
    alive: bool,
    light_up_ms: f32,
    level: Rect,
    mesh: Mesh,
    /// Local vertices outside the level at the last mesh test
    collision_points: Vec<Vec2>,
}

impl Salmon {
    /// A live salmon at its start position inside `level`
    pub fn new(level: Rect) -> Self {
        Self {
            position: Vec2::from(SALMON_START),
            radians: 0.0,
            scale: Vec2::from(SALMON_SCALE),
            x_bounds: Vec2::from(SALMON_X_BOUNDS),
            y_bounds: Vec2::from(SALMON_Y_BOUNDS),
            sink_speed: SALMON_SINK_SPEED,
            move_speed: SALMON_MOVE_SPEED,
            rotate_amount: SALMON_ROTATE_AMOUNT,
            velocity: Vec2::ZERO,
            rotating: None,
            alive: true,
            light_up_ms: -1.0,
            level,
            mesh: Mesh::salmon(),
            collision_points: Vec::new(),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_motion(self.position, self.radians, self.scale)
    }

    /// Advance one tick
    pub fn update(&mut self, ms: f32) {
        if self.alive {
            if let Some(direction) = self.rotating {
                self.radians += direction * self.rotate_amount;
            }
            self.move_by(self.velocity * self.move_speed);
        } else {
            // Belly up, sinking
            self.radians = std::f32::consts::PI;
            self.move_by(Vec2::new(0.0, self.sink_speed * (ms / 1000.0)));
        }

        if self.light_up_ms > 0.0 {
            self.light_up_ms -= ms;
        }
    }

    /// Move by `offset`, expressed in the facing frame while alive
    pub fn move_by(&mut self, offset: Vec2) {
        let offset = if self.alive {
            rotate_vec(offset, self.radians)
        } else {
            offset
        };
        self.position += offset;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Start turning; positive is clockwise on screen
    pub fn start_rotating(&mut self, direction: f32) {
        self.rotating = Some(direction);
    }

    pub fn stop_rotating(&mut self) {
        self.rotating = None;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn light_up(&mut self) {
        self.light_up_ms = LIGHT_UP_MS;
    }

    pub fn is_lit(&self) -> bool {
        self.light_up_ms > 0.0
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn level(&self) -> Rect {
        self.level
    }

    /// Rough circle contact with a textured entity
    pub fn collides_with(&self, position: Vec2, bounding_box: Vec2) -> bool {
        let d_sq = self.position.distance_squared(position);
        let other_r = bounding_box.x.max(bounding_box.y);
        let my_r = self.scale.x.max(self.scale.y);
        let r = other_r.max(my_r) * CONTACT_RADIUS_FACTOR;
        d_sq < r * r
    }

    /// Wall test: a cheap local-bounds check, confirmed against the mesh
    pub fn collides_with_wall(&mut self) -> bool {
        self.bounding_box_collision() && self.mesh_collision()
    }

    fn bounding_box_collision(&self) -> bool {
        let sx = self.scale.x.abs();
        let sy = self.scale.y.abs();
        self.position.x + self.x_bounds.x * sx < self.level.min.x
            || self.position.x + self.x_bounds.y * sx > self.level.max.x
            || self.position.y + self.y_bounds.x * sy < self.level.min.y
            || self.position.y + self.y_bounds.y * sy > self.level.max.y
    }

    fn mesh_collision(&mut self) -> bool {
        let transform = self.transform();
        let level = self.level;
        self.collision_points = self
            .mesh
            .vertices
            .iter()
            .map(|v| v.xy())
            .filter(|&local| {
                let p = transform.apply(local);
                p.x < level.min.x || p.x > level.max.x || p.y < level.min.y || p.y > level.max.y
            })
            .collect();
        // Most recently found first
        self.collision_points.reverse();
        !self.collision_points.is_empty()
    }

    pub fn collision_points(&self) -> &[Vec2] {
        &self.collision_points
    }

    /// Bounce off the nearest wall and push the body back inside the level.
    ///
    /// The wall is picked from the salmon's position, not from the vertices
    /// that crossed. The new heading is the angle between `velocity` and its
    /// mirrored, rotated counterpart; a NaN angle leaves the heading alone.
    pub fn reverse_direction(&mut self, velocity: Vec2) {
        let level = self.level;
        let p = self.position;
        let mut min_dist = 1_000_000.0;
        let mut x_axis_reflect = false;

        let left = (p.x - level.min.x).abs();
        if left < min_dist {
            min_dist = left;
        }
        let bottom = (p.y - level.max.y).abs();
        if bottom < min_dist {
            x_axis_reflect = true;
            min_dist = bottom;
        }
        let right = (p.x - level.max.x).abs();
        if right < min_dist {
            x_axis_reflect = false;
            min_dist = right;
        }
        let top = (p.y - level.min.y).abs();
        if top < min_dist {
            x_axis_reflect = true;
        }

        let mut reflected = rotate_vec(velocity, self.radians);
        if x_axis_reflect {
            reflected.y = -reflected.y;
        } else {
            reflected.x = -reflected.x;
        }

        let mut theta = (reflected.dot(velocity) / (reflected.length() * velocity.length())).acos();
        if (theta - self.radians).abs() < 0.00001 {
            theta = -theta;
        }
        if !x_axis_reflect && velocity.x != 0.0 && axis_sign(reflected.y) != axis_sign(velocity.x) {
            theta = -theta;
        }
        if !theta.is_nan() {
            self.radians = theta;
        }

        self.push_inside();
    }

    /// Translate so the transformed mesh sits one unit inside every crossed wall
    fn push_inside(&mut self) {
        let transform = self.transform();
        let mut min = Vec2::splat(10_000.0);
        let mut max = Vec2::ZERO;
        for vertex in &self.mesh.vertices {
            let p = transform.apply(vertex.xy());
            min = min.min(p);
            max = max.max(p);
        }

        let level = self.level;
        if min.x < level.min.x {
            self.position.x += (level.min.x - min.x) + 1.0;
        }
        if max.x > level.max.x {
            self.position.x += (level.max.x - max.x) - 1.0;
        }
        if min.y < level.min.y {
            self.position.y += (level.min.y - min.y) + 1.0;
        }
        if max.y > level.max.y {
            self.position.y += (level.max.y - max.y) - 1.0;
        }
    }

    /// World position of the mouth vertex
    pub fn mouth_position(&self) -> Vec2 {
        self.transform().apply(self.mesh.extrema.mouth)
    }

    /// Corner quadrilateral of the current pose
    pub fn corners(&self) -> Corners {
        geometry::corners(&self.transform(), &self.mesh.extrema)
    }

    /// World rectangle of the local bounds grown by `padding` (local units)
    pub fn avoid_rect(&self, padding: f32) -> Rect {
        let sx = self.scale.x.abs();
        let sy = self.scale.y.abs();
        Rect::new(
            Vec2::new(
                self.position.x + (self.x_bounds.x - padding) * sx,
                self.position.y + (self.y_bounds.x - padding) * sy,
            ),
            Vec2::new(
                self.position.x + (self.x_bounds.y + padding) * sx,
                self.position.y + (self.y_bounds.y + padding) * sy,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Rect {
        Rect::new(Vec2::new(50.0, 50.0), Vec2::new(1150.0, 750.0))
    }

    fn mesh_extent(salmon: &Salmon) -> (Vec2, Vec2) {
        let t = salmon.transform();
        salmon.mesh().vertices.iter().map(|v| t.apply(v.xy())).fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p), hi.max(p)),
        )
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let mut salmon = Salmon::new(level());
        salmon.set_velocity(Vec2::new(1.0, 0.0));
        salmon.update(16.0);
        assert_eq!(salmon.position, Vec2::new(303.0, 400.0));
    }

    #[test]
    fn test_rotation_while_held() {
        let mut salmon = Salmon::new(level());
        salmon.start_rotating(1.0);
        salmon.update(16.0);
        salmon.update(16.0);
        assert!((salmon.radians - 0.07).abs() < 1e-6);
        salmon.stop_rotating();
        salmon.update(16.0);
        assert!((salmon.radians - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_dead_salmon_sinks_belly_up() {
        let mut salmon = Salmon::new(level());
        salmon.set_velocity(Vec2::new(1.0, 0.0));
        salmon.kill();
        salmon.update(500.0);
        assert_eq!(salmon.radians, std::f32::consts::PI);
        assert_eq!(salmon.position, Vec2::new(300.0, 500.0));
    }

    #[test]
    fn test_light_up_counts_down() {
        let mut salmon = Salmon::new(level());
        assert!(!salmon.is_lit());
        salmon.light_up();
        salmon.update(1000.0);
        assert!(salmon.is_lit());
        salmon.update(600.0);
        assert!(!salmon.is_lit());
    }

    #[test]
    fn test_mouth_is_in_front() {
        let salmon = Salmon::new(level());
        // Negative x scale puts the head on the +x side
        assert!((salmon.mouth_position() - Vec2::new(405.0, 400.0)).length() < 1e-3);
    }

    #[test]
    fn test_contact_radius() {
        let salmon = Salmon::new(level());
        // r = 0.6 * max(84, 35) = 50.4
        let bb = Vec2::new(84.0, 76.0);
        assert!(salmon.collides_with(Vec2::new(350.0, 400.0), bb));
        assert!(!salmon.collides_with(Vec2::new(351.0, 400.0), bb));
    }

    #[test]
    fn test_wall_needs_mesh_confirmation() {
        let mut salmon = Salmon::new(level());
        assert!(!salmon.collides_with_wall());

        // Local bounds reach 1150 + 4.2 * 35 - 1150 past the wall but the mesh tip
        // (3 * 35) stops short
        salmon.position = Vec2::new(1150.0 - 3.0 * 35.0 - 1.0, 400.0);
        assert!(!salmon.collides_with_wall());

        salmon.position.x += 10.0;
        assert!(salmon.collides_with_wall());
        assert!(salmon.collision_points().contains(&Vec2::new(-3.0, 0.0)));
    }

    #[test]
    fn test_reverse_off_right_wall() {
        let mut salmon = Salmon::new(level());
        salmon.position = Vec2::new(1140.0, 400.0);
        salmon.reverse_direction(Vec2::new(1.0, 0.0));

        assert!((salmon.radians + std::f32::consts::PI).abs() < 1e-5);
        let (lo, hi) = mesh_extent(&salmon);
        assert!(hi.x <= 1150.0);
        assert!(lo.x >= 50.0);
        assert!((salmon.position.x - 1044.0).abs() < 0.1);
    }

    #[test]
    fn test_reverse_off_bottom_wall_mirrors_heading() {
        let mut salmon = Salmon::new(level());
        salmon.position = Vec2::new(600.0, 740.0);
        salmon.radians = 0.5;
        salmon.reverse_direction(Vec2::new(1.0, 0.0));

        assert!((salmon.radians + 0.5).abs() < 1e-4);
        let (_, hi) = mesh_extent(&salmon);
        assert!(hi.y <= 750.0);
    }

    #[test]
    fn test_reverse_with_zero_velocity_keeps_heading() {
        let mut salmon = Salmon::new(level());
        salmon.radians = 0.3;
        salmon.reverse_direction(Vec2::ZERO);
        assert_eq!(salmon.radians, 0.3);
    }

    #[test]
    fn test_avoid_rect_scales_padding() {
        let salmon = Salmon::new(level());
        let rect = salmon.avoid_rect(0.25);
        assert!((rect.min.x - (300.0 - 4.45 * 35.0)).abs() < 1e-3);
        assert!((rect.max.y - (400.0 + 4.25 * 35.0)).abs() < 1e-3);
    }

    #[test]
    fn test_corners_track_pose() {
        let mut salmon = Salmon::new(level());
        let c = salmon.corners();
        assert!(c.top_left.x < salmon.position.x && c.top_left.y < salmon.position.y);
        assert!(c.bottom_right.x > salmon.position.x && c.bottom_right.y > salmon.position.y);

        salmon.position += Vec2::new(10.0, 0.0);
        let moved = salmon.corners();
        assert!((moved.top_left - c.top_left - Vec2::new(10.0, 0.0)).length() < 1e-3);
    }
}
