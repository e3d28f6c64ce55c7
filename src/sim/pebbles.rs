//! Pebble emitter
//!
//! Pebbles are spat from the salmon's mouth, fall under gravity and bounce
//! off each other, turtles, fish and the salmon itself. A fresh pebble cannot
//! hit the salmon until it has cleared the mouth and left the body
//! quadrilateral.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{is_inside_corners, nearest_edge, reflect_velocity};
use super::salmon::Salmon;
use crate::consts::*;
use crate::rotate_vec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pebble {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub radius: f32,
    pub life_ms: f32,
    /// Able to collide with the salmon
    pub armed: bool,
}

impl Pebble {
    /// Point of the pebble nearest to `target`'s center line
    fn near_point(&self, target: Vec2) -> Vec2 {
        self.position + (target - self.position).normalize_or_zero() * self.radius
    }
}

#[derive(Debug, Clone)]
pub struct Pebbles {
    pebbles: Vec<Pebble>,
    screen: Vec2,
    rng: Pcg32,
}

impl Pebbles {
    pub fn new(screen: Vec2, seed: u64) -> Self {
        Self {
            pebbles: Vec::new(),
            screen,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn pebbles(&self) -> &[Pebble] {
        &self.pebbles
    }

    pub fn len(&self) -> usize {
        self.pebbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pebbles.is_empty()
    }

    pub fn clear(&mut self) {
        self.pebbles.clear();
    }

    /// Place a pebble directly
    pub fn push(&mut self, pebble: Pebble) {
        self.pebbles.push(pebble);
    }

    /// Launch a pebble from `position` roughly along `heading`.
    ///
    /// Returns false when the emitter is full.
    pub fn spawn(&mut self, position: Vec2, heading: f32, gravity: f32) -> bool {
        if self.pebbles.len() > MAX_PEBBLES {
            return false;
        }

        let radius = (self.rng.random_range(0..PEBBLE_MAX_RADIUS) + PEBBLE_MIN_RADIUS) as f32;
        let spread = self
            .rng
            .random_range(-PEBBLE_SPREAD_DEG..PEBBLE_SPREAD_DEG) as f32;
        let angle = heading + spread.to_radians();

        self.pebbles.push(Pebble {
            position,
            velocity: rotate_vec(Vec2::new(PEBBLE_SPEED, 0.0), angle),
            acceleration: Vec2::new(0.0, gravity),
            radius,
            life_ms: PEBBLE_LIFE_MS,
            armed: false,
        });
        true
    }

    /// Age, cull and integrate all pebbles, then arm those clear of the salmon.
    ///
    /// `current` is the water current speed when pebbles are pushed back by it.
    pub fn update(&mut self, ms: f32, salmon: &Salmon, current: Option<f32>) {
        if self.pebbles.is_empty() {
            return;
        }

        for pebble in &mut self.pebbles {
            pebble.life_ms -= ms;
        }
        let screen = self.screen;
        self.pebbles.retain(|p| {
            p.life_ms >= 0.0
                && p.position.x + p.radius >= 0.0
                && p.position.x - p.radius <= screen.x
                && p.position.y + p.radius >= 0.0
                && p.position.y - p.radius <= screen.y
        });

        for pebble in &mut self.pebbles {
            pebble.acceleration.x = current.map_or(0.0, |speed| -speed * ms);
            pebble.velocity += pebble.acceleration;
            pebble.position += pebble.velocity * (ms / 1000.0);
        }

        let mouth = salmon.mouth_position();
        let corners = salmon.corners();
        for pebble in self.pebbles.iter_mut().filter(|p| !p.armed) {
            if pebble.position.distance(mouth) > 2.0 * pebble.radius
                && !is_inside_corners(pebble.near_point(salmon.position), &corners)
            {
                pebble.armed = true;
            }
        }
    }

    /// Pairwise pebble bounces. Only the first pebble of a pair is pushed apart.
    pub fn collide_pebbles(&mut self) {
        let n = self.pebbles.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let outer = self.pebbles[i];
                let inner = self.pebbles[j];
                let distance = outer.position.distance(inner.position);
                if distance > outer.radius + inner.radius {
                    continue;
                }

                self.pebbles[i].velocity = bounce(&outer, &inner);
                self.pebbles[j].velocity = bounce(&inner, &outer);

                let overlap = (outer.radius + inner.radius) - distance;
                if overlap > 0.0 {
                    self.pebbles[i].position +=
                        (outer.position - inner.position).normalize_or_zero() * overlap;
                }
            }
        }
    }

    /// Bounce pebbles off a round-ish textured body. Returns the number of hits.
    pub fn collide_with_body(&mut self, position: Vec2, bounding_box: Vec2) -> usize {
        let other_r = bounding_box.x.max(bounding_box.y);
        let mut hits = 0;
        for pebble in &mut self.pebbles {
            let delta = pebble.position - position;
            let d_sq = delta.length_squared();
            let r = other_r.max(pebble.radius) * CONTACT_RADIUS_FACTOR;
            if d_sq >= r * r {
                continue;
            }

            let normal = delta.normalize_or_zero();
            pebble.velocity = reflect_velocity(pebble.velocity, normal);
            let overlap = r - d_sq.sqrt();
            if overlap > 0.0 {
                pebble.position += normal * overlap;
            }
            hits += 1;
        }
        hits
    }

    /// Bounce armed pebbles off the salmon's corner quadrilateral
    pub fn collide_with_salmon(&mut self, salmon: &Salmon) {
        let corners = salmon.corners();
        for pebble in self.pebbles.iter_mut().filter(|p| p.armed) {
            let closest = pebble.near_point(salmon.position);
            if !is_inside_corners(closest, &corners) {
                continue;
            }
            let hit = nearest_edge(closest, &corners);
            pebble.position += hit.normal * hit.distance;
            pebble.velocity = reflect_velocity(pebble.velocity, hit.normal);
        }
    }
}

/// Equal-mass elastic response of `a` against `b`
fn bounce(a: &Pebble, b: &Pebble) -> Vec2 {
    let delta_pos = a.position - b.position;
    let sq = delta_pos.length_squared();
    if sq == 0.0 {
        return a.velocity;
    }
    let delta_vel = (a.velocity - b.velocity).dot(delta_pos) / sq;
    a.velocity - delta_pos * delta_vel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;

    fn screen() -> Vec2 {
        Vec2::new(1200.0, 800.0)
    }

    fn salmon() -> Salmon {
        Salmon::new(Rect::new(Vec2::new(50.0, 50.0), Vec2::new(1150.0, 750.0)))
    }

    fn pebble(position: Vec2, velocity: Vec2, radius: f32) -> Pebble {
        Pebble {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            radius,
            life_ms: PEBBLE_LIFE_MS,
            armed: false,
        }
    }

    #[test]
    fn test_spawn_respects_cap_and_ranges() {
        let mut emitter = Pebbles::new(screen(), 7);
        let mut spawned = 0;
        while emitter.spawn(Vec2::new(400.0, 400.0), 0.0, 2.0) {
            spawned += 1;
        }
        assert_eq!(spawned, MAX_PEBBLES + 1);
        for p in emitter.pebbles() {
            assert!(p.radius >= 7.0 && p.radius <= 16.0);
            assert!((p.velocity.length() - PEBBLE_SPEED).abs() < 1e-2);
            let angle = p.velocity.y.atan2(p.velocity.x).to_degrees();
            assert!((-15.001..14.001).contains(&angle));
            assert!(!p.armed);
        }
    }

    #[test]
    fn test_update_integrates_gravity() {
        let mut emitter = Pebbles::new(screen(), 1);
        let mut p = pebble(Vec2::new(600.0, 100.0), Vec2::new(100.0, 0.0), 8.0);
        p.acceleration = Vec2::new(0.0, 2.0);
        emitter.push(p);
        emitter.update(500.0, &salmon(), None);
        let p = emitter.pebbles()[0];
        assert_eq!(p.velocity, Vec2::new(100.0, 2.0));
        assert_eq!(p.position, Vec2::new(650.0, 101.0));
        assert_eq!(p.life_ms, PEBBLE_LIFE_MS - 500.0);
    }

    #[test]
    fn test_current_pushes_pebbles_back() {
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(Vec2::new(600.0, 100.0), Vec2::ZERO, 8.0));
        emitter.update(10.0, &salmon(), Some(0.5));
        assert_eq!(emitter.pebbles()[0].velocity, Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_expired_and_offscreen_pebbles_removed() {
        let mut emitter = Pebbles::new(screen(), 1);
        let mut old = pebble(Vec2::new(600.0, 100.0), Vec2::ZERO, 8.0);
        old.life_ms = 5.0;
        emitter.push(old);
        emitter.push(pebble(Vec2::new(-9.0, 100.0), Vec2::ZERO, 8.0));
        emitter.push(pebble(Vec2::new(-7.0, 100.0), Vec2::ZERO, 8.0));
        emitter.update(10.0, &salmon(), None);
        assert_eq!(emitter.len(), 1);
        assert_eq!(emitter.pebbles()[0].position.x, -7.0);
    }

    #[test]
    fn test_arming_after_leaving_mouth() {
        let s = salmon();
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(s.mouth_position(), Vec2::ZERO, 8.0));
        emitter.push(pebble(Vec2::new(600.0, 100.0), Vec2::ZERO, 8.0));
        emitter.update(1.0, &s, None);
        assert!(!emitter.pebbles()[0].armed);
        assert!(emitter.pebbles()[1].armed);
    }

    #[test]
    fn test_touching_pair_bounces_twice() {
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0), 10.0));
        emitter.push(pebble(Vec2::new(120.0, 100.0), Vec2::new(-10.0, 0.0), 10.0));
        emitter.collide_pebbles();
        let p = emitter.pebbles();
        // Touching pebbles are visited as (0, 1) then (1, 0); the second visit
        // undoes the first exchange
        assert_eq!(p[0].velocity, Vec2::new(10.0, 0.0));
        assert_eq!(p[1].velocity, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_overlapping_pebbles_pushed_apart() {
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0));
        emitter.push(pebble(Vec2::new(115.0, 100.0), Vec2::ZERO, 10.0));
        emitter.collide_pebbles();
        let p = emitter.pebbles();
        assert!(p[0].position.distance(p[1].position) >= 20.0 - 1e-3);
    }

    #[test]
    fn test_coincident_pebbles_do_not_produce_nan() {
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 10.0));
        emitter.push(pebble(Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0), 10.0));
        emitter.collide_pebbles();
        assert!(emitter.pebbles().iter().all(|p| p.velocity.is_finite() && p.position.is_finite()));
    }

    #[test]
    fn test_body_hit_reflects_and_pushes_out() {
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(Vec2::new(90.0, 0.0), Vec2::new(-50.0, 10.0), 8.0));
        let hits = emitter.collide_with_body(Vec2::ZERO, Vec2::new(200.0, 100.0));
        assert_eq!(hits, 1);
        let p = emitter.pebbles()[0];
        assert_eq!(p.velocity, Vec2::new(50.0, 10.0));
        // r = 0.6 * 200
        assert!((p.position.x - 120.0).abs() < 1e-3);

        assert_eq!(emitter.collide_with_body(Vec2::ZERO, Vec2::new(200.0, 100.0)), 0);
    }

    #[test]
    fn test_armed_pebble_bounces_off_salmon_top() {
        let s = salmon();
        let c = s.corners();
        let mut emitter = Pebbles::new(screen(), 1);
        // Just inside the top edge, falling onto the salmon
        let mut p = pebble(Vec2::new(s.position.x, c.top_left.y - 6.0), Vec2::new(0.0, 40.0), 8.0);
        p.armed = true;
        emitter.push(p);
        emitter.collide_with_salmon(&s);

        let p = emitter.pebbles()[0];
        assert!((p.velocity - Vec2::new(0.0, -40.0)).length() < 1e-3);
        assert!((p.position.y - (c.top_left.y - 8.0)).abs() < 1e-3);
    }

    #[test]
    fn test_unarmed_pebble_ignores_salmon() {
        let s = salmon();
        let mut emitter = Pebbles::new(screen(), 1);
        emitter.push(pebble(s.position, Vec2::new(0.0, 40.0), 8.0));
        emitter.collide_with_salmon(&s);
        assert_eq!(emitter.pebbles()[0].velocity, Vec2::new(0.0, 40.0));
    }
}
