//! Oriented collision geometry
//!
//! The salmon's body is approximated by a quadrilateral whose corners come
//! from its transformed mesh extrema. Pebbles test their near point against
//! that quadrilateral (split into two triangles) and bounce off the nearest
//! edge. Screen coordinates are y-down, so "top" means smaller y.

use glam::Vec2;

use crate::math::Transform;
use crate::mesh::MeshExtrema;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from `[min_x, max_x, min_y, max_y]`
    pub fn from_extents(extents: [f32; 4]) -> Self {
        Self::new(
            Vec2::new(extents[0], extents[2]),
            Vec2::new(extents[1], extents[3]),
        )
    }

    /// Inside or on the border
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Strictly inside (border excluded)
    #[inline]
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Corner quadrilateral of an oriented entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
}

/// Transform the four extremal corner samples of a mesh.
///
/// Samples are returned in nominal order: (left, top), (mouth, top),
/// (left, bottom), (mouth, bottom), each built from one coordinate of two
/// extremal vertices.
pub fn corner_samples(transform: &Transform, extrema: &MeshExtrema) -> [Vec2; 4] {
    [
        transform.apply(Vec2::new(extrema.left.x, extrema.top.y)),
        transform.apply(Vec2::new(extrema.mouth.x, extrema.top.y)),
        transform.apply(Vec2::new(extrema.left.x, extrema.bottom.y)),
        transform.apply(Vec2::new(extrema.mouth.x, extrema.bottom.y)),
    ]
}

/// Sort transformed samples into corner slots around `anchor`.
///
/// Each sample goes left or right of the anchor by x; within its side it is a
/// top corner if some other sample on that side lies below it. Samples are
/// placed in nominal order and later samples overwrite earlier ones, so
/// slots nobody claims keep their nominal sample. A sample exactly on the
/// anchor's x counts as right, but only strictly-right samples count as its
/// neighbors.
pub fn classify_corners(anchor: Vec2, samples: [Vec2; 4]) -> Corners {
    let mut corners = Corners {
        top_left: samples[0],
        top_right: samples[1],
        bottom_left: samples[2],
        bottom_right: samples[3],
    };

    for (i, &p) in samples.iter().enumerate() {
        let mut others = samples
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, o)| *o);

        if p.x < anchor.x {
            if others.any(|o| p.y < o.y && o.x < anchor.x) {
                corners.top_left = p;
            } else {
                corners.bottom_left = p;
            }
        } else if others.any(|o| p.y < o.y && o.x > anchor.x) {
            corners.top_right = p;
        } else {
            corners.bottom_right = p;
        }
    }

    corners
}

/// Corner quadrilateral of a mesh under `transform`, anchored at the transform's origin
pub fn corners(transform: &Transform, extrema: &MeshExtrema) -> Corners {
    let anchor = transform.apply(Vec2::ZERO);
    classify_corners(anchor, corner_samples(transform, extrema))
}

/// Which side of the line p2-p3 the point p1 is on
#[inline]
fn sign(p1: Vec2, p2: Vec2, p3: Vec2) -> f32 {
    (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
}

/// Point-in-triangle by sign consistency (edges count as inside)
pub fn is_inside_triangle(point: Vec2, v1: Vec2, v2: Vec2, v3: Vec2) -> bool {
    let d1 = sign(point, v1, v2);
    let d2 = sign(point, v2, v3);
    let d3 = sign(point, v3, v1);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Point inside the corner quadrilateral, tested as two triangles
pub fn is_inside_corners(point: Vec2, c: &Corners) -> bool {
    is_inside_triangle(point, c.top_left, c.top_right, c.bottom_left)
        || is_inside_triangle(point, c.bottom_right, c.top_right, c.bottom_left)
}

/// Perpendicular distance from `point` to the infinite line through `v1` and `v2`.
///
/// A degenerate edge (`v1 == v2`) is infinitely far away.
pub fn edge_distance(point: Vec2, v1: Vec2, v2: Vec2) -> f32 {
    let num = ((v2.y - v1.y) * point.x - (v2.x - v1.x) * point.y + v2.x * v1.y - v2.y * v1.x).abs();
    let den = ((v2.y - v1.y) * (v2.y - v1.y) + (v2.x - v1.x) * (v2.x - v1.x)).sqrt();
    if den == 0.0 {
        return f32::INFINITY;
    }
    num / den
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Edge of the quadrilateral a point is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Nearest edge with its outward normal and the push-out distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub edge: Edge,
    pub normal: Vec2,
    pub distance: f32,
}

/// Pick the edge closest to `point`.
///
/// An edge wins only if strictly closer than all three others, checked in
/// the order top, bottom, left; anything else resolves to the right edge.
pub fn nearest_edge(point: Vec2, c: &Corners) -> EdgeHit {
    let top = edge_distance(point, c.top_left, c.top_right);
    let bottom = edge_distance(point, c.bottom_left, c.bottom_right);
    let left = edge_distance(point, c.top_left, c.bottom_left);
    let right = edge_distance(point, c.top_right, c.bottom_right);

    let (edge, normal, distance) = if top < right.min(bottom.min(left)) {
        (Edge::Top, c.top_left - c.bottom_left, top)
    } else if bottom < top.min(left.min(right)) {
        (Edge::Bottom, c.bottom_left - c.top_left, bottom)
    } else if left < top.min(bottom.min(right)) {
        (Edge::Left, c.top_left - c.top_right, left)
    } else {
        (Edge::Right, c.top_right - c.top_left, right)
    };

    EdgeHit {
        edge,
        normal: normal.normalize_or_zero(),
        distance,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::mesh::Mesh;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_reflection_flips_normal_component(
            vx in -1000.0f32..1000.0,
            vy in -1000.0f32..1000.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(angle.cos(), angle.sin());
            let r = reflect_velocity(v, n);
            let tangent = n.perp();

            prop_assert!((r.dot(n) + v.dot(n)).abs() < 1e-2);
            prop_assert!((r.dot(tangent) - v.dot(tangent)).abs() < 1e-2);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
        }

        #[test]
        fn test_corners_are_pure(
            x in 0.0f32..1200.0,
            y in 0.0f32..800.0,
            radians in -10.0f32..10.0,
        ) {
            let mesh = Mesh::salmon();
            let transform = Transform::from_motion(Vec2::new(x, y), radians, Vec2::new(-35.0, 35.0));
            let first = corners(&transform, &mesh.extrema);
            let second = corners(&transform, &mesh.extrema);
            prop_assert_eq!(first, second);
        }
    }
}
