//! Search graph nodes
//!
//! A sector is one grid-aligned cell visited by the path search. Its score is
//! deliberately not the textbook `g + h`: it adds the distance to an arbitrary
//! reference point (normally the last finalized sector) to the distance to
//! the goal, and the accumulated move cost never takes part in ordering.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub position: Vec2,
    pub goal: Vec2,
    pub step: f32,
    pub move_cost: f32,
}

impl Sector {
    pub fn new(position: Vec2, goal: Vec2, step: f32, move_cost: f32) -> Self {
        Self {
            position,
            goal,
            step,
            move_cost,
        }
    }

    /// Score relative to `reference`: `dist(position, reference) + dist(position, goal)`
    #[inline]
    pub fn heuristic(&self, reference: Vec2) -> f32 {
        self.position.distance(reference) + self.position.distance(self.goal)
    }

    /// Within one step of the goal
    #[inline]
    pub fn is_goal(&self) -> bool {
        self.goal.distance(self.position) <= self.step
    }

    /// Same grid cell (positions are float sums, so compare with a small tolerance)
    #[inline]
    pub fn same_cell(&self, other: &Sector) -> bool {
        self.position.distance(other.position) < 0.01
    }
}

/// How accumulated move cost grows per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Added to the plain `step * sqrt(2)` diagonal cost
    pub diagonal_adjust: f32,
}

impl CostModel {
    /// Fish: exact diagonal cost
    pub const FISH: CostModel = CostModel {
        diagonal_adjust: 0.0,
    };
    /// Turtle: diagonals are one unit cheaper
    pub const TURTLE: CostModel = CostModel {
        diagonal_adjust: -1.0,
    };

    /// Cost of stepping from `from` to `to`
    pub fn step_cost(&self, from: Vec2, to: Vec2, step: f32) -> f32 {
        let orthogonal = (from.x - to.x).abs() < 0.001 || (from.y - to.y).abs() < 0.001;
        if orthogonal {
            step
        } else {
            (step * step + step * step).sqrt() + self.diagonal_adjust
        }
    }
}
