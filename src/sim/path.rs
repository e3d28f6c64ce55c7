//! Best-first sector search
//!
//! Fish and turtles navigate with the same search over a grid of sectors
//! spaced `step` apart. The search is intentionally not A*: sectors are
//! ordered by `Sector::heuristic` relative to the last finalized sector,
//! duplicates are suppressed by a linear scan, and new sectors are pushed to
//! the front of the open list so that scan order decides ties. Gameplay
//! depends on the resulting (suboptimal) paths, so none of this is "fixed".

use std::collections::VecDeque;

use glam::Vec2;

use super::fish::Fish;
use super::geometry::Rect;
use super::sector::{CostModel, Sector};
use crate::consts::*;

/// Outcome of one search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Finalized sector positions followed by the goal itself
    pub path: VecDeque<Vec2>,
    /// Whether a sector within one step of the goal was reached
    pub reached_goal: bool,
    /// Number of sectors finalized
    pub expansions: usize,
}

/// Search parameters; the cost model and tie-break differ per species
#[derive(Debug, Clone, Copy)]
pub struct PathSearch {
    pub step: f32,
    pub cost: CostModel,
    /// Equal scores go to the sector farthest from this point
    pub tie_break_from: Option<Vec2>,
    pub max_expansions: usize,
}

/// Neighbor offsets in generation order (top row, middle row, bottom row)
const NEIGHBOR_X: [f32; 3] = [-1.0, 0.0, 1.0];
const NEIGHBOR_Y: [f32; 9] = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0];

impl PathSearch {
    /// Fish search: exact diagonal cost, ties broken away from the salmon
    pub fn fish(salmon_position: Vec2) -> Self {
        Self {
            step: SEARCH_STEP,
            cost: CostModel::FISH,
            tie_break_from: Some(salmon_position),
            max_expansions: MAX_EXPANSIONS,
        }
    }

    /// Turtle search: cheaper diagonals, first-found wins ties
    pub fn turtle() -> Self {
        Self {
            step: SEARCH_STEP,
            cost: CostModel::TURTLE,
            tie_break_from: None,
            max_expansions: MAX_EXPANSIONS,
        }
    }

    /// Run the search from `start` toward `goal`.
    ///
    /// Never fails: when the open list runs dry (or the expansion cap is hit)
    /// the finalized sectors so far are returned with `goal` appended.
    pub fn search<F>(&self, start: Vec2, goal: Vec2, is_valid: F) -> SearchResult
    where
        F: Fn(Vec2) -> bool,
    {
        let step = self.step;
        let mut open: VecDeque<Sector> = VecDeque::new();
        let mut closed: Vec<Sector> = Vec::new();
        let mut reached_goal = false;

        open.push_front(Sector::new(start, goal, step, step));

        while !open.is_empty() {
            if closed.len() >= self.max_expansions {
                log::warn!(
                    "Sector search from {:?} to {:?} hit the expansion cap ({})",
                    start,
                    goal,
                    self.max_expansions
                );
                break;
            }

            // Before anything is finalized, scores are taken relative to the start
            let reference = closed.last().map_or(start, |s| s.position);

            let best_index = self.select(&open, reference);
            let Some(current) = open.remove(best_index) else {
                break;
            };

            if current.is_goal() {
                reached_goal = true;
                break;
            }

            for (i, &dy) in NEIGHBOR_Y.iter().enumerate() {
                let x = NEIGHBOR_X[i % 3] * step + current.position.x;
                let y = dy * step + current.position.y;
                if x == current.position.x && y == current.position.y {
                    continue;
                }

                let position = Vec2::new(x, y);
                let move_cost =
                    current.move_cost + self.cost.step_cost(current.position, position, step);
                let successor = Sector::new(position, goal, step, move_cost);

                if !is_valid(position) {
                    continue;
                }
                if listed_no_worse(open.iter(), &successor, reference)
                    || listed_no_worse(closed.iter(), &successor, reference)
                {
                    continue;
                }
                open.push_front(successor);
            }

            closed.push(current);
        }

        let expansions = closed.len();
        closed.push(Sector::new(goal, goal, step, 0.0));

        SearchResult {
            path: closed.iter().map(|s| s.position).collect(),
            reached_goal,
            expansions,
        }
    }

    /// Index of the open sector with the lowest score.
    ///
    /// The scan runs front to back and only a strictly better score (or, with
    /// a tie-break point, an equal score farther from that point) replaces the
    /// current best.
    fn select(&self, open: &VecDeque<Sector>, reference: Vec2) -> usize {
        let Some(first) = open.front() else {
            return 0;
        };
        let mut best_index = 0;
        let mut best_f = first.heuristic(reference);
        let mut best_dist = self
            .tie_break_from
            .map_or(0.0, |from| from.distance(first.position));

        for (index, sector) in open.iter().enumerate() {
            let f = sector.heuristic(reference);
            if f < best_f {
                best_index = index;
                best_f = f;
                if let Some(from) = self.tie_break_from {
                    best_dist = from.distance(sector.position);
                }
            } else if f == best_f {
                if let Some(from) = self.tie_break_from {
                    let dist = from.distance(sector.position);
                    if dist > best_dist {
                        best_index = index;
                        best_dist = dist;
                    }
                }
            }
        }
        best_index
    }
}

/// True if `list` already holds the same cell with a score no worse than `candidate`'s
fn listed_no_worse<'a>(
    mut list: impl Iterator<Item = &'a Sector>,
    candidate: &Sector,
    reference: Vec2,
) -> bool {
    let candidate_f = candidate.heuristic(reference);
    list.any(|s| s.same_cell(candidate) && s.heuristic(reference) <= candidate_f)
}

/// Plain search with the fish cost model and no tie-break
pub fn find_path<F>(start: Vec2, goal: Vec2, step: f32, is_valid: F) -> VecDeque<Vec2>
where
    F: Fn(Vec2) -> bool,
{
    PathSearch {
        step,
        cost: CostModel::FISH,
        tie_break_from: None,
        max_expansions: MAX_EXPANSIONS,
    }
    .search(start, goal, is_valid)
    .path
}

/// Fish sectors must stay inside the search rectangle and out of the salmon's
/// padded, scaled bounding rectangle
pub fn fish_sector_valid(position: Vec2, bounds: &Rect, salmon_area: &Rect) -> bool {
    bounds.contains(position) && !salmon_area.contains_strict(position)
}

/// Turtle sectors only need to stay inside the (looser) search rectangle.
/// The fish are accepted for a planned avoidance rule but not consulted yet.
pub fn turtle_sector_valid(position: Vec2, bounds: &Rect, _fishes: &[Fish]) -> bool {
    bounds.contains(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_field(_: Vec2) -> bool {
        true
    }

    #[test]
    fn test_straight_line_path() {
        let path = find_path(Vec2::ZERO, Vec2::new(200.0, 0.0), 50.0, open_field);
        let points: Vec<Vec2> = path.into_iter().collect();
        // (150, 0) is within one step of the goal, so the goal follows (100, 0)
        assert_eq!(
            points,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(50.0, 0.0),
                Vec2::new(100.0, 0.0),
                Vec2::new(200.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_start_within_step_of_goal() {
        let result = PathSearch::turtle().search(Vec2::ZERO, Vec2::new(30.0, 30.0), open_field);
        assert!(result.reached_goal);
        assert_eq!(result.expansions, 0);
        assert_eq!(result.path, VecDeque::from(vec![Vec2::new(30.0, 30.0)]));
    }

    #[test]
    fn test_blocked_goal_exhausts_and_appends_goal() {
        let bounds = Rect::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0));
        let goal = Vec2::new(1000.0, 1000.0);
        let result = PathSearch::turtle().search(Vec2::ZERO, goal, |p| bounds.contains(p));
        assert!(!result.reached_goal);
        // 5x5 grid of reachable cells, each finalized once
        assert_eq!(result.expansions, 25);
        assert_eq!(result.path.back().copied(), Some(goal));
        assert_eq!(result.path.front().copied(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_invalid_start_neighbors_still_returns_goal() {
        let goal = Vec2::new(500.0, 0.0);
        let result = PathSearch::turtle().search(Vec2::ZERO, goal, |_| false);
        assert!(!result.reached_goal);
        assert_eq!(result.path, VecDeque::from(vec![Vec2::ZERO, goal]));
    }

    #[test]
    fn test_tie_break_fish_vs_turtle() {
        // With (50, 0) blocked, (50, 50) and (50, -50) tie exactly on score.
        let not_blocked = |p: Vec2| p.distance(Vec2::new(50.0, 0.0)) > 1.0;
        let goal = Vec2::new(400.0, 0.0);

        // Fish flee the salmon below them and take the upper cell
        let fish = PathSearch::fish(Vec2::new(0.0, -300.0)).search(Vec2::ZERO, goal, not_blocked);
        assert_eq!(fish.path.get(1).copied(), Some(Vec2::new(50.0, 50.0)));

        // Turtles keep the first tied sector in scan order, the last one pushed
        let turtle = PathSearch::turtle().search(Vec2::ZERO, goal, not_blocked);
        assert_eq!(turtle.path.get(1).copied(), Some(Vec2::new(50.0, -50.0)));
    }

    #[test]
    fn test_expansion_cap_bounds_unbounded_search() {
        let search = PathSearch {
            max_expansions: 10,
            ..PathSearch::turtle()
        };
        // Unbounded quadrant facing away from the goal
        let result = search.search(Vec2::ZERO, Vec2::new(1.0e6, 1.0e6), |p| p.x >= 0.0 && p.y <= 0.0);
        assert_eq!(result.expansions, 10);
        assert_eq!(result.path.len(), 11);
    }

    #[test]
    fn test_fish_validity_avoids_salmon_area() {
        let bounds = Rect::new(Vec2::new(-200.0, -75.0), Vec2::new(1400.0, 875.0));
        let salmon = Rect::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0));
        assert!(fish_sector_valid(Vec2::new(50.0, 50.0), &bounds, &salmon));
        assert!(!fish_sector_valid(Vec2::new(150.0, 150.0), &bounds, &salmon));
        // Edge of the salmon area is still free
        assert!(fish_sector_valid(Vec2::new(100.0, 150.0), &bounds, &salmon));
        assert!(!fish_sector_valid(Vec2::new(-250.0, 0.0), &bounds, &salmon));
    }

    #[test]
    fn test_turtle_validity_ignores_fish() {
        let bounds = Rect::new(Vec2::new(-200.0, -100.0), Vec2::new(1400.0, 900.0));
        assert!(turtle_sector_valid(Vec2::new(0.0, 890.0), &bounds, &[]));
        assert!(!turtle_sector_valid(Vec2::new(0.0, 901.0), &bounds, &[]));
    }

    #[test]
    fn test_path_avoids_blocked_column() {
        // Wall at x in (90, 110) except above y = 200
        let wall = Rect::new(Vec2::new(90.0, -1000.0), Vec2::new(110.0, 200.0));
        let bounds = Rect::new(Vec2::new(-300.0, -300.0), Vec2::new(500.0, 500.0));
        let goal = Vec2::new(300.0, 0.0);
        let result = PathSearch::fish(Vec2::new(-1000.0, 0.0))
            .search(Vec2::ZERO, goal, |p| bounds.contains(p) && !wall.contains_strict(p));
        assert!(result.reached_goal);
        assert!(result.path.iter().all(|p| !wall.contains_strict(*p)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn test_path_ends_at_goal_and_stays_in_bounds(
            sx in -200.0f32..400.0,
            sy in -200.0f32..400.0,
            gx in -200.0f32..400.0,
            gy in -200.0f32..400.0,
        ) {
            let bounds = Rect::new(Vec2::splat(-200.0), Vec2::splat(400.0));
            let start = Vec2::new(sx, sy);
            let goal = Vec2::new(gx, gy);
            let result = PathSearch::turtle().search(start, goal, |p| bounds.contains(p));

            prop_assert_eq!(result.path.back().copied(), Some(goal));
            prop_assert_eq!(result.path.len(), result.expansions + 1);
            for p in result.path.iter() {
                prop_assert!(bounds.contains(*p));
            }
            if result.expansions > 0 {
                prop_assert_eq!(result.path.front().copied(), Some(start));
            }
        }
    }
}
