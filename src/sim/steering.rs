//! Path following
//!
//! Entities walk their waypoint list one tick at a time. Each axis moves by
//! the full step toward the front waypoint independently, so diagonal travel
//! covers up to sqrt(2) times the nominal distance.

use std::collections::VecDeque;

use glam::Vec2;

use crate::axis_sign;
use crate::consts::WAYPOINT_REACHED;

/// Advance `position` one step along `path`, popping waypoints that are reached.
///
/// The last waypoint is never popped. An empty path leaves the position as is.
pub fn advance(path: &mut VecDeque<Vec2>, position: Vec2, step_distance: f32) -> Vec2 {
    while path.len() > 1 {
        match path.front() {
            Some(front) if front.distance(position) < WAYPOINT_REACHED => {
                path.pop_front();
            }
            _ => break,
        }
    }

    let Some(&target) = path.front() else {
        return position;
    };

    let direction = target - position;
    Vec2::new(
        position.x + step_distance * axis_sign(direction.x),
        position.y + step_distance * axis_sign(direction.y),
    )
}
