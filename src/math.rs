//! Affine transforms for entity placement
//!
//! Entities are drawn and collided through the same composition the renderer
//! uses: translate, then rotate, then scale (applied right to left to a local
//! vertex).

use glam::{Mat3, Vec2};

/// 3x3 affine transform of an entity (translate * rotate * scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: Mat3,
}

impl Transform {
    /// Compose the transform for an entity at `position`, facing `radians`, with `scale`
    pub fn from_motion(position: Vec2, radians: f32, scale: Vec2) -> Self {
        Self::identity().translate(position).rotate(radians).scale(scale)
    }

    pub fn identity() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
        }
    }

    /// Incrementally compose another translation (post-multiplied)
    pub fn translate(self, offset: Vec2) -> Self {
        Self {
            matrix: self.matrix * Mat3::from_translation(offset),
        }
    }

    /// Incrementally compose another rotation (post-multiplied)
    pub fn rotate(self, radians: f32) -> Self {
        Self {
            matrix: self.matrix * Mat3::from_angle(radians),
        }
    }

    /// Incrementally compose another scale (post-multiplied)
    pub fn scale(self, scale: Vec2) -> Self {
        Self {
            matrix: self.matrix * Mat3::from_scale(scale),
        }
    }

    /// Transform a local point (homogeneous w = 1)
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.matrix.transform_point2(local)
    }
}
