//! Salmon body mesh
//!
//! The body is a colored triangle mesh in local units. Collision code only
//! needs the vertices and four extremal points of the mesh, which are cached
//! once per mesh.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Colored mesh vertex, laid out for direct vertex buffer upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl MeshVertex {
    pub const fn new(x: f32, y: f32, color: [f32; 3]) -> Self {
        Self {
            position: [x, y, 0.0],
            color,
        }
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }
}

/// Extremal local vertices of a mesh
///
/// `mouth` is the minimum-x vertex (the head, because the salmon is drawn with a
/// negative x scale), `left` the maximum-x vertex, `top` the minimum-y vertex
/// and `bottom` the maximum-y vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshExtrema {
    pub mouth: Vec2,
    pub left: Vec2,
    pub top: Vec2,
    pub bottom: Vec2,
}

impl MeshExtrema {
    /// Scan vertices for the extremes.
    ///
    /// Every slot starts at the origin, so a mesh lying entirely on one side of
    /// an axis keeps the origin for the opposite extreme.
    pub fn from_vertices(vertices: &[MeshVertex]) -> Self {
        let mut extrema = Self::default();
        for vertex in vertices {
            let p = vertex.xy();
            if p.x < extrema.mouth.x {
                extrema.mouth = p;
            }
            if p.x > extrema.left.x {
                extrema.left = p;
            }
            if p.y < extrema.top.y {
                extrema.top = p;
            }
            if p.y > extrema.bottom.y {
                extrema.bottom = p;
            }
        }
        extrema
    }
}

/// Triangle mesh with cached extrema
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
    pub extrema: MeshExtrema,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u16>) -> Self {
        let extrema = MeshExtrema::from_vertices(&vertices);
        Self {
            vertices,
            indices,
            extrema,
        }
    }

    /// Built-in salmon outline: a triangle fan around the body center
    pub fn salmon() -> Self {
        const BODY: [f32; 3] = [0.98, 0.55, 0.45];
        const FIN: [f32; 3] = [0.85, 0.35, 0.3];
        let outline = [
            (-3.0, 0.0, BODY),
            (-2.2, -1.2, BODY),
            (-0.5, -1.6, BODY),
            (1.5, -1.0, BODY),
            (2.4, -0.3, BODY),
            (3.0, -1.2, FIN),
            (3.0, 1.2, FIN),
            (2.4, 0.3, BODY),
            (1.5, 1.0, BODY),
            (-0.5, 1.6, BODY),
            (-2.2, 1.2, BODY),
        ];

        let mut vertices = vec![MeshVertex::new(0.0, 0.0, BODY)];
        vertices.extend(outline.iter().map(|&(x, y, c)| MeshVertex::new(x, y, c)));

        let rim = outline.len() as u16;
        let mut indices = Vec::with_capacity(outline.len() * 3);
        for i in 0..rim {
            indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % rim]);
        }

        Self::new(vertices, indices)
    }

    /// Raw bytes for a vertex buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salmon_extrema() {
        let mesh = Mesh::salmon();
        assert_eq!(mesh.extrema.mouth, Vec2::new(-3.0, 0.0));
        // First max-x vertex wins ties
        assert_eq!(mesh.extrema.left, Vec2::new(3.0, -1.2));
        assert_eq!(mesh.extrema.top, Vec2::new(-0.5, -1.6));
        assert_eq!(mesh.extrema.bottom, Vec2::new(-0.5, 1.6));
    }

    #[test]
    fn test_extrema_keep_origin_seed() {
        let vertices = [MeshVertex::new(1.0, 1.0, [1.0; 3]), MeshVertex::new(2.0, 3.0, [1.0; 3])];
        let extrema = MeshExtrema::from_vertices(&vertices);
        assert_eq!(extrema.mouth, Vec2::ZERO);
        assert_eq!(extrema.top, Vec2::ZERO);
        assert_eq!(extrema.left, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_fan_indices_in_range() {
        let mesh = Mesh::salmon();
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(
            mesh.vertex_bytes().len(),
            mesh.vertices.len() * std::mem::size_of::<MeshVertex>()
        );
    }
}
