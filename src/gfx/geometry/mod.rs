//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the scene is built from, so the floor and the
//! grave markers need no model files.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with per-face normals and UVs
//! - **Plane**: flat subdivided plane in the XY plane
//!
//! ## Usage
//!
//! ```rust
//! use haunted_house::gfx::geometry::{generate_box, generate_plane};
//!
//! let grave = generate_box(0.6, 0.8, 0.2);
//! let floor = generate_plane(20.0, 20.0, 1, 1);
//! assert_eq!(grave.triangle_count(), 12);
//! assert_eq!(floor.vertex_count(), 4);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), v pointing down the image
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute streams into the renderer's vertex format.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}
