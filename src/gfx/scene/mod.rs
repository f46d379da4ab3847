//! # Scene Management Module
//!
//! The node graph, meshes, lights and the [`Scene`] container that ties them to
//! the camera and materials.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns the graph, meshes, materials, fog and camera
//! - [`SceneGraph`] - arena tree of named, transformable nodes
//! - [`Mesh`] / [`MeshInstance`] - shared geometry and its placements
//! - [`Light`] / [`Fog`] - lighting and atmosphere descriptions
//! - [`Vertex3D`] - vertex layout with position, normal and texture coordinates

pub mod graph;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use graph::{Node, NodeId, NodeKind, SceneGraph, Transform};
pub use light::{Fog, Light, LightColor, SceneLights};
pub use mesh::{DrawMesh, Mesh, MeshId, MeshInstance};
pub use scene::Scene;
pub use vertex::Vertex3D;
