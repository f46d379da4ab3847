//! # Graphics Module
//!
//! Everything between the scene description and the GPU.
//!
//! - **Camera System** ([`camera`]) - damped orbit camera
//! - **Geometry** ([`geometry`]) - procedural boxes and planes
//! - **Rendering Pipeline** ([`rendering`]) - surface, pipeline and per-frame draw
//! - **Scene Management** ([`scene`]) - node graph, meshes, lights, fog
//! - **Resource Management** ([`resources`]) - materials, textures, uniforms
//!
//! [`RenderEngine`] draws a [`Scene`]: call [`RenderEngine::update`] after the
//! scene has advanced, then [`RenderEngine::render_frame`].
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
