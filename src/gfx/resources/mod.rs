//! GPU resource management
//!
//! Handles textures, buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod instance_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use instance_bindings::{InstanceGpu, InstanceUniform};
pub use material::{Material, MaterialId, MaterialManager};
pub use texture_resource::{TextureKind, TextureResource};

use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

/// Bind group layouts for the per-node and per-material slots of the scene pipeline.
pub struct SceneLayouts {
    pub instance: BindGroupLayoutWithDesc,
    pub material: BindGroupLayoutWithDesc,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            instance: instance_bindings::create_layout(device),
            material: material::create_layout(device),
        }
    }
}
