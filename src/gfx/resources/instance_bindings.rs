//! Per-node model matrices, bound at slot 1 of the scene pipeline.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// MUST match `Instance` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for transforming normals.
    pub normal: [[f32; 4]; 4],
}

impl InstanceUniform {
    pub fn from_world(world: Matrix4<f32>) -> Self {
        let normal = world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(world);
        Self {
            model: world.into(),
            normal: normal.into(),
        }
    }
}

pub fn create_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding_types::uniform())
        .create(device, "Instance Bind Group Layout")
}

/// Uniform buffer and bind group owned by one mesh node.
pub struct InstanceGpu {
    ubo: UniformBuffer<InstanceUniform>,
    bind_group: wgpu::BindGroup,
}

impl InstanceGpu {
    pub fn new(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        initial: InstanceUniform,
    ) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &initial);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, "Instance Bind Group");
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: InstanceUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let uniform = InstanceUniform::from_world(Matrix4::from_nonuniform_scale(2.0, 1.0, 0.5));

        assert_eq!(uniform.model[0][0], 2.0);
        assert_eq!(uniform.normal[0][0], 0.5);
        assert_eq!(uniform.normal[2][2], 2.0);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let uniform = InstanceUniform::from_world(Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);

        // singular matrices fall back to the model matrix
        let collapsed = InstanceUniform::from_world(Matrix4::from_scale(0.0));
        assert_eq!(collapsed.normal, collapsed.model);
    }
}
