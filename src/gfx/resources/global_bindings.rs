//! Global uniform bindings for camera, lights and fog
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every mesh in the scene. Bound to slot 0 of the scene pipeline.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::light::{Fog, SceneLights, MAX_POINT_LIGHTS},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// MUST match `PointLight` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    /// xyz: world position, w: cutoff distance (0 = unbounded)
    pub position_distance: [f32; 4],
    /// rgb: linear color, a: intensity
    pub color_intensity: [f32; 4],
}

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// rgb: summed ambient radiance
    pub ambient: [f32; 4],
    /// xyz: unit vector towards the moon
    pub moon_direction: [f32; 4],
    /// rgb: moon radiance, zero when the scene has no directional light
    pub moon_color: [f32; 4],
    pub fog_color: [f32; 4],
    /// x: near, y: far, z: number of valid point lights
    pub fog_params: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
}

impl Default for GlobalUBOContent {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, lights: &SceneLights, fog: &Fog) -> Self {
        let mut content = Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [lights.ambient[0], lights.ambient[1], lights.ambient[2], 0.0],
            fog_color: [fog.color[0], fog.color[1], fog.color[2], 1.0],
            fog_params: [fog.near, fog.far, lights.points.len().min(MAX_POINT_LIGHTS) as f32, 0.0],
            ..Self::default()
        };

        if let Some((direction, radiance)) = lights.directional {
            content.moon_direction = [direction.x, direction.y, direction.z, 0.0];
            content.moon_color = [radiance[0], radiance[1], radiance[2], 0.0];
        }

        for (slot, point) in content.point_lights.iter_mut().zip(&lights.points) {
            let color = point.light.color;
            *slot = PointLightUniform {
                position_distance: [point.position.x, point.position.y, point.position.z, point.distance],
                color_intensity: [color[0], color[1], color[2], point.light.intensity],
            };
        }

        content
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes this frame's camera, light and fog state.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    lights: &SceneLights,
    fog: &Fog,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights, fog));
}

/// Owns the layout and bind group for global uniforms.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::gfx::scene::light::{LightColor, PointLightSample};

    #[test]
    fn test_content_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 32);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
        assert_eq!(
            std::mem::size_of::<GlobalUBOContent>(),
            16 + 64 + 16 * 5 + 32 * MAX_POINT_LIGHTS
        );
    }

    #[test]
    fn test_content_packs_lights_and_fog() {
        let lights = SceneLights {
            ambient: [0.1, 0.2, 0.3],
            directional: Some((Vector3::new(0.0, 1.0, 0.0), [0.5, 0.5, 0.5])),
            points: vec![PointLightSample {
                position: Vector3::new(4.0, 0.0, 0.0),
                light: LightColor::new([1.0, 0.0, 1.0], 2.0),
                distance: 3.0,
            }],
        };
        let fog = Fog {
            color: [0.02, 0.02, 0.04],
            near: 1.0,
            far: 15.0,
        };

        let content = GlobalUBOContent::new(&CameraUniform::default(), &lights, &fog);

        assert_eq!(content.ambient, [0.1, 0.2, 0.3, 0.0]);
        assert_eq!(content.moon_direction, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(content.fog_params, [1.0, 15.0, 1.0, 0.0]);
        assert_eq!(content.point_lights[0].position_distance, [4.0, 0.0, 0.0, 3.0]);
        assert_eq!(content.point_lights[0].color_intensity, [1.0, 0.0, 1.0, 2.0]);
        assert_eq!(content.point_lights[1], PointLightUniform::default());
    }
}
