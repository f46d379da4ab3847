//! Material system
//!
//! Provides material definitions and centralized management with GPU resource handling.
//! Materials are stored in MaterialManager and mesh nodes reference them by ID.

use std::collections::HashMap;

use image::RgbaImage;
use wgpu::Device;

use super::texture_resource::{TextureKind, TextureResource};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

pub const DEFAULT_MATERIAL: &str = "default";

/// GPU uniform data for materials. MUST match `Material` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// roughness, metallic, normal scale, ambient occlusion strength
    pub params: [f32; 4],
    /// xy: texture coordinate multiplier
    pub uv_repeat: [f32; 4],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout shared by every material: uniform, four maps, one sampler.
pub fn create_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        // uv_repeat is read in the vertex stage
        .next_binding_rendering(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Material Bind Group Layout")
}

/// Decoded texture maps waiting to be uploaded.
#[derive(Default)]
pub struct MaterialMaps {
    pub color: Option<RgbaImage>,
    pub ambient_occlusion: Option<RgbaImage>,
    pub normal: Option<RgbaImage>,
    pub roughness: Option<RgbaImage>,
}

impl MaterialMaps {
    fn slot(&mut self, kind: TextureKind) -> &mut Option<RgbaImage> {
        match kind {
            TextureKind::Color => &mut self.color,
            TextureKind::AmbientOcclusion => &mut self.ambient_occlusion,
            TextureKind::Normal => &mut self.normal,
            TextureKind::Roughness => &mut self.roughness,
        }
    }

    pub fn has(&self, kind: TextureKind) -> bool {
        match kind {
            TextureKind::Color => self.color.is_some(),
            TextureKind::AmbientOcclusion => self.ambient_occlusion.is_some(),
            TextureKind::Normal => self.normal.is_some(),
            TextureKind::Roughness => self.roughness.is_some(),
        }
    }
}

struct MaterialGpu {
    ubo: MaterialUBO,
    // keeps the views referenced by the bind group alive
    _textures: Vec<TextureResource>,
    bind_group: wgpu::BindGroup,
}

/// Surface description shared by every mesh node that names it.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    pub ao_strength: f32,
    pub uv_repeat: [f32; 2],
    maps: MaterialMaps,
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(DEFAULT_MATERIAL)
    }
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            normal_scale: 1.0,
            ao_strength: 1.0,
            uv_repeat: [1.0, 1.0],
            maps: MaterialMaps::default(),
            gpu: None,
        }
    }

    /// Linear RGB base color, opaque.
    pub fn with_color(mut self, rgb: [f32; 3]) -> Self {
        self.base_color = [rgb[0], rgb[1], rgb[2], 1.0];
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    pub fn with_map(mut self, kind: TextureKind, image: RgbaImage) -> Self {
        *self.maps.slot(kind) = Some(image);
        self
    }

    /// Texture coordinates are multiplied by `repeat` before sampling.
    pub fn with_uv_repeat(mut self, repeat: [f32; 2]) -> Self {
        self.uv_repeat = repeat;
        self
    }

    pub fn maps(&self) -> &MaterialMaps {
        &self.maps
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            params: [self.roughness, self.metallic, self.normal_scale, self.ao_strength],
            uv_repeat: [self.uv_repeat[0], self.uv_repeat[1], 0.0, 0.0],
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Uploads maps on first call; later calls only refresh the uniform.
    ///
    /// Absent maps are bound as neutral 1×1 textures.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.uniform();

        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
            return;
        }

        let textures: Vec<TextureResource> = TextureKind::ALL
            .into_iter()
            .map(|kind| {
                let image = self.maps.slot(kind).take().unwrap_or_else(|| kind.neutral_image());
                TextureResource::from_image(
                    device,
                    queue,
                    &image,
                    kind,
                    wgpu::AddressMode::Repeat,
                    &format!("{} {} map", self.name, kind.label()),
                )
            })
            .collect();

        let ubo = MaterialUBO::new_with_data(device, &uniform);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .texture(&textures[0].view)
            .texture(&textures[1].view)
            .texture(&textures[2].view)
            .texture(&textures[3].view)
            .sampler(&textures[0].sampler)
            .create(device, &format!("{} Material Bind Group", self.name));

        log::debug!("uploaded material `{}`", self.name);
        self.gpu = Some(MaterialGpu {
            ubo,
            _textures: textures,
            bind_group,
        });
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials in the scene
///
/// Centralized storage for all materials. Mesh nodes reference materials by ID
/// rather than storing material data directly, so GPU resources are shared.
pub struct MaterialManager {
    default_material: Material,
    materials: HashMap<MaterialId, Material>,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager holding only the default material
    pub fn new() -> Self {
        Self {
            default_material: Material::default(),
            materials: HashMap::new(),
        }
    }

    /// Adds a material, replacing any existing one with the same name.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        if id == DEFAULT_MATERIAL {
            self.default_material = material;
        } else if self.materials.insert(id.clone(), material).is_some() {
            log::debug!("replaced material `{id}`");
        }
        id
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        if id == DEFAULT_MATERIAL {
            Some(&self.default_material)
        } else {
            self.materials.get(id)
        }
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        if id == DEFAULT_MATERIAL {
            Some(&mut self.default_material)
        } else {
            self.materials.get_mut(id)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_material(id).is_some()
    }

    /// Number of materials, the default one included.
    pub fn len(&self) -> usize {
        self.materials.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The named material, or the default one when it does not exist.
    pub fn material_or_default(&self, id: &str) -> &Material {
        self.get_material(id).unwrap_or(&self.default_material)
    }

    /// Uploads new materials and refreshes the uniforms of existing ones.
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        self.default_material.update_gpu_resources(device, queue, layout);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_packs_parameters() {
        let material = Material::new("floor")
            .with_color([0.5, 0.25, 1.0])
            .with_roughness(0.7)
            .with_uv_repeat([8.0, 8.0]);

        let uniform = material.uniform();
        assert_eq!(uniform.base_color, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(uniform.params, [0.7, 0.0, 1.0, 1.0]);
        assert_eq!(uniform.uv_repeat, [8.0, 8.0, 0.0, 0.0]);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn test_maps_are_tracked_per_kind() {
        let material = Material::new("floor").with_map(TextureKind::Normal, TextureKind::Normal.neutral_image());

        assert!(material.maps().has(TextureKind::Normal));
        assert!(!material.maps().has(TextureKind::Color));
        assert!(!material.is_uploaded());
    }

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        let id = manager.add_material(Material::new("grave").with_color([0.4, 0.4, 0.4]));

        assert_eq!(id, "grave");
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.material_or_default("grave").name, "grave");
        assert_eq!(manager.material_or_default("missing").name, DEFAULT_MATERIAL);
    }
}
