use std::ops::Range;

use wgpu::{util::DeviceExt, Device};

use crate::gfx::{
    geometry::GeometryData,
    resources::{instance_bindings::InstanceGpu, material::MaterialId},
};

use super::vertex::Vertex3D;

/// Index of a mesh in the scene's mesh list. Many nodes may share one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

/// Triangle mesh with CPU-side data and, once uploaded, its GPU buffers.
pub struct Mesh {
    pub name: String,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            buffers: None,
        }
    }

    pub fn from_geometry(name: impl Into<String>, geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(name, vertices, indices)
    }

    /// Builds a mesh from a triangulated, single-index OBJ mesh.
    ///
    /// Missing normals are rebuilt from the faces; missing UVs default to zero.
    /// OBJ texture space has V pointing up, so V is flipped for wgpu.
    pub fn from_obj(name: impl Into<String>, mesh: &tobj::Mesh) -> Self {
        let vertex_count = mesh.positions.len() / 3;
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            Self::calculate_vertex_normals(&mesh.positions, &mesh.indices)
        };
        let has_uvs = mesh.texcoords.len() == vertex_count * 2;

        let vertices = (0..vertex_count)
            .map(|i| Vertex3D {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                tex_coords: if has_uvs {
                    [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                },
            })
            .collect();

        Self::new(name, vertices, mesh.indices.clone())
    }

    /// Averages the face normals touching each vertex.
    pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let mut normals = vec![0.0; positions.len()];
        let position = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            let (v0, v1, v2) = (position(i0), position(i1), position(i2));

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            // unnormalised, so larger faces weigh more
            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for vertex in [i0, i1, i2] {
                for axis in 0..3 {
                    normals[vertex * 3 + axis] += face_normal[axis];
                }
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|n| *n /= length);
            }
        }

        normals
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Creates the vertex and index buffers if they do not exist yet.
    pub fn upload(&mut self, device: &Device) {
        if self.buffers.is_some() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
        });
    }
}

/// A placed copy of a mesh: which geometry, which material, and its per-node uniforms.
pub struct MeshInstance {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub(crate) gpu: Option<InstanceGpu>,
}

impl MeshInstance {
    pub fn new(mesh: MeshId, material: impl Into<MaterialId>) -> Self {
        Self {
            mesh,
            material: material.into(),
            gpu: None,
        }
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a> DrawMesh<'a> for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &'a Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>) {
        // not uploaded yet
        let Some(buffers) = &mesh.buffers else {
            return;
        };

        self.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, instances);
    }
}
