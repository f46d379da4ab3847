use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::{
        instance_bindings::{InstanceGpu, InstanceUniform},
        material::{Material, MaterialId, MaterialManager},
        SceneLayouts,
    },
};

use super::{
    graph::{NodeId, NodeKind, SceneGraph, Transform},
    light::{Fog, Light, SceneLights},
    mesh::{DrawMesh, Mesh, MeshId, MeshInstance},
};

/// Main scene: the node graph, the meshes and materials it references, fog and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub graph: SceneGraph,
    pub material_manager: MaterialManager,
    pub fog: Option<Fog>,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            graph: SceneGraph::new(),
            material_manager: MaterialManager::new(),
            fog: None,
            meshes: Vec::new(),
        }
    }

    /// Updates the scene (camera damping, camera matrices)
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        self.graph.add_group(parent, name, transform)
    }

    pub fn add_mesh_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        mesh: MeshId,
        material: impl Into<MaterialId>,
    ) -> NodeId {
        self.graph.add_child(
            parent,
            name,
            transform,
            NodeKind::Mesh(MeshInstance::new(mesh, material)),
        )
    }

    pub fn add_light(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform, light: Light) -> NodeId {
        self.graph.add_child(parent, name, transform, NodeKind::Light(light))
    }

    /// Every light resolved to world space for this frame.
    pub fn collect_lights(&self) -> SceneLights {
        SceneLights::collect(&self.graph)
    }

    /// Number of mesh nodes in the graph.
    pub fn mesh_node_count(&self) -> usize {
        self.graph
            .nodes()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Mesh(_)))
            .count()
    }

    /// Uploads anything created since the last frame and writes world transforms.
    ///
    /// Meshes, materials and per-node uniforms are created lazily, so nodes added
    /// while the scene is running show up on the next frame.
    pub fn prepare_gpu(&mut self, device: &Device, queue: &wgpu::Queue, layouts: &SceneLayouts) {
        for mesh in self.meshes.iter_mut().filter(|mesh| !mesh.is_uploaded()) {
            mesh.upload(device);
        }
        self.material_manager
            .update_all_gpu_resources(device, queue, &layouts.material);

        let mut world_transforms = Vec::new();
        self.graph.traverse(|id, node, world| {
            if matches!(node.kind, NodeKind::Mesh(_)) {
                world_transforms.push((id, InstanceUniform::from_world(*world)));
            }
        });

        for (id, uniform) in world_transforms {
            let NodeKind::Mesh(instance) = &mut self.graph.node_mut(id).kind else {
                continue;
            };
            instance
                .gpu
                .get_or_insert_with(|| InstanceGpu::new(device, &layouts.instance, uniform))
                .update(queue, uniform);
        }
    }

    /// Records draws for every mesh node; bind group 0 must already be set.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        for (_, node) in self.graph.nodes() {
            let NodeKind::Mesh(instance) = &node.kind else {
                continue;
            };
            let (Some(gpu), Some(mesh)) = (&instance.gpu, self.mesh(instance.mesh)) else {
                continue;
            };
            let Some(material_bind_group) = self
                .material_manager
                .material_or_default(&instance.material)
                .bind_group()
            else {
                continue;
            };

            render_pass.set_bind_group(1, gpu.bind_group(), &[]);
            render_pass.set_bind_group(2, material_bind_group, &[]);
            render_pass.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector3, Zero};

    use super::*;
    use crate::gfx::{
        camera::{CameraController, OrbitCamera},
        geometry::generate_box,
        scene::light::LightColor,
    };

    fn scene() -> Scene {
        Scene::new(CameraManager::new(
            OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0),
            CameraController::new(0.01, 0.1),
        ))
    }

    #[test]
    fn test_mesh_nodes_share_geometry() {
        let mut scene = scene();
        let mesh = scene.add_mesh(Mesh::from_geometry("grave", &generate_box(0.6, 0.8, 0.2)));
        let material = scene.add_material(Material::new("grave"));
        let graves = scene.add_group(NodeId::ROOT, "graves", Transform::default());
        for i in 0..3 {
            scene.add_mesh_node(graves, format!("grave{i}"), Transform::default(), mesh, material.clone());
        }

        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.mesh_node_count(), 3);
        assert_eq!(scene.graph.child_count(graves), 3);
        assert!(!scene.mesh(mesh).expect("mesh").is_uploaded());
    }

    #[test]
    fn test_collect_lights_sees_added_lights() {
        let mut scene = scene();
        scene.add_light(
            NodeId::ROOT,
            "ghost1",
            Transform::from_translation([4.0, 0.0, 0.0]),
            Light::Point {
                light: LightColor::new([1.0, 0.0, 1.0], 2.0),
                distance: 3.0,
            },
        );

        let lights = scene.collect_lights();
        assert_eq!(lights.points.len(), 1);
        assert_eq!(lights.points[0].position, Vector3::new(4.0, 0.0, 0.0));
    }
}
