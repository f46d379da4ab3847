//! Builds the static part of the haunted-house scene graph.

use std::f32::consts::FRAC_PI_2;

use crate::{
    config::{srgb_hex, SceneConfig},
    gfx::{
        geometry::{generate_box, generate_plane},
        resources::{material::Material, texture_resource::TextureKind},
        scene::{Fog, Light, LightColor, Mesh, NodeId, NodeKind, Scene, Transform},
    },
};

use super::{assets::load_texture_or_neutral, graves::GraveMarker};

/// Handles to the nodes the scene keeps touching after assembly.
#[derive(Debug, Clone, Copy)]
pub struct SceneNodes {
    pub house: NodeId,
    pub graves: NodeId,
    pub floor: NodeId,
    pub camera: NodeId,
    pub ghosts: [NodeId; 3],
}

/// Populates `scene` with the floor, house group, graves, lights, fog and camera.
///
/// Texture maps are decoded here; unreadable maps fall back to neutral texels.
pub fn assemble(scene: &mut Scene, config: &SceneConfig, graves: &[GraveMarker]) -> SceneNodes {
    scene.fog = Some(Fog {
        color: srgb_hex(config.fog.color),
        near: config.fog.near,
        far: config.fog.far,
    });

    let house = scene.add_group(NodeId::ROOT, "house", Transform::default());
    let door = &config.lighting.door;
    scene.add_light(
        house,
        "door_light",
        Transform::from_translation(door.position),
        Light::Point {
            light: LightColor::new(srgb_hex(door.color), door.intensity),
            distance: door.distance,
        },
    );

    let graves_group = add_graves(scene, config, graves);
    let floor = add_floor(scene, config);

    let ambient = &config.lighting.ambient;
    scene.add_light(
        NodeId::ROOT,
        "ambient_light",
        Transform::default(),
        Light::Ambient(LightColor::new(srgb_hex(ambient.color), ambient.intensity)),
    );
    let moon = &config.lighting.moon;
    scene.add_light(
        NodeId::ROOT,
        "moon_light",
        Transform::from_translation(moon.position),
        Light::Directional(LightColor::new(srgb_hex(moon.color), moon.intensity)),
    );

    let ghosts = config.ghosts.map(|ghost| {
        scene.add_light(
            NodeId::ROOT,
            ghost.name,
            Transform::from_translation(ghost.orbit.position_at(0.0)),
            Light::Point {
                light: LightColor::new(srgb_hex(ghost.color), ghost.intensity),
                distance: ghost.distance,
            },
        )
    });

    let camera = scene.graph.add_child(
        NodeId::ROOT,
        "camera",
        Transform::from_translation(config.camera.position),
        NodeKind::Camera,
    );

    log::debug!(
        "assembled scene: {} nodes, {} graves",
        scene.graph.len(),
        graves.len()
    );

    SceneNodes {
        house,
        graves: graves_group,
        floor,
        camera,
        ghosts,
    }
}

fn add_graves(scene: &mut Scene, config: &SceneConfig, graves: &[GraveMarker]) -> NodeId {
    let [width, height, depth] = config.graves.size;
    let mesh = scene.add_mesh(Mesh::from_geometry("grave", &generate_box(width, height, depth)));
    let material = scene.add_material(Material::new("grave").with_color(srgb_hex(config.graves.color)));

    let group = scene.add_group(NodeId::ROOT, "graves", Transform::default());
    for (i, grave) in graves.iter().enumerate() {
        let transform = Transform::from_translation(grave.position)
            .with_rotation([0.0, grave.rotation_y, grave.rotation_z]);
        scene.add_mesh_node(group, format!("grave{i}"), transform, mesh, material.clone());
    }
    group
}

fn add_floor(scene: &mut Scene, config: &SceneConfig) -> NodeId {
    let floor = &config.floor;
    let textures = &floor.textures;
    let maps = [
        (TextureKind::Color, &textures.color),
        (TextureKind::AmbientOcclusion, &textures.ambient_occlusion),
        (TextureKind::Normal, &textures.normal),
        (TextureKind::Roughness, &textures.roughness),
    ];

    let mut material = Material::new("floor")
        .with_color([1.0, 1.0, 1.0])
        .with_uv_repeat([floor.texture_repeat; 2]);
    for (kind, path) in maps {
        material = material.with_map(kind, load_texture_or_neutral(&config.asset_path(path), kind));
    }
    let material = scene.add_material(material);

    let mesh = scene.add_mesh(Mesh::from_geometry(
        "floor",
        &generate_plane(floor.size, floor.size, 1, 1),
    ));
    scene.add_mesh_node(
        NodeId::ROOT,
        "floor",
        Transform::default().with_rotation([-FRAC_PI_2, 0.0, 0.0]),
        mesh,
        material,
    )
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3, Zero};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        gfx::camera::{camera_utils::CameraManager, CameraController, OrbitCamera},
        world::graves::place_graves,
    };

    fn assembled() -> (Scene, SceneNodes, SceneConfig) {
        let mut config = SceneConfig::default();
        config.asset_root = "does/not/exist".into();
        let graves = place_graves(&mut StdRng::seed_from_u64(3), &config.graves);

        let mut scene = Scene::new(CameraManager::new(
            OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.5),
            CameraController::new(0.005, 0.1),
        ));
        let nodes = assemble(&mut scene, &config, &graves);
        (scene, nodes, config)
    }

    #[test]
    fn test_graves_share_one_mesh() {
        let (scene, nodes, config) = assembled();

        assert_eq!(scene.graph.child_count(nodes.graves), config.graves.count);
        // grave box and floor plane
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.mesh_node_count(), config.graves.count + 1);
        assert_eq!(scene.graph.node(nodes.graves).name, "graves");
    }

    #[test]
    fn test_floor_lies_flat_and_repeats_its_maps() {
        let (scene, nodes, _) = assembled();

        let up = scene.graph.world_matrix(nodes.floor) * cgmath::Vector4::unit_z();
        assert!((up.truncate() - Vector3::unit_y()).magnitude() < 1e-5);

        let floor = scene
            .material_manager
            .get_material("floor")
            .expect("floor material");
        assert_eq!(floor.uv_repeat, [8.0, 8.0]);
        for kind in TextureKind::ALL {
            assert!(floor.maps().has(kind));
        }
    }

    #[test]
    fn test_lights_and_fog() {
        let (scene, nodes, _) = assembled();
        let lights = scene.collect_lights();

        // door light plus three ghosts
        assert_eq!(lights.points.len(), 4);
        assert!(lights.directional.is_some());
        assert!(lights.ambient.iter().all(|c| *c > 0.0));

        let fog = scene.fog.expect("fog");
        assert_eq!((fog.near, fog.far), (1.0, 15.0));

        assert_eq!(scene.graph.child_count(nodes.house), 1);
        assert_eq!(scene.graph.node(nodes.ghosts[2]).transform.translation, Vector3::new(7.0, 0.0, 0.0));
        assert!(matches!(scene.graph.node(nodes.camera).kind, NodeKind::Camera));
    }
}
