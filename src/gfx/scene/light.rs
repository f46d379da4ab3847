//! Light and fog descriptions carried by scene nodes.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

use super::graph::{NodeKind, SceneGraph};

/// Upper bound on point lights the scene shader evaluates per fragment.
pub const MAX_POINT_LIGHTS: usize = 8;

/// Linear RGB color and a scalar intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl LightColor {
    pub fn new(color: [f32; 3], intensity: f32) -> Self {
        Self { color, intensity }
    }

    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient(LightColor),
    /// Shines from the node's world position towards the origin.
    Directional(LightColor),
    /// `distance` is where the light's contribution reaches zero; `0.0` means unbounded.
    Point { light: LightColor, distance: f32 },
}

/// Linear distance fog, blended from `near` to `far` along view distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog that starts beyond any visible distance, over a black background.
    pub fn disabled() -> Self {
        Self {
            color: [0.0; 3],
            near: 1.0e30,
            far: 2.0e30,
        }
    }

    /// Fraction of fog color mixed in at `distance`.
    ///
    /// `fs_main` in `scene.wgsl` evaluates the same ramp per fragment.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightSample {
    pub position: Vector3<f32>,
    pub light: LightColor,
    pub distance: f32,
}

/// All lights in the scene, resolved to world space for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLights {
    /// Summed radiance of every ambient light.
    pub ambient: [f32; 3],
    /// Unit vector pointing from the surface towards the light, and its radiance.
    pub directional: Option<(Vector3<f32>, [f32; 3])>,
    pub points: Vec<PointLightSample>,
}

impl SceneLights {
    pub fn collect(graph: &SceneGraph) -> Self {
        let mut lights = SceneLights::default();

        graph.traverse(|_, node, world| {
            let NodeKind::Light(light) = &node.kind else {
                return;
            };
            let position = world_position(world);

            match *light {
                Light::Ambient(color) => {
                    let radiance = color.radiance();
                    for (total, add) in lights.ambient.iter_mut().zip(radiance) {
                        *total += add;
                    }
                }
                Light::Directional(color) => {
                    if lights.directional.is_some() {
                        log::warn!("ignoring extra directional light `{}`", node.name);
                    } else if position.magnitude2() > 0.0 {
                        lights.directional = Some((position.normalize(), color.radiance()));
                    }
                }
                Light::Point { light, distance } => {
                    if lights.points.len() < MAX_POINT_LIGHTS {
                        lights.points.push(PointLightSample {
                            position,
                            light,
                            distance,
                        });
                    } else {
                        log::warn!("point light limit reached; skipping `{}`", node.name);
                    }
                }
            }
        });

        lights
    }
}

fn world_position(world: &Matrix4<f32>) -> Vector3<f32> {
    let p: Vector4<f32> = world.w;
    Vector3::new(p.x, p.y, p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::graph::{NodeId, Transform};

    #[test]
    fn test_collect_resolves_world_positions() {
        let mut graph = SceneGraph::new();
        let house = graph.add_group(NodeId::ROOT, "house", Transform::from_translation([1.0, 0.0, 0.0]));
        graph.add_child(
            house,
            "door",
            Transform::from_translation([0.0, 2.2, 2.7]),
            NodeKind::Light(Light::Point {
                light: LightColor::new([1.0, 0.5, 0.25], 1.0),
                distance: 7.0,
            }),
        );
        graph.add_child(
            NodeId::ROOT,
            "ambient",
            Transform::default(),
            NodeKind::Light(Light::Ambient(LightColor::new([1.0, 1.0, 1.0], 0.5))),
        );
        graph.add_child(
            NodeId::ROOT,
            "moon",
            Transform::from_translation([0.0, 3.0, 4.0]),
            NodeKind::Light(Light::Directional(LightColor::new([1.0, 1.0, 1.0], 2.0))),
        );

        let lights = SceneLights::collect(&graph);

        assert_eq!(lights.points.len(), 1);
        assert_eq!(lights.points[0].position, Vector3::new(1.0, 2.2, 2.7));
        assert_eq!(lights.points[0].distance, 7.0);
        assert_eq!(lights.ambient, [0.5, 0.5, 0.5]);

        let (direction, radiance) = lights.directional.expect("moon light");
        assert!((direction - Vector3::new(0.0, 0.6, 0.8)).magnitude() < 1e-6);
        assert_eq!(radiance, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_point_lights_are_capped() {
        let mut graph = SceneGraph::new();
        for i in 0..MAX_POINT_LIGHTS + 3 {
            graph.add_child(
                NodeId::ROOT,
                format!("light{i}"),
                Transform::default(),
                NodeKind::Light(Light::Point {
                    light: LightColor::new([1.0; 3], 1.0),
                    distance: 0.0,
                }),
            );
        }

        assert_eq!(SceneLights::collect(&graph).points.len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_fog_factor_ramps_between_near_and_far() {
        let fog = Fog {
            color: [0.0; 3],
            near: 1.0,
            far: 15.0,
        };

        assert_eq!(fog.factor(0.5), 0.0);
        assert_eq!(fog.factor(1.0), 0.0);
        assert_eq!(fog.factor(4.5), 0.25);
        assert_eq!(fog.factor(8.0), 0.5);
        assert_eq!(fog.factor(11.5), 0.75);
        assert_eq!(fog.factor(15.0), 1.0);
        assert_eq!(fog.factor(40.0), 1.0);
        assert_eq!(Fog::disabled().factor(1000.0), 0.0);
    }

    #[test]
    fn test_shader_fog_uses_the_same_linear_ramp() {
        let shader = include_str!("../rendering/scene.wgsl");

        assert!(!shader.contains("smoothstep"));
        assert!(shader.contains(
            "clamp((length(to_eye) - globals.fog_params.x) / fog_span, 0.0, 1.0)"
        ));
    }
}
