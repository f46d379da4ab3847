//! Fixed scene parameters.
//!
//! Every constant the scene is built from lives here, grouped by the part of the
//! scene it shapes. [`SceneConfig::default`] carries the shipped values; the only
//! runtime override is the asset root, read from `HAUNTED_HOUSE_ASSETS`.

use std::{
    f32::consts::FRAC_PI_2,
    path::{Path, PathBuf},
};

use crate::world::ghosts::{GhostOrbit, OrbitRadius};

/// Environment variable that relocates the asset directory.
pub const ASSET_ROOT_ENV: &str = "HAUNTED_HOUSE_ASSETS";

/// Converts a `0xRRGGBB` sRGB color into linear RGB.
pub fn srgb_hex(rgb: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((rgb >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub asset_root: PathBuf,
    pub window: WindowConfig,
    pub graves: GraveConfig,
    pub floor: FloorConfig,
    pub lighting: LightingConfig,
    pub ghosts: [GhostConfig; 3],
    pub fog: FogConfig,
    pub camera: CameraConfig,
    pub house: HouseConfig,
}

impl SceneConfig {
    /// Default configuration with the asset root taken from the environment, if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    /// Resolves a path relative to the asset root.
    pub fn asset_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_root.join(relative)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            window: WindowConfig::default(),
            graves: GraveConfig::default(),
            floor: FloorConfig::default(),
            lighting: LightingConfig::default(),
            ghosts: [
                GhostConfig {
                    name: "ghost1",
                    color: 0xff00ff,
                    intensity: 2.0,
                    distance: 3.0,
                    orbit: GhostOrbit {
                        angular_speed: 0.5,
                        radius: OrbitRadius::Fixed(4.0),
                        bob_frequencies: &[3.0],
                    },
                },
                GhostConfig {
                    name: "ghost2",
                    color: 0x00ffff,
                    intensity: 2.0,
                    distance: 3.0,
                    orbit: GhostOrbit {
                        angular_speed: -0.32,
                        radius: OrbitRadius::Fixed(5.0),
                        bob_frequencies: &[4.0, 2.5],
                    },
                },
                GhostConfig {
                    name: "ghost3",
                    color: 0xffff00,
                    intensity: 2.0,
                    distance: 3.0,
                    orbit: GhostOrbit {
                        angular_speed: -0.18,
                        radius: OrbitRadius::Breathing {
                            base: 7.0,
                            x_frequency: 0.32,
                            z_frequency: 0.5,
                        },
                        bob_frequencies: &[4.0, 2.5],
                    },
                },
            ],
            fog: FogConfig::default(),
            camera: CameraConfig::default(),
            house: HouseConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub max_pixel_ratio: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Haunted House".to_string(),
            width: 1200,
            height: 800,
            max_pixel_ratio: 2.0,
        }
    }
}

/// Annulus placement of the grave markers.
#[derive(Debug, Clone, Copy)]
pub struct GraveConfig {
    pub count: usize,
    pub min_radius: f32,
    pub radius_span: f32,
    pub height: f32,
    /// Full width of the tilt range; each rotation is `(u - 0.5) * tilt`.
    pub tilt: f32,
    pub size: [f32; 3],
    pub color: u32,
}

impl Default for GraveConfig {
    fn default() -> Self {
        Self {
            count: 50,
            min_radius: 3.0,
            radius_span: 10.0,
            height: 0.3,
            tilt: 0.4,
            size: [0.6, 0.8, 0.2],
            color: 0xb2b6b1,
        }
    }
}

/// Relative paths of the four ground maps.
#[derive(Debug, Clone)]
pub struct TextureSetPaths {
    pub color: PathBuf,
    pub ambient_occlusion: PathBuf,
    pub normal: PathBuf,
    pub roughness: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FloorConfig {
    pub size: f32,
    pub texture_repeat: f32,
    pub textures: TextureSetPaths,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            texture_repeat: 8.0,
            textures: TextureSetPaths {
                color: PathBuf::from("textures/dirt/color.jpg"),
                ambient_occlusion: PathBuf::from("textures/dirt/ambientOcclusion.jpg"),
                normal: PathBuf::from("textures/dirt/normal.jpg"),
                roughness: PathBuf::from("textures/dirt/roughness.jpg"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLightConfig {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy)]
pub struct PointLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy)]
pub struct LightingConfig {
    pub ambient: AmbientLightConfig,
    pub moon: DirectionalLightConfig,
    /// Lives inside the house group, so its position is house-relative.
    pub door: PointLightConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: AmbientLightConfig {
                color: 0xb9d5ff,
                intensity: 0.12,
            },
            moon: DirectionalLightConfig {
                color: 0xb9d5ff,
                intensity: 0.12,
                position: [4.0, 5.0, -2.0],
            },
            door: PointLightConfig {
                color: 0xff7d46,
                intensity: 1.0,
                distance: 7.0,
                position: [0.0, 2.2, 2.7],
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GhostConfig {
    pub name: &'static str,
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub orbit: GhostOrbit,
}

/// Linear fog; also used as the clear color.
#[derive(Debug, Clone, Copy)]
pub struct FogConfig {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: 0x262837,
            near: 1.0,
            far: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [4.0, 2.0, 5.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
        }
    }
}

/// Transform applied to the loaded house model before it is attached.
#[derive(Debug, Clone)]
pub struct HouseConfig {
    pub model: PathBuf,
    pub scale: [f32; 3],
    pub translation: [f32; 3],
    pub rotation_y: f32,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/house.obj"),
            scale: [0.5, 0.5, 0.5],
            translation: [0.0, 0.0, -1.0],
            rotation_y: FRAC_PI_2,
        }
    }
}
