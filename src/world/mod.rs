//! # Haunted house world
//!
//! Everything the demo animates lives in one [`HauntedScene`]: the scene graph,
//! the grave layout, the ghost orbits, the elapsed-time clock and the pending
//! house model. The window loop in [`crate::app`] only calls [`HauntedScene::tick`]
//! and hands the scene to the renderer.
//!
//! - [`graves`] - annulus placement of the grave markers
//! - [`ghosts`] - closed-form ghost trajectories
//! - [`assets`] - threaded OBJ loading and texture decoding
//! - [`assembly`] - the static scene graph
//! - [`viewport`] / [`clock`] - window sizing and elapsed time

pub mod assembly;
pub mod assets;
pub mod clock;
pub mod ghosts;
pub mod graves;
pub mod viewport;

pub use assembly::SceneNodes;
pub use assets::{LoadOutcome, ModelAsset, ModelPart, PendingModel};
pub use clock::Clock;
pub use ghosts::{GhostOrbit, OrbitRadius};
pub use graves::GraveMarker;
pub use viewport::Viewport;

use cgmath::{Deg, Vector3};
use rand::Rng;

use crate::{
    config::SceneConfig,
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        scene::{NodeId, Scene},
    },
};

/// The running haunted-house scene.
pub struct HauntedScene {
    config: SceneConfig,
    pub scene: Scene,
    clock: Clock,
    nodes: SceneNodes,
    graves: Vec<GraveMarker>,
    ghost_orbits: [GhostOrbit; 3],
    pending_model: Option<PendingModel>,
    model: Option<NodeId>,
}

impl HauntedScene {
    /// Assembles the static scene; graves are scattered using `rng`.
    ///
    /// The house model is not requested here, see [`HauntedScene::load_house_model`].
    pub fn new<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Self {
        let camera_config = &config.camera;
        let aspect = config.window.width as f32 / config.window.height as f32;
        let camera = OrbitCamera::from_position(
            camera_config.position.into(),
            camera_config.target.into(),
            aspect,
        )
        .with_projection(Deg(camera_config.fov_y_degrees), camera_config.near, camera_config.far);
        let controller = CameraController::new(camera_config.rotate_speed, camera_config.zoom_speed)
            .with_pan_speed(camera_config.pan_speed)
            .with_damping(camera_config.damping_factor);

        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let graves = graves::place_graves(rng, &config.graves);
        let nodes = assembly::assemble(&mut scene, &config, &graves);
        let ghost_orbits = config.ghosts.map(|ghost| ghost.orbit);

        Self {
            config,
            scene,
            clock: Clock::start(),
            nodes,
            graves,
            ghost_orbits,
            pending_model: None,
            model: None,
        }
    }

    /// Starts loading the house model in the background. Only the first call has any effect.
    pub fn load_house_model(&mut self) {
        if self.pending_model.is_some() || self.model.is_some() {
            log::debug!("house model already requested");
            return;
        }
        let path = self.config.asset_path(&self.config.house.model);
        log::info!("loading house model from `{}`", path.display());
        self.pending_model = Some(assets::request_model(path));
    }

    /// Applies the model load result if it has arrived. Returns whether it did.
    pub fn poll_assets(&mut self) -> bool {
        let Some(outcome) = self.pending_model.as_mut().and_then(PendingModel::try_recv) else {
            return false;
        };
        self.pending_model = None;
        self.complete_model_load(outcome);
        true
    }

    /// Attaches a loaded model under the house group, or logs why loading failed.
    ///
    /// Returns the attached model group on success.
    pub fn complete_model_load(&mut self, outcome: LoadOutcome) -> Option<NodeId> {
        match outcome {
            LoadOutcome::Loaded(asset) => {
                log::info!(
                    "house model `{}` loaded: {} meshes, {} materials",
                    asset.path.display(),
                    asset.parts.len(),
                    asset.materials.len()
                );
                let group = assets::attach_model(&mut self.scene, self.nodes.house, asset, &self.config.house);
                self.model = Some(group);
                Some(group)
            }
            LoadOutcome::Failed(error) => {
                log::error!("could not load house model: {:#}", anyhow::Error::from(error));
                None
            }
        }
    }

    /// Advances the scene to elapsed time `t` seconds and returns the ghost positions.
    pub fn update(&mut self, t: f32) -> [Vector3<f32>; 3] {
        self.poll_assets();

        let positions = ghosts::step(&self.ghost_orbits, t);
        for (node, position) in self.nodes.ghosts.iter().zip(positions) {
            self.scene.graph.set_translation(*node, position);
        }

        self.scene.update();
        let eye = self.scene.camera_manager.camera.eye;
        self.scene.graph.set_translation(self.nodes.camera, eye);

        positions
    }

    /// One animation tick at the current clock time.
    pub fn tick(&mut self) -> [Vector3<f32>; 3] {
        self.update(self.clock.elapsed_secs())
    }

    /// Updates the camera aspect for a new window size; empty viewports are ignored.
    pub fn resize(&mut self, viewport: &Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.scene.camera_manager.resize(viewport.aspect());
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn nodes(&self) -> &SceneNodes {
        &self.nodes
    }

    pub fn graves(&self) -> &[GraveMarker] {
        &self.graves
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_loading(&self) -> bool {
        self.pending_model.is_some()
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }
}
