use std::sync::Arc;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::SceneConfig,
    gfx::rendering::RenderEngine,
    world::{HauntedScene, Viewport},
};

/// Window, renderer and event loop around one [`HauntedScene`].
pub struct HauntedHouseApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    haunted: HauntedScene,
    max_pixel_ratio: f64,
    error: Option<anyhow::Error>,
}

impl HauntedHouseApp {
    /// Creates the event loop and assembles the scene; the window opens in [`HauntedHouseApp::run`].
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let max_pixel_ratio = config.window.max_pixel_ratio;
        let haunted = HauntedScene::new(config, &mut rand::rng());
        log::info!("placed {} graves", haunted.graves().len());

        Ok(Self {
            event_loop,
            app_state: AppState {
                window: None,
                render_engine: None,
                haunted,
                max_pixel_ratio,
                error: None,
            },
        })
    }

    pub fn scene(&self) -> &HauntedScene {
        &self.app_state.haunted
    }

    /// Runs until the window is closed or Escape is pressed.
    ///
    /// Errors raised while opening the window or the GPU context end the loop
    /// and are returned here.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn viewport(&self, window: &Window) -> Viewport {
        let PhysicalSize { width, height } = window.inner_size();
        Viewport::from_physical(width, height, window.scale_factor(), self.max_pixel_ratio)
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.haunted.config().window;
        let attributes = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let viewport = self.viewport(&window);
        let (width, height) = viewport.surface_size();
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        log::info!("rendering at {width}x{height} ({:?})", renderer.surface_format());

        self.haunted.resize(&viewport);
        self.haunted.load_house_model();
        self.window = Some(window);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn resize(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let viewport = self.viewport(&window);
        if viewport.is_empty() {
            return;
        }

        self.haunted.resize(&viewport);
        if let Some(render_engine) = self.render_engine.as_mut() {
            let (width, height) = viewport.surface_size();
            render_engine.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        self.haunted.tick();
        render_engine.update(&mut self.haunted.scene);

        match render_engine.render_frame(&self.haunted.scene) {
            Ok(()) => {}
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("{e}; reconfiguring surface");
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("surface ran out of memory"));
            }
            Err(e) => log::warn!("skipping frame: {e}"),
        }
    }

    fn keyboard_input(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        self.haunted.scene.camera_manager.process_keyboard_event(event);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.open_window(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard_input(event_loop, &event),
            WindowEvent::MouseInput { state, button, .. } => {
                self.haunted.scene.camera_manager.process_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.haunted.scene.camera_manager.process_scroll(&delta);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.window.is_none() {
            return;
        }
        self.haunted.scene.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
