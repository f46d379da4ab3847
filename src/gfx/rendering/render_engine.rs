//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the depth buffer, the global uniforms
//! and the scene pipeline, and records one forward pass per frame.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    error::RenderError,
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent},
            texture_resource::TextureResource,
            SceneLayouts,
        },
        scene::{light::Fog, scene::Scene},
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SCENE_SHADER: &str = "scene";
const SCENE_PIPELINE: &str = "Scene";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    layouts: SceneLayouts,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // shaders output linear color and rely on the target to encode it
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new_with_data(&device, &GlobalUBOContent::default());
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let layouts = SceneLayouts::new(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader(SCENE_SHADER, include_str!("scene.wgsl"));
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default()
                .with_label("Scene Pipeline")
                .with_shader(SCENE_SHADER)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    layouts.instance.layout.clone(),
                    layouts.material.layout.clone(),
                ]),
        );
        pipeline_manager.create_all_pipelines()?;

        log::info!("surface configured at {}x{} ({:?})", config.width, config.height, format);

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            layouts,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Uploads new scene resources and writes this frame's uniforms
    ///
    /// Must run after the scene update and before [`RenderEngine::render_frame`].
    pub fn update(&mut self, scene: &mut Scene) {
        scene.prepare_gpu(&self.device, &self.queue, &self.layouts);

        let lights = scene.collect_lights();
        let fog = scene.fog.unwrap_or_else(Fog::disabled);
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            &scene.camera_manager.camera.uniform,
            &lights,
            &fog,
        );

        // the background reads as fully fogged geometry
        self.clear_color = wgpu::Color {
            r: fog.color[0] as f64,
            g: fog.color[1] as f64,
            b: fog.color[2] as f64,
            a: 1.0,
        };
    }

    /// Renders one frame of the scene
    ///
    /// Surface errors are returned so the caller can decide between
    /// reconfiguring, skipping the frame and shutting down.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            match self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                Ok(pipeline) => {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                    scene.draw(&mut render_pass);
                }
                Err(e) => log::error!("skipping scene draw: {e}"),
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        log::debug!("surface resized to {width}x{height}");
    }

    /// Reapplies the current surface configuration, e.g. after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
