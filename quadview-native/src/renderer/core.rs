use std::sync::Arc;

use anyhow::{anyhow, Context};
use glam::Vec3;
use log::{info, warn};
use quadview_core::{DrawCommand, Frame};
use winit::window::Window;

use super::depth::DepthResources;
use super::gui::GuiRenderer;
use super::lines::{create_line_pipeline, LineMeshes};
use super::particles::{create_particle_pipeline, ParticleInstance, ParticleMesh};
use super::uniform::{ViewUniform, ViewUniforms, MAX_PASSES};

pub struct Renderer
{
  surface: wgpu::Surface<'static>,
  device: wgpu::Device,
  queue: wgpu::Queue,
  config: wgpu::SurfaceConfiguration,
  clear_color: wgpu::Color,

  depth: DepthResources,
  views: ViewUniforms,

  line_pipeline: wgpu::RenderPipeline,
  lines: LineMeshes,

  particle_pipeline: wgpu::RenderPipeline,
  particles: ParticleMesh,

  gui: GuiRenderer,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl Renderer
{
  pub async fn new(window: Arc<Window>, background: [f32; 3], particle_capacity: usize) -> anyhow::Result<Self>
  {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone()).context("creating window surface")?;

    let adapter = request_adapter(&instance, &surface).await?;
    let (device, queue) = request_device(&adapter).await?;

    let info = adapter.get_info();
    info!("GPU: {} ({:?})", info.name, info.backend);

    let config = configure_surface(&window, &surface, &adapter, &device)?;
    let depth = DepthResources::create(&device, config.width, config.height);
    let views = ViewUniforms::create(&device);

    let line_pipeline = create_line_pipeline(&device, config.format, &views.bind_group_layout);
    let lines = LineMeshes::create(&device);

    let particle_pipeline = create_particle_pipeline(&device, config.format, &views.bind_group_layout);
    let particles = ParticleMesh::create(&device, particle_capacity);

    let gui = GuiRenderer::new(&device, config.format, &window);

    let [r, g, b] = background.map(f64::from);
    let clear_color = wgpu::Color { r, g, b, a: 1.0 };

    Ok(Self {
      surface,
      device,
      queue,
      config,
      clear_color,
      depth,
      views,
      line_pipeline,
      lines,
      particle_pipeline,
      particles,
      gui,
    })
  }

  /// Zero sizes (minimised window) are ignored; the last good surface is kept.
  pub fn resize(&mut self, width: u32, height: u32)
  {
    if width == 0 || height == 0
    {
      return;
    }

    self.config.width = width;
    self.config.height = height;
    self.surface.configure(&self.device, &self.config);
    self.depth = DepthResources::create(&self.device, width, height);
  }

  pub fn handle_gui_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool
  {
    self.gui.handle_event(window, event)
  }

  pub fn render(
    &mut self,
    window: &Window,
    frame: &Frame,
    instances: &[ParticleInstance],
    light: Vec3,
  ) -> anyhow::Result<()>
  {
    let Some(surface_frame) = self.acquire_frame()? else { return Ok(()) };

    let view = surface_frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    self.upload(frame, instances, light);

    let mut encoder = self
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame Encoder") });

    self.record_scene_pass(&mut encoder, &view, frame);

    // overlay last so it sits on top of every viewport
    let gui_output = self.gui.build(window, &frame.overlay);
    self.gui.render(&self.device, &self.queue, &mut encoder, window, &view, gui_output);

    self.queue.submit(Some(encoder.finish()));
    window.pre_present_notify();
    surface_frame.present();

    Ok(())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Per-frame helpers
// ──────────────────────────────────────────────────────────────
//

impl Renderer
{
  fn acquire_frame(&mut self) -> anyhow::Result<Option<wgpu::SurfaceTexture>>
  {
    match self.surface.get_current_texture()
    {
      Ok(frame) => Ok(Some(frame)),

      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) =>
      {
        warn!("surface lost or outdated, reconfiguring");
        self.surface.configure(&self.device, &self.config);
        Ok(None)
      }

      Err(wgpu::SurfaceError::Timeout) =>
      {
        warn!("surface timeout, skipping frame");
        Ok(None)
      }

      Err(err) => Err(anyhow!("cannot acquire surface texture: {err}")),
    }
  }

  fn upload(&mut self, frame: &Frame, instances: &[ParticleInstance], light: Vec3)
  {
    for (i, pass) in frame.passes.iter().take(MAX_PASSES).enumerate()
    {
      self.views.write(&self.queue, i, &ViewUniform::new(pass.view_proj, light));
    }

    self.lines.update_frustums(&self.queue, frame);
    self.particles.update(&self.device, &self.queue, instances);
  }

  fn record_scene_pass(&self, encoder: &mut wgpu::CommandEncoder, color_view: &wgpu::TextureView, frame: &Frame)
  {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
      label: Some("Scene Pass"),
      color_attachments: &[Some(wgpu::RenderPassColorAttachment {
        view: color_view,
        resolve_target: None,
        ops: wgpu::Operations { load: wgpu::LoadOp::Clear(self.clear_color), store: wgpu::StoreOp::Store },
        depth_slice: None,
      })],
      depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
        view: &self.depth.view,
        depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
        stencil_ops: None,
      }),
      occlusion_query_set: None,
      timestamp_writes: None,
    });

    for (i, vp) in frame.passes.iter().take(MAX_PASSES).enumerate()
    {
      let Some((x, y, w, h)) = clamp_to_surface(vp.viewport, self.config.width, self.config.height) else { continue };

      pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
      pass.set_scissor_rect(x, y, w, h);
      pass.set_bind_group(0, &self.views.bind_group, &[self.views.offset(i)]);

      for command in &vp.commands
      {
        match command
        {
          DrawCommand::Swarm =>
          {
            pass.set_pipeline(&self.particle_pipeline);
            pass.set_vertex_buffer(0, self.particles.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.particles.instance_buffer.slice(..));
            pass.set_index_buffer(self.particles.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.particles.index_count, 0, 0..self.particles.instance_count);
          }

          DrawCommand::Grid =>
          {
            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.lines.grid_buffer.slice(..));
            pass.draw(0..self.lines.grid_count, 0..1);
          }

          DrawCommand::Frustum(_) =>
          {
            if let Some(range) = self.lines.frustum_range(i)
            {
              pass.set_pipeline(&self.line_pipeline);
              pass.set_vertex_buffer(0, self.lines.frustum_buffer.slice(..));
              pass.draw(range, 0..1);
            }
          }
        }
      }
    }
  }
}

/// Clip a viewport to the surface; `None` when nothing is left to draw into.
fn clamp_to_surface(rect: quadview_core::Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)>
{
  if rect.x >= width || rect.y >= height
  {
    return None;
  }

  let w = rect.width.min(width - rect.x);
  let h = rect.height.min(height - rect.y);

  (w > 0 && h > 0).then_some((rect.x, rect.y, w, h))
}

//
// ──────────────────────────────────────────────────────────────
//   Initialization Helpers
// ──────────────────────────────────────────────────────────────
//

async fn request_adapter(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> anyhow::Result<wgpu::Adapter>
{
  instance
    .request_adapter(&wgpu::RequestAdapterOptions {
      power_preference: wgpu::PowerPreference::HighPerformance,
      compatible_surface: Some(surface),
      force_fallback_adapter: false,
    })
    .await
    .context("no suitable GPU adapter found")
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)>
{
  adapter
    .request_device(&wgpu::DeviceDescriptor {
      label: Some("Quadview Device"),
      required_features: wgpu::Features::empty(),
      required_limits: wgpu::Limits::default(),
      ..Default::default()
    })
    .await
    .context("failed to create GPU device")
}

fn configure_surface(
  window: &Window,
  surface: &wgpu::Surface<'_>,
  adapter: &wgpu::Adapter,
  device: &wgpu::Device,
) -> anyhow::Result<wgpu::SurfaceConfiguration>
{
  let size = window.inner_size();
  let caps = surface.get_capabilities(adapter);

  // egui-wgpu expects a linear (non-sRGB) target; colours are given as-is
  let format = caps
    .formats
    .iter()
    .copied()
    .find(|f| !f.is_srgb())
    .or_else(|| caps.formats.first().copied())
    .context("surface reports no supported formats")?;

  let config = wgpu::SurfaceConfiguration {
    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    format,
    width: size.width.max(1),
    height: size.height.max(1),
    present_mode: wgpu::PresentMode::Fifo,
    alpha_mode: wgpu::CompositeAlphaMode::Auto,
    view_formats: vec![],
    desired_maximum_frame_latency: 2,
  };

  surface.configure(device, &config);
  Ok(config)
}
