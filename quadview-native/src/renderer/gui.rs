use egui::{Align2, Color32, FontId, Pos2, Stroke, StrokeKind};
use egui_wgpu::{Renderer, RendererOptions, ScreenDescriptor};
use egui_winit::State;
use quadview_core::{Overlay, Rect};
use winit::event::WindowEvent;
use winit::window::Window;

//
// ──────────────────────────────────────────────────────────────
//   Overlay style
// ──────────────────────────────────────────────────────────────
//

const OUTLINE_WIDTH_PX: f32 = 5.0;
const LABEL_SIZE: f32 = 13.0;
const HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(40, 40, 40, 40);

//
// ──────────────────────────────────────────────────────────────
//   GuiRenderer
//
//   egui is only used as a screen-space painter here: labels,
//   outlines and the selection highlight, all drawn after the
//   3D passes so they sit on top.
// ──────────────────────────────────────────────────────────────
//

pub struct GuiRenderer
{
  pub context: egui::Context,
  pub state: State,
  pub renderer: Renderer,
}

impl GuiRenderer
{
  pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self
  {
    let context = egui::Context::default();
    let state = State::new(
      context.clone(),
      egui::viewport::ViewportId::ROOT,
      window,
      Some(window.scale_factor() as f32),
      None,
      None,
    );

    let renderer = Renderer::new(
      device,
      output_format,
      RendererOptions {
        depth_stencil_format: None,
        msaa_samples: 1,
        predictable_texture_filtering: false,
        dithering: true,
      },
    );

    Self { context, state, renderer }
  }

  /// Feed egui; `true` when egui claims the event for itself.
  pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool
  {
    // the overlay repaints every frame, so the repaint hint is not needed
    let response = self.state.on_window_event(window, event);
    response.consumed
  }

  /// Run one egui frame that paints `overlay`.
  pub fn build(&mut self, window: &Window, overlay: &Overlay) -> egui::FullOutput
  {
    let raw_input = self.state.take_egui_input(window);
    let full_output = self.context.run(raw_input, |ctx| paint_overlay(ctx, overlay));

    self.state.handle_platform_output(window, full_output.platform_output.clone());
    full_output
  }

  pub fn render(
    &mut self,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
    window: &Window,
    view: &wgpu::TextureView,
    full_output: egui::FullOutput,
  )
  {
    let size = window.inner_size();
    let ppp = full_output.pixels_per_point;
    let screen_descriptor =
      ScreenDescriptor { size_in_pixels: [size.width, size.height], pixels_per_point: ppp };

    for (id, delta) in full_output.textures_delta.set
    {
      self.renderer.update_texture(device, queue, id, &delta);
    }

    let tris = self.context.tessellate(full_output.shapes, ppp);
    self.renderer.update_buffers(device, queue, encoder, &tris, &screen_descriptor);

    {
      let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Overlay Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
          view,
          resolve_target: None,
          ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
          depth_slice: None,
        })],
        ..Default::default()
      });

      // egui-wgpu wants a 'static pass; it is dropped at the end of this block
      let mut pass = pass.forget_lifetime();

      self.renderer.render(&mut pass, &tris, &screen_descriptor);
    }

    for id in full_output.textures_delta.free
    {
      self.renderer.free_texture(&id);
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Painting (pixel rects → egui points)
// ──────────────────────────────────────────────────────────────
//

fn paint_overlay(ctx: &egui::Context, overlay: &Overlay)
{
  let ppp = ctx.pixels_per_point();
  let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("quadview_overlay")));

  painter.rect_filled(to_points(overlay.highlight, ppp), 0.0, HIGHLIGHT);

  let stroke = Stroke::new(OUTLINE_WIDTH_PX / ppp, Color32::WHITE);
  for rect in &overlay.outlines
  {
    painter.rect_stroke(to_points(*rect, ppp), 0.0, stroke, StrokeKind::Inside);
  }

  for label in &overlay.labels
  {
    painter.text(
      Pos2::new(label.x / ppp, label.y / ppp),
      Align2::LEFT_BOTTOM,
      &label.text,
      FontId::monospace(LABEL_SIZE),
      Color32::WHITE,
    );
  }
}

fn to_points(rect: Rect, ppp: f32) -> egui::Rect
{
  egui::Rect::from_min_size(
    Pos2::new(rect.x as f32 / ppp, rect.y as f32 / ppp),
    egui::vec2(rect.width as f32 / ppp, rect.height as f32 / ppp),
  )
}
