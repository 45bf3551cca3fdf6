use std::ops::Range;

use quadview_core::grid::{grid_vertices, LineVertex};
use quadview_core::{DrawCommand, Frame};
use wgpu::util::DeviceExt;

use super::depth::DepthResources;
use super::uniform::MAX_PASSES;

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

// 12 edges, 2 vertices each
const FRUSTUM_VERTS: u64 = 24;
const VERTEX_SIZE: u64 = std::mem::size_of::<LineVertex>() as u64;

//
// ──────────────────────────────────────────────────────────────
//   LineMeshes
//
//   grid    → static, uploaded once
//   frustum → one 24-vertex slot per viewport pass, rewritten
//             every frame
// ──────────────────────────────────────────────────────────────
//

pub struct LineMeshes
{
  pub grid_buffer: wgpu::Buffer,
  pub grid_count: u32,
  pub frustum_buffer: wgpu::Buffer,
  frustum_ranges: [Option<Range<u32>>; MAX_PASSES],
}

impl LineMeshes
{
  pub fn create(device: &wgpu::Device) -> Self
  {
    let grid = grid_vertices();

    let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Grid Vertex Buffer"),
      contents: bytemuck::cast_slice(&grid),
      usage: wgpu::BufferUsages::VERTEX,
    });

    let frustum_buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some("Frustum Vertex Buffer"),
      size: FRUSTUM_VERTS * VERTEX_SIZE * MAX_PASSES as u64,
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });

    Self { grid_buffer, grid_count: grid.len() as u32, frustum_buffer, frustum_ranges: Default::default() }
  }

  /// Upload each pass's frustum wire into its own slot.
  pub fn update_frustums(&mut self, queue: &wgpu::Queue, frame: &Frame)
  {
    self.frustum_ranges = Default::default();

    for (i, pass) in frame.passes.iter().take(MAX_PASSES).enumerate()
    {
      let wire = pass.commands.iter().find_map(|c| match c
      {
        DrawCommand::Frustum(wire) => Some(wire),
        _ => None,
      });

      let Some(wire) = wire else { continue };

      let verts = wire.line_vertices();
      let first = i as u64 * FRUSTUM_VERTS;

      queue.write_buffer(&self.frustum_buffer, first * VERTEX_SIZE, bytemuck::cast_slice(&verts));
      self.frustum_ranges[i] = Some(first as u32..(first as u32 + verts.len() as u32));
    }
  }

  pub fn frustum_range(&self, pass_index: usize) -> Option<Range<u32>>
  {
    self.frustum_ranges.get(pass_index).cloned().flatten()
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Pipeline
// ──────────────────────────────────────────────────────────────
//

pub fn create_line_pipeline(
  device: &wgpu::Device,
  format: wgpu::TextureFormat,
  view_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline
{
  let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
    label: Some("Line Shader"),
    source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/lines.wgsl").into()),
  });

  let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
    label: Some("Line Pipeline Layout"),
    bind_group_layouts: &[view_bgl],
    push_constant_ranges: &[],
  });

  device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    label: Some("Line Pipeline"),
    layout: Some(&layout),
    vertex: wgpu::VertexState {
      module: &shader,
      entry_point: Some("vs_main"),
      buffers: &[wgpu::VertexBufferLayout {
        array_stride: VERTEX_SIZE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
          0 => Float32x3,  // position
          1 => Float32x3,  // colour
        ],
      }],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    },
    fragment: Some(wgpu::FragmentState {
      module: &shader,
      entry_point: Some("fs_main"),
      targets: &[Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
      })],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    }),
    primitive: wgpu::PrimitiveState {
      topology: wgpu::PrimitiveTopology::LineList,
      strip_index_format: None,
      front_face: wgpu::FrontFace::Ccw,
      cull_mode: None,
      unclipped_depth: false,
      polygon_mode: wgpu::PolygonMode::Fill,
      conservative: false,
    },
    depth_stencil: Some(DepthResources::depth_state(true)),
    multisample: wgpu::MultisampleState::default(),
    multiview: None,
    cache: None,
  })
}
