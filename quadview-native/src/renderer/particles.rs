use glam::Vec3;
use wgpu::util::DeviceExt;

use super::depth::DepthResources;

//
// ──────────────────────────────────────────────────────────────
//   Vertex layout: [x, y, z,  nx, ny, nz]  (unit cube, per face normals)
// ──────────────────────────────────────────────────────────────
//

type Vertex = [f32; 6];

/// One cube per particle, scaled and tinted per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance
{
  pub position: [f32; 3],
  pub size: f32,
  pub color: [f32; 3],
  /// 1.0 → shaded by the light, 0.0 → flat colour (the light marker itself)
  pub lit: f32,
}

const _: () = assert!(std::mem::size_of::<ParticleInstance>() == 32);

impl ParticleInstance
{
  pub fn lit(position: Vec3, size: f32, color: [f32; 3]) -> Self
  {
    Self { position: position.to_array(), size, color, lit: 1.0 }
  }

  pub fn flat(position: Vec3, size: f32, color: [f32; 3]) -> Self
  {
    Self { position: position.to_array(), size, color, lit: 0.0 }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   ParticleMesh
// ──────────────────────────────────────────────────────────────
//

pub struct ParticleMesh
{
  pub vertex_buffer: wgpu::Buffer,
  pub index_buffer: wgpu::Buffer,
  pub index_count: u32,
  pub instance_buffer: wgpu::Buffer,
  pub instance_count: u32,
  instance_capacity: usize,
}

impl ParticleMesh
{
  pub fn create(device: &wgpu::Device, capacity: usize) -> Self
  {
    let (vertices, indices) = build_cube();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Particle Vertex Buffer"),
      contents: bytemuck::cast_slice(&vertices),
      usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Particle Index Buffer"),
      contents: bytemuck::cast_slice(&indices),
      usage: wgpu::BufferUsages::INDEX,
    });

    let capacity = capacity.max(1);
    let instance_buffer = create_instance_buffer(device, capacity);

    Self {
      vertex_buffer,
      index_buffer,
      index_count: indices.len() as u32,
      instance_buffer,
      instance_count: 0,
      instance_capacity: capacity,
    }
  }

  /// Upload this frame's instances, growing the buffer if needed.
  pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[ParticleInstance])
  {
    if instances.len() > self.instance_capacity
    {
      self.instance_capacity = instances.len().next_power_of_two();
      self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
    }

    queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
    self.instance_count = instances.len() as u32;
  }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer
{
  device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("Particle Instance Buffer"),
    size: (capacity * std::mem::size_of::<ParticleInstance>()) as u64,
    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  })
}

//
// ──────────────────────────────────────────────────────────────
//   Geometry builder
//
//   24 vertices (4 per face) so each face gets a flat normal.
// ──────────────────────────────────────────────────────────────
//

fn build_cube() -> (Vec<Vertex>, Vec<u16>)
{
  // (normal, u axis, v axis), with u × v = normal so winding is CCW from outside
  let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
  ];

  let mut vertices = Vec::with_capacity(24);
  let mut indices = Vec::with_capacity(36);

  for (normal, u, v) in faces
  {
    let n = Vec3::from(normal);
    let u = Vec3::from(u);
    let v = Vec3::from(v);
    let base = vertices.len() as u16;

    for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
    {
      let p = n + u * su + v * sv;
      vertices.push([p.x, p.y, p.z, n.x, n.y, n.z]);
    }

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
  }

  (vertices, indices)
}

//
// ──────────────────────────────────────────────────────────────
//   Pipeline
// ──────────────────────────────────────────────────────────────
//

pub fn create_particle_pipeline(
  device: &wgpu::Device,
  format: wgpu::TextureFormat,
  view_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline
{
  let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
    label: Some("Particle Shader"),
    source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
  });

  let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
    label: Some("Particle Pipeline Layout"),
    bind_group_layouts: &[view_bgl],
    push_constant_ranges: &[],
  });

  device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    label: Some("Particle Pipeline"),
    layout: Some(&layout),
    vertex: wgpu::VertexState {
      module: &shader,
      entry_point: Some("vs_main"),
      buffers: &[
        wgpu::VertexBufferLayout {
          array_stride: std::mem::size_of::<Vertex>() as u64,
          step_mode: wgpu::VertexStepMode::Vertex,
          attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,  // position
            1 => Float32x3,  // normal
          ],
        },
        wgpu::VertexBufferLayout {
          array_stride: std::mem::size_of::<ParticleInstance>() as u64,
          step_mode: wgpu::VertexStepMode::Instance,
          attributes: &wgpu::vertex_attr_array![
            2 => Float32x4,  // centre + size
            3 => Float32x4,  // colour + lit
          ],
        },
      ],
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
      topology: wgpu::PrimitiveTopology::TriangleList,
      front_face: wgpu::FrontFace::Ccw,
      cull_mode: Some(wgpu::Face::Back),
      ..Default::default()
    },
    depth_stencil: Some(DepthResources::depth_state(true)),
    multisample: wgpu::MultisampleState::default(),
    multiview: None,
    cache: None,
  })
}
