use std::num::NonZeroU64;

use glam::{Mat4, Vec3};

//
// ──────────────────────────────────────────────────────────────
//   View Uniform (GPU side)
//
//   WGSL layout (lines.wgsl, particles.wgsl):
//     view_proj : mat4x4<f32>   → 64 bytes
//     light_pos : vec4<f32>     → 16 bytes
//   Total: 80 bytes
//
//   One slot per viewport pass, addressed by dynamic offset.
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniform
{
  pub view_proj: [[f32; 4]; 4], // 64 bytes
  pub light_pos: [f32; 4],      // 16 bytes, w unused
}

// Catch CPU/GPU layout mismatches at compile time
const _: () = assert!(std::mem::size_of::<ViewUniform>() == 80);

const UNIFORM_SIZE: u64 = std::mem::size_of::<ViewUniform>() as u64;

/// Main view plus four grid cells.
pub const MAX_PASSES: usize = 5;

impl ViewUniform
{
  pub fn new(view_proj: Mat4, light: Vec3) -> Self
  {
    Self { view_proj: view_proj.to_cols_array_2d(), light_pos: light.extend(1.0).to_array() }
  }
}

pub struct ViewUniforms
{
  pub buffer: wgpu::Buffer,
  pub bind_group: wgpu::BindGroup,
  pub bind_group_layout: wgpu::BindGroupLayout,
  stride: u64,
}

impl ViewUniforms
{
  pub fn create(device: &wgpu::Device) -> Self
  {
    let align = device.limits().min_uniform_buffer_offset_alignment as u64;
    let stride = UNIFORM_SIZE.div_ceil(align) * align;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some("View Uniform Buffer"),
      size: stride * MAX_PASSES as u64,
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("View BGL"),
      entries: &[wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
          ty: wgpu::BufferBindingType::Uniform,
          has_dynamic_offset: true,
          min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
        },
        count: None,
      }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some("View BG"),
      layout: &bind_group_layout,
      entries: &[wgpu::BindGroupEntry {
        binding: 0,
        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
          buffer: &buffer,
          offset: 0,
          size: NonZeroU64::new(UNIFORM_SIZE),
        }),
      }],
    });

    Self { buffer, bind_group, bind_group_layout, stride }
  }

  pub fn write(&self, queue: &wgpu::Queue, pass_index: usize, uniform: &ViewUniform)
  {
    queue.write_buffer(&self.buffer, self.stride * pass_index as u64, bytemuck::bytes_of(uniform));
  }

  pub fn offset(&self, pass_index: usize) -> u32
  {
    (self.stride * pass_index as u64) as u32
  }
}
