use glam::{Mat4, Vec2, Vec3};
use log::debug;

use crate::camera::{CameraSet, CameraSlot};
use crate::error::Result;
use crate::grid::{make_vertex, LineVertex};
use crate::layout::Rect;
use crate::node::NodeGraph;

//
// ──────────────────────────────────────────────────────────────
//   Draw commands
//
//   The scene is the same for every camera: swarm, then grid,
//   then (unless we are looking through the orbit camera) the
//   orbit camera's frustum as a wireframe.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand
{
  Swarm,
  Grid,
  Frustum(FrustumWire),
}

pub fn draw_scene(slot: CameraSlot, cameras: &CameraSet, nodes: &NodeGraph) -> Result<Vec<DrawCommand>>
{
  let mut commands = vec![DrawCommand::Swarm, DrawCommand::Grid];

  // never preview the orbit camera from inside itself
  if slot.is_orbit()
  {
    return Ok(commands);
  }

  let view_proj = cameras.preview_view_projection(nodes)?;

  match FrustumWire::from_view_projection(view_proj)
  {
    Some(wire) => commands.push(DrawCommand::Frustum(wire)),
    None => debug!("orbit camera view-projection is singular; frustum skipped"),
  }

  Ok(commands)
}

//
// ──────────────────────────────────────────────────────────────
//   Frustum wireframe
//
//   In clip space the view volume is a box: x, y in [-1, 1] and
//   z in [0, 1] (wgpu depth range, glam *_rh projections).
//   Pushing its corners through the inverse view-projection gives
//   the frustum in world space.
// ──────────────────────────────────────────────────────────────
//

pub const FRUSTUM_COLOR: [f32; 3] = [1.0, 100.0 / 255.0, 100.0 / 255.0];

#[rustfmt::skip]
const CLIP_CORNERS: [Vec3; 8] = [
  // near plane (small rectangle at the camera)
  Vec3::new(-1.0, -1.0, 0.0),
  Vec3::new(-1.0,  1.0, 0.0),
  Vec3::new( 1.0,  1.0, 0.0),
  Vec3::new( 1.0, -1.0, 0.0),
  // far plane
  Vec3::new(-1.0, -1.0, 1.0),
  Vec3::new(-1.0,  1.0, 1.0),
  Vec3::new( 1.0,  1.0, 1.0),
  Vec3::new( 1.0, -1.0, 1.0),
];

#[rustfmt::skip]
const EDGES: [(usize, usize); 12] = [
  (0, 1), (1, 2), (2, 3), (3, 0), // near loop
  (4, 5), (5, 6), (6, 7), (7, 4), // far loop
  (0, 4), (1, 5), (2, 6), (3, 7), // long edges
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumWire
{
  /// World-space corners: near loop 0..4, far loop 4..8.
  pub corners: [Vec3; 8],
}

impl FrustumWire
{
  /// `None` when the matrix cannot be inverted into finite corners.
  pub fn from_view_projection(view_proj: Mat4) -> Option<Self>
  {
    let det = view_proj.determinant();
    if det == 0.0 || !det.is_finite()
    {
      return None;
    }

    let inverse = view_proj.inverse();
    let corners = CLIP_CORNERS.map(|c| inverse.project_point3(c));

    corners.iter().all(|c| c.is_finite()).then_some(Self { corners })
  }

  pub fn edges(&self) -> [(Vec3, Vec3); 12]
  {
    EDGES.map(|(a, b)| (self.corners[a], self.corners[b]))
  }

  pub fn line_vertices(&self) -> Vec<LineVertex>
  {
    self
      .edges()
      .iter()
      .flat_map(|(a, b)| [make_vertex(a.to_array(), FRUSTUM_COLOR), make_vertex(b.to_array(), FRUSTUM_COLOR)])
      .collect()
  }
}

//
// ──────────────────────────────────────────────────────────────
//   World → screen
// ──────────────────────────────────────────────────────────────
//

/// Pixel position of `world` inside `viewport`, or `None` if it is behind
/// the camera or outside the depth range.
pub fn project_to_viewport(view_proj: Mat4, viewport: Rect, world: Vec3) -> Option<Vec2>
{
  let clip = view_proj * world.extend(1.0);
  if clip.w <= 0.0
  {
    return None;
  }

  let ndc = clip.truncate() / clip.w;
  if !(0.0..=1.0).contains(&ndc.z)
  {
    return None;
  }

  let x = viewport.x as f32 + (ndc.x + 1.0) * 0.5 * viewport.width as f32;
  let y = viewport.y as f32 + (1.0 - ndc.y) * 0.5 * viewport.height as f32;

  Some(Vec2::new(x, y))
}

#[cfg(test)]
mod tests
{
  use super::*;
  use crate::config::DemoConfig;
  use crate::node::NodeGraph;

  fn setup() -> (NodeGraph, CameraSet)
  {
    let mut nodes = NodeGraph::new();
    let target = nodes.add("swarm");
    let cameras = CameraSet::new(&mut nodes, &DemoConfig::default(), target).unwrap();
    (nodes, cameras)
  }

  fn has_frustum(commands: &[DrawCommand]) -> bool
  {
    commands.iter().any(|c| matches!(c, DrawCommand::Frustum(_)))
  }

  #[test]
  fn orbit_slot_never_draws_frustum()
  {
    let (nodes, cameras) = setup();
    let commands = draw_scene(CameraSlot::ORBIT, &cameras, &nodes).unwrap();

    assert_eq!(commands, vec![DrawCommand::Swarm, DrawCommand::Grid]);
  }

  #[test]
  fn fixed_slots_always_draw_frustum_last()
  {
    let (nodes, cameras) = setup();

    for slot in [CameraSlot::FRONT, CameraSlot::TOP, CameraSlot::LEFT]
    {
      let commands = draw_scene(slot, &cameras, &nodes).unwrap();

      assert_eq!(commands.len(), 3);
      assert_eq!(commands[0], DrawCommand::Swarm);
      assert_eq!(commands[1], DrawCommand::Grid);
      assert!(has_frustum(&commands));
    }
  }

  #[test]
  fn singular_matrix_skips_wire()
  {
    assert_eq!(FrustumWire::from_view_projection(Mat4::ZERO), None);
    assert_eq!(FrustumWire::from_view_projection(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))), None);
  }

  #[test]
  fn degenerate_orbit_depth_drops_only_the_frustum()
  {
    let mut config = DemoConfig::default();
    config.orbit.far = config.orbit.near;

    let mut nodes = NodeGraph::new();
    let target = nodes.add("swarm");
    let cameras = CameraSet::new(&mut nodes, &config, target).unwrap();

    for slot in [CameraSlot::FRONT, CameraSlot::TOP, CameraSlot::LEFT]
    {
      let commands = draw_scene(slot, &cameras, &nodes).unwrap();
      assert_eq!(commands, vec![DrawCommand::Swarm, DrawCommand::Grid]);
    }
  }

  #[test]
  fn identity_wire_is_the_clip_box()
  {
    let wire = FrustumWire::from_view_projection(Mat4::IDENTITY).unwrap();

    assert_eq!(wire.corners, CLIP_CORNERS);
    assert_eq!(wire.line_vertices().len(), 24);
  }

  #[test]
  fn near_plane_sits_near_distance_from_eye()
  {
    let eye = Vec3::new(0.0, 0.0, 10.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(60f32.to_radians(), 1.5, 1.0, 300.0);

    let wire = FrustumWire::from_view_projection(proj * view).unwrap();
    let near_centre = wire.corners[..4].iter().copied().sum::<Vec3>() / 4.0;
    let far_centre = wire.corners[4..].iter().copied().sum::<Vec3>() / 4.0;

    assert!((near_centre.distance(eye) - 1.0).abs() < 1e-3);
    assert!((far_centre.distance(eye) - 300.0).abs() < 0.5);
  }

  #[test]
  fn projection_maps_clip_corners_to_viewport_corners()
  {
    let rect = Rect::new(100, 50, 200, 100);

    let top_left = project_to_viewport(Mat4::IDENTITY, rect, Vec3::new(-1.0, 1.0, 0.5)).unwrap();
    let bottom_right = project_to_viewport(Mat4::IDENTITY, rect, Vec3::new(1.0, -1.0, 0.5)).unwrap();

    assert_eq!(top_left, Vec2::new(100.0, 50.0));
    assert_eq!(bottom_right, Vec2::new(300.0, 150.0));
  }

  #[test]
  fn projection_rejects_points_behind_camera()
  {
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);

    assert!(project_to_viewport(proj * view, Rect::new(0, 0, 10, 10), Vec3::new(0.0, 0.0, 5.0)).is_none());
    assert!(project_to_viewport(proj * view, Rect::new(0, 0, 10, 10), Vec3::new(0.0, 0.0, -5.0)).is_some());
  }
}
