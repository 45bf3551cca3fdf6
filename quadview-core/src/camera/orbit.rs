use glam::Vec3;

use crate::error::Result;
use crate::node::{NodeGraph, NodeId};

//
// ──────────────────────────────────────────────────────────────
//   Orbit camera (spherical coordinates, Y-up right-hand rule)
//
//   The eye position is derived from spherical coordinates
//   centred on the target node (plus a pan offset):
//     azimuth   = horizontal angle (radians, from +Z axis)
//     elevation = angle above the XZ plane (radians)
//     radius    = distance from target to eye
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct OrbitCamera
{
  pub target: NodeId,
  pub pan_offset: Vec3,
  pub radius: f32,
  pub azimuth: f32,
  pub elevation: f32,
}

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

const RADIUS_MIN: f32 = 1.0;
const RADIUS_MAX: f32 = 2_000.0;
const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01; // just short of the poles

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl OrbitCamera
{
  pub fn new(target: NodeId, radius: f32) -> Self
  {
    Self {
      target,
      pan_offset: Vec3::ZERO,
      radius: radius.clamp(RADIUS_MIN, RADIUS_MAX),
      azimuth: std::f32::consts::FRAC_PI_6,   // 30° off +Z
      elevation: std::f32::consts::FRAC_PI_8, // 22.5° above ground
    }
  }

  /// Rotate around the target point.
  /// `delta_az` and `delta_el` are in radians.
  pub fn orbit(&mut self, delta_az: f32, delta_el: f32)
  {
    self.azimuth += delta_az;
    self.elevation = (self.elevation + delta_el).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
  }

  /// Multiplicative zoom. `factor` > 1 zooms out, < 1 zooms in.
  pub fn zoom(&mut self, factor: f32)
  {
    if !factor.is_finite() || factor <= 0.0
    {
      return;
    }

    self.radius = (self.radius * factor).clamp(RADIUS_MIN, RADIUS_MAX);
  }

  /// Translate the look-at point in the camera's screen plane.
  /// `dx` and `dy` are in world-space units.
  pub fn pan(&mut self, dx: f32, dy: f32)
  {
    let fwd = -self.offset().normalize_or_zero();
    let right = fwd.cross(Vec3::Y).normalize_or_zero();
    let up = right.cross(fwd).normalize_or_zero();

    self.pan_offset += right * dx + up * dy;
  }

  /// World-space point the camera looks at.
  pub fn focus(&self, nodes: &NodeGraph) -> Result<Vec3>
  {
    Ok(nodes.global_position(self.target)? + self.pan_offset)
  }

  /// World-space eye position.
  pub fn eye_position(&self, nodes: &NodeGraph) -> Result<Vec3>
  {
    Ok(self.focus(nodes)? + self.offset())
  }

  /// Write the current eye/orientation into the camera's node.
  pub fn apply(&self, nodes: &mut NodeGraph, camera_node: NodeId) -> Result<()>
  {
    let focus = self.focus(nodes)?;
    let eye = focus + self.offset();

    nodes.look_at(camera_node, eye, focus, Vec3::Y)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Spherical → cartesian
// ──────────────────────────────────────────────────────────────
//

impl OrbitCamera
{
  fn offset(&self) -> Vec3
  {
    let cos_el = self.elevation.cos();
    let sin_el = self.elevation.sin();
    let cos_az = self.azimuth.cos();
    let sin_az = self.azimuth.sin();

    Vec3::new(self.radius * cos_el * sin_az, self.radius * sin_el, self.radius * cos_el * cos_az)
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn setup() -> (NodeGraph, NodeId, NodeId)
  {
    let mut nodes = NodeGraph::new();
    let target = nodes.add("target");
    let cam = nodes.add("cam");
    (nodes, target, cam)
  }

  #[test]
  fn eye_sits_at_radius_from_target()
  {
    let (mut nodes, target, _) = setup();
    nodes.set_position(target, Vec3::new(3.0, 2.0, 1.0)).unwrap();

    let orbit = OrbitCamera::new(target, 50.0);
    let eye = orbit.eye_position(&nodes).unwrap();

    assert!((eye.distance(Vec3::new(3.0, 2.0, 1.0)) - 50.0).abs() < 1e-3);
  }

  #[test]
  fn elevation_is_clamped()
  {
    let (_, target, _) = setup();
    let mut orbit = OrbitCamera::new(target, 10.0);

    orbit.orbit(0.0, 10.0);
    assert!(orbit.elevation < std::f32::consts::FRAC_PI_2);

    orbit.orbit(0.0, -20.0);
    assert!(orbit.elevation > -std::f32::consts::FRAC_PI_2);
  }

  #[test]
  fn zoom_respects_limits_and_ignores_bad_factors()
  {
    let (_, target, _) = setup();
    let mut orbit = OrbitCamera::new(target, 10.0);

    orbit.zoom(0.0);
    orbit.zoom(f32::NAN);
    assert_eq!(orbit.radius, 10.0);

    orbit.zoom(1e-6);
    assert_eq!(orbit.radius, RADIUS_MIN);

    orbit.zoom(1e9);
    assert_eq!(orbit.radius, RADIUS_MAX);
  }

  #[test]
  fn apply_points_node_at_focus()
  {
    let (mut nodes, target, cam) = setup();
    let mut orbit = OrbitCamera::new(target, 20.0);
    orbit.pan(2.0, 0.0);
    orbit.apply(&mut nodes, cam).unwrap();

    let world = nodes.global_matrix(cam).unwrap();
    let forward = world.transform_vector3(Vec3::NEG_Z);
    let to_focus = (orbit.focus(&nodes).unwrap() - orbit.eye_position(&nodes).unwrap()).normalize();

    assert!((forward - to_focus).length() < 1e-4);
  }
}
