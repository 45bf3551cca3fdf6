mod fixed;
mod orbit;

pub use fixed::FixedView;
pub use orbit::OrbitCamera;

use glam::Mat4;
use log::debug;

use crate::config::DemoConfig;
use crate::error::{Result, SceneError};
use crate::layout::Rect;
use crate::node::{NodeGraph, NodeId};
use crate::scene::DrawCommand;

//
// ──────────────────────────────────────────────────────────────
//   Camera slots
//
//   0 → orbit (user controlled, perspective)
//   1 → front (orthographic)
//   2 → top   (orthographic)
//   3 → left  (orthographic)
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraSlot(usize);

impl CameraSlot
{
  pub const ORBIT: CameraSlot = CameraSlot(0);
  pub const FRONT: CameraSlot = CameraSlot(1);
  pub const TOP: CameraSlot = CameraSlot(2);
  pub const LEFT: CameraSlot = CameraSlot(3);

  pub const ALL: [CameraSlot; 4] = [Self::ORBIT, Self::FRONT, Self::TOP, Self::LEFT];

  pub fn new(index: usize) -> Result<Self>
  {
    if index < Self::ALL.len()
    {
      Ok(Self(index))
    }
    else
    {
      Err(SceneError::SlotOutOfRange(index))
    }
  }

  pub fn index(self) -> usize
  {
    self.0
  }

  pub fn is_orbit(self) -> bool
  {
    self == Self::ORBIT
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Projection
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection
{
  Perspective { fovy_degrees: f32, znear: f32, zfar: f32 },

  /// Half-width of the view volume in world units; depth spans ±20·scale.
  Orthographic { scale: f32 },
}

impl Projection
{
  pub fn matrix(&self, aspect: f32) -> Mat4
  {
    match *self
    {
      Projection::Perspective { fovy_degrees, znear, zfar } =>
      {
        Mat4::perspective_rh(fovy_degrees.to_radians(), aspect, znear, zfar)
      }

      Projection::Orthographic { scale } =>
      {
        let half_h = scale / aspect;
        Mat4::orthographic_rh(-scale, scale, -half_h, half_h, -20.0 * scale, 20.0 * scale)
      }
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Camera
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct Camera
{
  pub slot: CameraSlot,
  pub label: &'static str,
  pub node: NodeId,
  pub projection: Projection,

  /// Aspect of the viewport this camera last began on.
  pub aspect: f32,
}

impl Camera
{
  fn new(slot: CameraSlot, label: &'static str, node: NodeId, projection: Projection) -> Self
  {
    Self { slot, label, node, projection, aspect: 1.0 }
  }

  /// Orthographic cameras only; perspective cameras ignore it.
  pub fn set_scale(&mut self, new_scale: f32)
  {
    if let Projection::Orthographic { scale } = &mut self.projection
    {
      *scale = new_scale;
    }
  }

  pub fn view(&self, nodes: &NodeGraph) -> Result<Mat4>
  {
    Ok(nodes.global_matrix(self.node)?.inverse())
  }

  pub fn view_projection(&self, nodes: &NodeGraph) -> Result<Mat4>
  {
    Ok(self.projection.matrix(self.aspect) * self.view(nodes)?)
  }

  /// Start drawing through this camera into `viewport`.
  ///
  /// The returned scope carries everything a renderer needs for the pass.
  /// Finish it with [`CameraScope::end`].
  pub fn begin(&mut self, viewport: Rect, nodes: &NodeGraph) -> Result<CameraScope>
  {
    self.aspect = viewport.aspect();

    let view = self.view(nodes)?;
    let projection = self.projection.matrix(self.aspect);

    Ok(CameraScope { slot: self.slot, viewport, view, projection })
  }
}

/// An open camera pass. Consumed by `end`, so it cannot be closed twice.
#[must_use = "a camera scope must be ended to produce a viewport pass"]
#[derive(Clone, Debug)]
pub struct CameraScope
{
  pub slot: CameraSlot,
  pub viewport: Rect,
  pub view: Mat4,
  pub projection: Mat4,
}

impl CameraScope
{
  pub fn view_projection(&self) -> Mat4
  {
    self.projection * self.view
  }

  pub fn end(self, commands: Vec<DrawCommand>) -> ViewportPass
  {
    ViewportPass {
      slot: self.slot,
      viewport: self.viewport,
      view_proj: self.view_projection(),
      commands,
    }
  }
}

/// One camera rendering the scene into one rectangle.
#[derive(Clone, Debug)]
pub struct ViewportPass
{
  pub slot: CameraSlot,
  pub viewport: Rect,
  pub view_proj: Mat4,
  pub commands: Vec<DrawCommand>,
}

//
// ──────────────────────────────────────────────────────────────
//   Camera set
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct CameraSet
{
  cameras: [Camera; 4],
  orbit: OrbitCamera,

  /// Aspect the orbit frustum is previewed with in the fixed views.
  preview_aspect: f32,
}

impl CameraSet
{
  /// Create the four cameras as nodes in `nodes`; the orbit camera circles `target`.
  pub fn new(nodes: &mut NodeGraph, config: &DemoConfig, target: NodeId) -> Result<Self>
  {
    let orbit_node = nodes.add("camera.orbit");
    let orbit_cam = Camera::new(
      CameraSlot::ORBIT,
      "Orbit",
      orbit_node,
      Projection::Perspective {
        fovy_degrees: config.orbit.fov_degrees,
        znear: config.orbit.near,
        zfar: config.orbit.far,
      },
    );

    let scale = config.ortho_scale;
    let front = fixed_camera(nodes, FixedView::Front, CameraSlot::FRONT, scale)?;
    let top = fixed_camera(nodes, FixedView::Top, CameraSlot::TOP, scale)?;
    let left = fixed_camera(nodes, FixedView::Left, CameraSlot::LEFT, scale)?;

    let orbit = OrbitCamera::new(target, config.orbit.distance);
    orbit.apply(nodes, orbit_node)?;

    Ok(Self { cameras: [orbit_cam, front, top, left], orbit, preview_aspect: 1.0 })
  }

  pub fn camera(&self, slot: CameraSlot) -> &Camera
  {
    &self.cameras[slot.index()]
  }

  pub fn camera_mut(&mut self, slot: CameraSlot) -> &mut Camera
  {
    &mut self.cameras[slot.index()]
  }

  pub fn orbit(&self) -> &OrbitCamera
  {
    &self.orbit
  }

  pub fn orbit_mut(&mut self) -> &mut OrbitCamera
  {
    &mut self.orbit
  }

  pub fn view_projection(&self, slot: CameraSlot, nodes: &NodeGraph) -> Result<Mat4>
  {
    self.camera(slot).view_projection(nodes)
  }

  /// The viewport the user sees the orbit camera through this frame.
  pub fn set_preview_viewport(&mut self, viewport: Rect)
  {
    self.preview_aspect = viewport.aspect();
  }

  /// Orbit view-projection at the preview aspect, independent of which
  /// viewport the orbit camera last began on.
  pub fn preview_view_projection(&self, nodes: &NodeGraph) -> Result<Mat4>
  {
    let orbit = self.camera(CameraSlot::ORBIT);
    Ok(orbit.projection.matrix(self.preview_aspect) * orbit.view(nodes)?)
  }

  /// Push the orbit controller state into the orbit camera's node.
  pub fn sync(&self, nodes: &mut NodeGraph) -> Result<()>
  {
    self.orbit.apply(nodes, self.cameras[CameraSlot::ORBIT.index()].node)
  }

  pub fn set_fixed_scale(&mut self, scale: f32)
  {
    for cam in self.fixed_mut()
    {
      cam.set_scale(scale);
    }
  }

  /// Parent all three fixed cameras to `parent`, or none of them.
  pub fn attach_fixed(&self, nodes: &mut NodeGraph, parent: NodeId) -> Result<()>
  {
    for cam in self.fixed()
    {
      if let Err(err) = nodes.set_parent(cam.node, parent)
      {
        self.detach_fixed(nodes)?;
        return Err(err);
      }
    }

    debug!("fixed cameras attached to '{}'", nodes.node(parent)?.name);
    Ok(())
  }

  pub fn detach_fixed(&self, nodes: &mut NodeGraph) -> Result<()>
  {
    for cam in self.fixed()
    {
      nodes.clear_parent(cam.node)?;
    }

    debug!("fixed cameras detached");
    Ok(())
  }

  pub fn fixed_parents(&self, nodes: &NodeGraph) -> Result<[Option<NodeId>; 3]>
  {
    let mut parents = [None; 3];
    for (out, cam) in parents.iter_mut().zip(self.fixed())
    {
      *out = nodes.parent(cam.node)?;
    }
    Ok(parents)
  }

  fn fixed(&self) -> &[Camera]
  {
    &self.cameras[1..]
  }

  fn fixed_mut(&mut self) -> &mut [Camera]
  {
    &mut self.cameras[1..]
  }
}

fn fixed_camera(nodes: &mut NodeGraph, view: FixedView, slot: CameraSlot, scale: f32) -> Result<Camera>
{
  let node = nodes.add(&format!("camera.{}", view.label().to_lowercase()));
  view.orient(nodes, node)?;

  Ok(Camera::new(slot, view.label(), node, Projection::Orthographic { scale }))
}

#[cfg(test)]
mod tests
{
  use glam::{Vec3, Vec4Swizzles};

  use super::*;

  fn setup() -> (NodeGraph, CameraSet, NodeId)
  {
    let mut nodes = NodeGraph::new();
    let target = nodes.add("swarm");
    let cameras = CameraSet::new(&mut nodes, &DemoConfig::default(), target).unwrap();
    (nodes, cameras, target)
  }

  #[test]
  fn slot_range_is_checked()
  {
    assert_eq!(CameraSlot::new(3).unwrap(), CameraSlot::LEFT);
    assert_eq!(CameraSlot::new(4), Err(SceneError::SlotOutOfRange(4)));
  }

  #[test]
  fn labels_follow_slots()
  {
    let (_, cameras, _) = setup();
    let labels: Vec<_> = CameraSlot::ALL.iter().map(|s| cameras.camera(*s).label).collect();

    assert_eq!(labels, ["Orbit", "Front", "Top", "Left"]);
  }

  #[test]
  fn begin_records_viewport_aspect()
  {
    let (nodes, mut cameras, _) = setup();
    let viewport = Rect::new(300, 0, 600, 300);

    let scope = cameras.camera_mut(CameraSlot::FRONT).begin(viewport, &nodes).unwrap();
    let pass = scope.end(Vec::new());

    assert_eq!(cameras.camera(CameraSlot::FRONT).aspect, 2.0);
    assert_eq!(pass.viewport, viewport);
    assert_eq!(pass.slot, CameraSlot::FRONT);
    assert_eq!(pass.view_proj, cameras.view_projection(CameraSlot::FRONT, &nodes).unwrap());
  }

  #[test]
  fn ortho_front_maps_scale_to_clip_edge()
  {
    let (nodes, mut cameras, _) = setup();
    let scale = DemoConfig::default().ortho_scale;

    let scope = cameras.camera_mut(CameraSlot::FRONT).begin(Rect::new(0, 0, 100, 100), &nodes).unwrap();
    let clip = scope.view_projection() * Vec3::new(scale, scale, 0.0).extend(1.0);

    assert!((clip.xy() - glam::Vec2::ONE).length() < 1e-4);
  }

  #[test]
  fn preview_ignores_last_begin()
  {
    let (nodes, mut cameras, _) = setup();
    cameras.set_preview_viewport(Rect::new(300, 0, 600, 800));

    let _ = cameras.camera_mut(CameraSlot::ORBIT).begin(Rect::new(0, 0, 300, 200), &nodes).unwrap();

    let orbit = cameras.camera(CameraSlot::ORBIT);
    let expected = orbit.projection.matrix(0.75) * orbit.view(&nodes).unwrap();
    assert_eq!(orbit.aspect, 1.5);
    assert_eq!(cameras.preview_view_projection(&nodes).unwrap(), expected);
  }

  #[test]
  fn set_fixed_scale_leaves_orbit_alone()
  {
    let (_, mut cameras, _) = setup();
    cameras.set_fixed_scale(5.0);

    assert_eq!(cameras.camera(CameraSlot::TOP).projection, Projection::Orthographic { scale: 5.0 });
    assert!(matches!(cameras.camera(CameraSlot::ORBIT).projection, Projection::Perspective { .. }));
  }

  #[test]
  fn attach_and_detach_are_all_or_nothing()
  {
    let (mut nodes, cameras, target) = setup();

    cameras.attach_fixed(&mut nodes, target).unwrap();
    assert_eq!(cameras.fixed_parents(&nodes).unwrap(), [Some(target); 3]);

    cameras.detach_fixed(&mut nodes).unwrap();
    assert_eq!(cameras.fixed_parents(&nodes).unwrap(), [None; 3]);
  }

  #[test]
  fn camera_nodes_are_named_after_their_view()
  {
    let (nodes, cameras, _) = setup();
    let names: Vec<_> =
      CameraSlot::ALL.iter().map(|s| nodes.node(cameras.camera(*s).node).unwrap().name.clone()).collect();

    assert_eq!(names, ["camera.orbit", "camera.front", "camera.top", "camera.left"]);
  }

  #[test]
  fn failed_attach_leaves_everything_detached()
  {
    let (mut nodes, cameras, _) = setup();
    let top_node = cameras.camera(CameraSlot::TOP).node;

    // parenting the top camera to itself is a cycle
    let err = cameras.attach_fixed(&mut nodes, top_node).unwrap_err();

    assert!(matches!(err, SceneError::ParentCycle { .. }));
    assert_eq!(cameras.fixed_parents(&nodes).unwrap(), [None; 3]);
  }

  #[test]
  fn parented_camera_moves_with_parent()
  {
    let (mut nodes, cameras, target) = setup();
    let front = cameras.camera(CameraSlot::FRONT);

    cameras.attach_fixed(&mut nodes, target).unwrap();
    nodes.set_position(target, Vec3::new(7.0, 0.0, 0.0)).unwrap();

    let pos = nodes.global_position(front.node).unwrap();
    assert!((pos - Vec3::new(7.0, 0.0, 0.0)).length() < 1e-5);
  }
}
