use crate::camera::{CameraSet, CameraSlot, ViewportPass};
use crate::error::Result;
use crate::layout::{Rect, ViewportLayout};
use crate::node::NodeGraph;
use crate::scene::{draw_scene, project_to_viewport};
use crate::state::AppState;
use crate::swarm::Swarm;

//
// ──────────────────────────────────────────────────────────────
//   One frame
//
//   passes[0]    → selected camera into the main view
//   passes[1..5] → cameras 0..3 into grid cells 0..3
//   overlay      → screen space, drawn after every pass
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct Frame
{
  pub passes: Vec<ViewportPass>,
  pub overlay: Overlay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayLabel
{
  pub text: String,
  pub x: f32,
  pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Overlay
{
  /// Grid cell of the camera currently in the main view.
  pub highlight: Rect,

  /// Four grid cells, then the main view.
  pub outlines: Vec<Rect>,

  pub labels: Vec<OverlayLabel>,
}

const HELP_LINES: [&str; 4] = [
  "Press keys 1-4 to select a camera for main view",
  "", // filled in with the current selection
  "Press 'f' to toggle fullscreen",
  "Press 'p' to toggle parents on OrthoCamera's",
];

/// Sync the cameras and build every pass and overlay for this frame.
pub fn compose_frame(
  state: &AppState,
  layout: &ViewportLayout,
  cameras: &mut CameraSet,
  nodes: &mut NodeGraph,
  swarm: &Swarm,
) -> Result<Frame>
{
  cameras.sync(nodes)?;

  // the frustum preview matches wherever the orbit camera is on screen
  let preview = if state.selected.is_orbit() { layout.main } else { layout.grid[CameraSlot::ORBIT.index()] };
  cameras.set_preview_viewport(preview);

  let mut passes = Vec::with_capacity(1 + layout.grid.len());
  passes.push(camera_pass(state.selected, layout.main, cameras, nodes)?);

  for (slot, rect) in CameraSlot::ALL.into_iter().zip(layout.grid)
  {
    passes.push(camera_pass(slot, rect, cameras, nodes)?);
  }

  let overlay = build_overlay(state, layout, cameras, &passes, swarm, nodes)?;

  Ok(Frame { passes, overlay })
}

fn camera_pass(slot: CameraSlot, viewport: Rect, cameras: &mut CameraSet, nodes: &NodeGraph) -> Result<ViewportPass>
{
  let scope = cameras.camera_mut(slot).begin(viewport, nodes)?;
  let commands = draw_scene(slot, cameras, nodes)?;
  Ok(scope.end(commands))
}

//
// ──────────────────────────────────────────────────────────────
//   Overlay
// ──────────────────────────────────────────────────────────────
//

fn build_overlay(
  state: &AppState,
  layout: &ViewportLayout,
  cameras: &CameraSet,
  passes: &[ViewportPass],
  swarm: &Swarm,
  nodes: &NodeGraph,
) -> Result<Overlay>
{
  let mut labels = Vec::new();
  let main_x = layout.main.x as f32 + 20.0;

  for (i, line) in HELP_LINES.iter().enumerate()
  {
    let text = match i
    {
      1 => format!("Camera selected: {}", state.selected.index() + 1),
      _ => line.to_string(),
    };
    labels.push(OverlayLabel { text, x: main_x, y: 30.0 + 20.0 * i as f32 });
  }

  for (slot, rect) in CameraSlot::ALL.into_iter().zip(layout.grid)
  {
    labels.push(OverlayLabel {
      text: cameras.camera(slot).label.to_string(),
      x: rect.x as f32 + 20.0,
      y: rect.y as f32 + 30.0,
    });
  }

  // light marker label, in every view that can see it
  let light = swarm.light_position(nodes)?;
  for pass in passes
  {
    if let Some(p) = project_to_viewport(pass.view_proj, pass.viewport, light)
    {
      if pass.viewport.contains(p.x, p.y)
      {
        labels.push(OverlayLabel { text: " light".to_string(), x: p.x, y: p.y });
      }
    }
  }

  let mut outlines = layout.grid.to_vec();
  outlines.push(layout.main);

  Ok(Overlay { highlight: layout.grid[state.selected.index()], outlines, labels })
}
