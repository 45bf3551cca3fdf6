use log::debug;

use crate::camera::{CameraSet, CameraSlot};
use crate::error::Result;
use crate::layout::ViewportLayout;
use crate::node::{NodeGraph, NodeId};
use crate::state::AppState;

//
// ──────────────────────────────────────────────────────────────
//   Input dispatcher
//
//   '1'..'4' → camera for the main view
//   'f'      → fullscreen (handed back to the host)
//   'p'      → parent / unparent all fixed cameras to the light
//   resize   → fresh viewport layout
// ──────────────────────────────────────────────────────────────
//

/// Requests the dispatcher cannot fulfil itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest
{
  ToggleFullscreen,
}

#[derive(Clone, Copy, Debug)]
pub struct InputDispatcher
{
  /// Node the fixed cameras attach to when parenting is switched on.
  parent_target: NodeId,
}

impl InputDispatcher
{
  pub fn new(parent_target: NodeId) -> Self
  {
    Self { parent_target }
  }

  pub fn key_pressed(
    &self,
    key: char,
    state: &mut AppState,
    cameras: &CameraSet,
    nodes: &mut NodeGraph,
  ) -> Result<Option<HostRequest>>
  {
    match key
    {
      '1'..='4' =>
      {
        state.selected = CameraSlot::new(key as usize - '1' as usize)?;
        debug!("main view → camera {}", state.selected.index() + 1);
        Ok(None)
      }

      'f' => Ok(Some(HostRequest::ToggleFullscreen)),

      'p' =>
      {
        self.toggle_parenting(state, cameras, nodes)?;
        Ok(None)
      }

      _ => Ok(None),
    }
  }

  pub fn key_released(&self, _key: char) {}

  pub fn window_resized(&self, width: u32, height: u32) -> ViewportLayout
  {
    debug!("window resized to {width}x{height}");
    ViewportLayout::recompute(width, height)
  }

  fn toggle_parenting(&self, state: &mut AppState, cameras: &CameraSet, nodes: &mut NodeGraph) -> Result<()>
  {
    if state.parented
    {
      cameras.detach_fixed(nodes)?;
      state.parented = false;
    }
    else
    {
      cameras.attach_fixed(nodes, self.parent_target)?;
      state.parented = true;
    }

    debug!("fixed camera parenting: {}", state.parented);
    Ok(())
  }
}

#[cfg(test)]
mod tests
{
  use super::*;
  use crate::config::DemoConfig;

  struct Rig
  {
    nodes: NodeGraph,
    cameras: CameraSet,
    light: NodeId,
    state: AppState,
    dispatcher: InputDispatcher,
  }

  impl Rig
  {
    fn new() -> Self
    {
      let mut nodes = NodeGraph::new();
      let swarm = nodes.add("swarm");
      let light = nodes.add("light");
      nodes.set_parent(light, swarm).unwrap();
      let cameras = CameraSet::new(&mut nodes, &DemoConfig::default(), swarm).unwrap();

      Self { nodes, cameras, light, state: AppState::default(), dispatcher: InputDispatcher::new(light) }
    }

    fn press(&mut self, key: char) -> Option<HostRequest>
    {
      self.dispatcher.key_pressed(key, &mut self.state, &self.cameras, &mut self.nodes).unwrap()
    }
  }

  #[test]
  fn digit_keys_select_cameras()
  {
    let mut rig = Rig::new();

    for (key, slot) in ['1', '2', '3', '4'].into_iter().zip(CameraSlot::ALL)
    {
      rig.press(key);
      assert_eq!(rig.state.selected, slot);
    }
  }

  #[test]
  fn other_keys_leave_selection_alone()
  {
    let mut rig = Rig::new();
    rig.press('3');

    for key in ['0', '5', '9', 'a', 'F', 'P', ' ', '\n', 'é']
    {
      assert_eq!(rig.press(key), None);
      assert_eq!(rig.state.selected, CameraSlot::TOP);
    }
  }

  #[test]
  fn three_nine_one_leaves_orbit_selected()
  {
    let mut rig = Rig::new();

    rig.press('3');
    rig.press('9');
    rig.press('1');

    assert_eq!(rig.state.selected, CameraSlot::ORBIT);
  }

  #[test]
  fn f_requests_fullscreen_without_touching_state()
  {
    let mut rig = Rig::new();
    let before = rig.state;

    assert_eq!(rig.press('f'), Some(HostRequest::ToggleFullscreen));
    assert_eq!(rig.state, before);
  }

  #[test]
  fn p_toggles_parenting_for_all_fixed_cameras()
  {
    let mut rig = Rig::new();

    rig.press('p');
    assert!(rig.state.parented);
    assert_eq!(rig.cameras.fixed_parents(&rig.nodes).unwrap(), [Some(rig.light); 3]);

    rig.press('p');
    assert!(!rig.state.parented);
    assert_eq!(rig.cameras.fixed_parents(&rig.nodes).unwrap(), [None; 3]);
  }

  #[test]
  fn p_does_not_change_selection()
  {
    let mut rig = Rig::new();
    rig.press('4');
    rig.press('p');

    assert_eq!(rig.state.selected, CameraSlot::LEFT);
  }

  #[test]
  fn resize_recomputes_layout()
  {
    let rig = Rig::new();
    assert_eq!(rig.dispatcher.window_resized(900, 800), ViewportLayout::recompute(900, 800));
  }
}
