use quadview_core::{
  compose_frame, AppState, CameraSet, CameraSlot, DemoConfig, DrawCommand, HostRequest, InputDispatcher,
  NodeGraph, Swarm, ViewportLayout,
};

struct Demo
{
  nodes: NodeGraph,
  swarm: Swarm,
  cameras: CameraSet,
  dispatcher: InputDispatcher,
  state: AppState,
  layout: ViewportLayout,
}

impl Demo
{
  fn new(width: u32, height: u32) -> Self
  {
    let config = DemoConfig::default();
    let mut nodes = NodeGraph::new();
    let swarm = Swarm::new(&mut nodes, &config.swarm).unwrap();
    let cameras = CameraSet::new(&mut nodes, &config, swarm.node).unwrap();
    let dispatcher = InputDispatcher::new(swarm.light);

    Self {
      nodes,
      swarm,
      cameras,
      dispatcher,
      state: AppState::default(),
      layout: ViewportLayout::recompute(width, height),
    }
  }

  fn press(&mut self, key: char) -> Option<HostRequest>
  {
    self.dispatcher.key_pressed(key, &mut self.state, &self.cameras, &mut self.nodes).unwrap()
  }

  fn step(&mut self, dt: f32, elapsed: f32)
  {
    self.swarm.update(&mut self.nodes, dt, elapsed).unwrap();
  }

  fn frame(&mut self) -> quadview_core::Frame
  {
    compose_frame(&self.state, &self.layout, &mut self.cameras, &mut self.nodes, &self.swarm).unwrap()
  }
}

#[test]
fn starts_on_front_camera_unparented()
{
  let mut demo = Demo::new(900, 800);
  let frame = demo.frame();

  assert_eq!(frame.passes[0].slot, CameraSlot::FRONT);
  assert!(!demo.state.parented);
  assert_eq!(demo.cameras.fixed_parents(&demo.nodes).unwrap(), [None; 3]);
}

#[test]
fn selecting_orbit_removes_frustum_from_main_view()
{
  let mut demo = Demo::new(900, 800);

  demo.press('1');
  let frame = demo.frame();

  assert_eq!(frame.passes[0].commands, vec![DrawCommand::Swarm, DrawCommand::Grid]);
  assert_eq!(frame.passes[0].viewport, demo.layout.main);
}

#[test]
fn parented_fixed_cameras_follow_the_light()
{
  let mut demo = Demo::new(900, 800);
  demo.press('p');

  demo.step(0.0, 0.0);
  let before = demo.frame().passes[2].view_proj; // front camera, grid cell 1

  demo.step(0.0, 2.0);
  let after = demo.frame().passes[2].view_proj;

  assert_ne!(before, after);

  // unparented, the light no longer moves them
  demo.press('p');
  let still_a = demo.frame().passes[2].view_proj;
  demo.step(0.0, 4.0);
  let still_b = demo.frame().passes[2].view_proj;

  assert_eq!(still_a, still_b);
}

#[test]
fn resize_then_frame_uses_new_layout()
{
  let mut demo = Demo::new(900, 800);
  demo.layout = demo.dispatcher.window_resized(1500, 1000);

  let frame = demo.frame();

  assert_eq!(frame.passes[0].viewport, demo.layout.main);
  assert_eq!(frame.passes[0].viewport.x, 500);
  assert_eq!(frame.overlay.outlines.last(), Some(&demo.layout.main));
}

#[test]
fn orbit_interaction_moves_the_previewed_frustum()
{
  let mut demo = Demo::new(900, 800);

  let wire_of = |frame: &quadview_core::Frame| {
    frame.passes[2]
      .commands
      .iter()
      .find_map(|c| match c
      {
        DrawCommand::Frustum(w) => Some(*w),
        _ => None,
      })
      .unwrap()
  };

  let before = wire_of(&demo.frame());
  demo.cameras.orbit_mut().orbit(0.5, 0.2);
  let after = wire_of(&demo.frame());

  assert_ne!(before, after);
}

#[test]
fn fullscreen_is_delegated()
{
  let mut demo = Demo::new(640, 480);
  assert_eq!(demo.press('f'), Some(HostRequest::ToggleFullscreen));
}
