use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{error, info};
use quadview_core::{
  compose_frame, AppState, CameraSet, CameraSlot, DemoConfig, HostRequest, InputDispatcher, NodeGraph, Swarm,
  ViewportLayout,
};
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::{ElementState, KeyEvent, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::{Fullscreen, Window, WindowId},
};

use crate::input::camera_control::apply_input_to_orbit;
use crate::input::InputState;
use crate::renderer::{ParticleInstance, Renderer};

const PARTICLE_SIZE: f32 = 1.0;
const LIGHT_SIZE: f32 = 2.0;
const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Long stalls (window drag, breakpoint) should not fling the swarm apart
const MAX_FRAME_DT: f32 = 0.1;

pub fn run(config: DemoConfig) -> anyhow::Result<()>
{
  let event_loop = EventLoop::new().context("creating event loop")?;
  let mut app = QuadviewApp::new(config)?;

  event_loop.run_app(&mut app).context("running event loop")?;

  match app.fatal.take()
  {
    Some(err) => Err(err),
    None => Ok(()),
  }
}

struct QuadviewApp
{
  config: DemoConfig,
  window: Option<Arc<Window>>,
  renderer: Option<Renderer>,
  input: InputState,

  nodes: NodeGraph,
  swarm: Swarm,
  cameras: CameraSet,
  dispatcher: InputDispatcher,
  state: AppState,
  layout: ViewportLayout,

  started: Instant,
  last_frame: Instant,
  fatal: Option<anyhow::Error>,
}

impl QuadviewApp
{
  fn new(config: DemoConfig) -> anyhow::Result<Self>
  {
    let mut nodes = NodeGraph::new();
    let swarm = Swarm::new(&mut nodes, &config.swarm).context("creating swarm")?;
    let cameras = CameraSet::new(&mut nodes, &config, swarm.node).context("creating cameras")?;
    let dispatcher = InputDispatcher::new(swarm.light);

    let now = Instant::now();

    Ok(Self {
      config,
      window: None,
      renderer: None,
      input: InputState::new(),
      nodes,
      swarm,
      cameras,
      dispatcher,
      state: AppState::default(),
      layout: ViewportLayout::default(),
      started: now,
      last_frame: now,
      fatal: None,
    })
  }

  fn init_window_and_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()>
  {
    if self.window.is_some()
    {
      return Ok(());
    }

    let win = &self.config.window;
    let attrs = Window::default_attributes()
      .with_title(win.title.clone())
      .with_inner_size(LogicalSize::new(win.width, win.height));
    let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

    let size = window.inner_size();
    self.layout = self.dispatcher.window_resized(size.width, size.height);
    info!("window {}x{}", size.width, size.height);

    // +1 for the light marker
    let capacity = self.swarm.particles().len() + 1;
    let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.background, capacity))?;

    self.window = Some(window);
    self.renderer = Some(renderer);
    Ok(())
  }

  fn handle_window_event(&mut self, elwt: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    let window = match &self.window
    {
      Some(w) if w.id() == window_id => w.clone(),
      _ => return,
    };

    let gui_consumed = match &mut self.renderer
    {
      Some(renderer) => renderer.handle_gui_event(&window, &event),
      None => false,
    };

    // pointer state only steers the orbit camera when egui did not take it
    if !gui_consumed
    {
      self.input.handle_event(&event);
    }

    match event
    {
      WindowEvent::CloseRequested =>
      {
        elwt.exit();
      }

      WindowEvent::Resized(size) =>
      {
        if let Some(renderer) = &mut self.renderer
        {
          renderer.resize(size.width, size.height);
        }

        self.layout = self.dispatcher.window_resized(size.width, size.height);
        window.request_redraw();
      }

      WindowEvent::KeyboardInput { event, .. } =>
      {
        self.handle_key(&window, &event);
      }

      WindowEvent::RedrawRequested =>
      {
        self.frame(elwt);
      }

      _ =>
      {}
    }
  }

  fn handle_key(&mut self, window: &Window, event: &KeyEvent)
  {
    let Key::Character(text) = &event.logical_key else { return };
    let Some(key) = text.chars().next() else { return };

    if event.state == ElementState::Released
    {
      self.dispatcher.key_released(key);
      return;
    }

    if event.repeat
    {
      return;
    }

    match self.dispatcher.key_pressed(key, &mut self.state, &self.cameras, &mut self.nodes)
    {
      Ok(Some(HostRequest::ToggleFullscreen)) => toggle_fullscreen(window),
      Ok(None) =>
      {}
      Err(err) => error!("key '{key}' failed: {err}"),
    }
  }

  /// Viewports currently showing the orbit camera; pointer input only steers it there.
  fn orbit_has_cursor(&self) -> bool
  {
    let in_main = self.state.selected == CameraSlot::ORBIT && self.input.cursor_in(self.layout.main);
    in_main || self.input.cursor_in(self.layout.grid[CameraSlot::ORBIT.index()])
  }

  fn update(&mut self) -> anyhow::Result<()>
  {
    let now = Instant::now();
    let dt = now.duration_since(self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
    let elapsed = now.duration_since(self.started).as_secs_f32();
    self.last_frame = now;

    self.swarm.update(&mut self.nodes, dt, elapsed)?;

    if self.orbit_has_cursor()
    {
      apply_input_to_orbit(&self.input, self.cameras.orbit_mut());
    }

    Ok(())
  }

  fn particle_instances(&self) -> anyhow::Result<(Vec<ParticleInstance>, glam::Vec3)>
  {
    let positions = self.swarm.world_positions(&self.nodes)?;
    let light = self.swarm.light_position(&self.nodes)?;

    let mut instances: Vec<_> = positions
      .into_iter()
      .zip(self.swarm.particles())
      .map(|(pos, p)| ParticleInstance::lit(pos, PARTICLE_SIZE, p.color))
      .collect();
    instances.push(ParticleInstance::flat(light, LIGHT_SIZE, LIGHT_COLOR));

    Ok((instances, light))
  }

  fn draw(&mut self) -> anyhow::Result<()>
  {
    let frame = compose_frame(&self.state, &self.layout, &mut self.cameras, &mut self.nodes, &self.swarm)?;
    let (instances, light) = self.particle_instances()?;

    if let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer)
    {
      renderer.render(window, &frame, &instances, light)?;
    }

    Ok(())
  }

  fn frame(&mut self, elwt: &ActiveEventLoop)
  {
    let result = self.update().and_then(|()| self.draw());
    self.input.end_frame();

    if let Err(err) = result
    {
      error!("frame failed: {err:#}");
      self.fatal = Some(err);
      elwt.exit();
    }
  }
}

fn toggle_fullscreen(window: &Window)
{
  let next = match window.fullscreen()
  {
    Some(_) => None,
    None => Some(Fullscreen::Borderless(None)),
  };

  window.set_fullscreen(next);
}

impl ApplicationHandler for QuadviewApp
{
  fn resumed(&mut self, event_loop: &ActiveEventLoop)
  {
    event_loop.set_control_flow(ControlFlow::Wait);

    if let Err(err) = self.init_window_and_renderer(event_loop)
    {
      error!("setup failed: {err:#}");
      self.fatal = Some(err);
      event_loop.exit();
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    self.handle_window_event(event_loop, window_id, event);
  }

  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop)
  {
    if let Some(window) = &self.window
    {
      window.request_redraw();
    }
  }
}
