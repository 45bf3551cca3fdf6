use quadview_core::camera::OrbitCamera;

use crate::input::InputState;

//
// ──────────────────────────────────────────────────────────────
//   Orbit camera pointer control
//
//   left drag   → orbit around the swarm
//   middle drag → pan the look-at point
//   wheel       → multiplicative zoom
// ──────────────────────────────────────────────────────────────
//

const ORBIT_SENSITIVITY: f32 = 0.005; // radians per pixel
const PAN_SENSITIVITY: f32 = 0.002; // world units per pixel, scaled by radius
const ZOOM_FACTOR: f32 = 0.1; // 10% radius change per scroll line

enum Drag
{
  Orbit,
  Pan,
}

pub fn apply_input_to_orbit(input: &InputState, orbit: &mut OrbitCamera)
{
  if let Some(drag) = active_drag(input)
  {
    let (dx, dy) = (input.mouse_dx, input.mouse_dy);

    match drag
    {
      Drag::Orbit => orbit.orbit(-dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY),

      Drag::Pan =>
      {
        let scale = orbit.radius * PAN_SENSITIVITY;
        orbit.pan(-dx * scale, dy * scale);
      }
    }
  }

  // Scroll up (positive) zooms in
  if input.scroll != 0.0
  {
    orbit.zoom(1.0 - input.scroll * ZOOM_FACTOR);
  }
}

fn active_drag(input: &InputState) -> Option<Drag>
{
  if input.mouse_dx == 0.0 && input.mouse_dy == 0.0
  {
    return None;
  }

  if input.left_held
  {
    Some(Drag::Orbit)
  }
  else if input.middle_held
  {
    Some(Drag::Pan)
  }
  else
  {
    None
  }
}
