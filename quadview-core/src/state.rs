use crate::camera::CameraSlot;

/// Selection and parenting state, owned by the app and mutated only by
/// the input dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppState
{
  /// Camera rendered into the main viewport.
  pub selected: CameraSlot,

  /// Whether the fixed cameras are parented to the swarm's light.
  pub parented: bool,
}

impl Default for AppState
{
  fn default() -> Self
  {
    Self { selected: CameraSlot::FRONT, parented: false }
  }
}
