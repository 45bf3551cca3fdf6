use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

//
// ──────────────────────────────────────────────────────────────
//   Demo configuration
//
//   Every field has a default, so an empty JSON object is a
//   valid config. Unknown fields are rejected to catch typos.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig
{
  pub window: WindowConfig,
  pub background: [f32; 3],
  pub swarm: SwarmConfig,
  pub ortho_scale: f32,
  pub orbit: OrbitConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig
{
  pub title: String,
  pub width: u32,
  pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwarmConfig
{
  pub particles: usize,
  pub position_dispersion: f32,
  pub velocity_dispersion: f32,
  pub seed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbitConfig
{
  pub distance: f32,
  pub fov_degrees: f32,
  pub near: f32,
  pub far: f32,
}

impl Default for DemoConfig
{
  fn default() -> Self
  {
    Self {
      window: WindowConfig::default(),
      background: [70.0 / 255.0, 70.0 / 255.0, 70.0 / 255.0],
      swarm: SwarmConfig::default(),
      ortho_scale: 20.0,
      orbit: OrbitConfig::default(),
    }
  }
}

impl Default for WindowConfig
{
  fn default() -> Self
  {
    Self { title: "Quadview - 4 cameras, 1 scene".to_string(), width: 1024, height: 768 }
  }
}

impl Default for SwarmConfig
{
  fn default() -> Self
  {
    Self { particles: 100, position_dispersion: 50.0, velocity_dispersion: 20.0, seed: 0x5eed }
  }
}

impl Default for OrbitConfig
{
  fn default() -> Self
  {
    Self { distance: 80.0, fov_degrees: 60.0, near: 1.0, far: 300.0 }
  }
}

impl DemoConfig
{
  pub fn from_json(text: &str) -> Result<Self, ConfigError>
  {
    let config: Self = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError>
  {
    let text = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    Self::from_json(&text)
  }

  pub fn validate(&self) -> Result<(), ConfigError>
  {
    if self.swarm.particles == 0
    {
      return Err(invalid("swarm.particles must be at least 1"));
    }

    if !(self.ortho_scale > 0.0)
    {
      return Err(invalid("ortho_scale must be positive"));
    }

    let orbit = &self.orbit;

    if !(orbit.near > 0.0 && orbit.near < orbit.far)
    {
      return Err(invalid("orbit.near must be positive and below orbit.far"));
    }

    if !(orbit.fov_degrees > 0.0 && orbit.fov_degrees < 180.0)
    {
      return Err(invalid("orbit.fov_degrees must be in (0, 180)"));
    }

    if !(orbit.distance > 0.0)
    {
      return Err(invalid("orbit.distance must be positive"));
    }

    Ok(())
  }
}

fn invalid(msg: &str) -> ConfigError
{
  ConfigError::Invalid(msg.to_string())
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn empty_object_gives_defaults()
  {
    assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
  }

  #[test]
  fn partial_override_keeps_other_defaults()
  {
    let config = DemoConfig::from_json(r#"{ "swarm": { "particles": 7 }, "ortho_scale": 5.0 }"#).unwrap();

    assert_eq!(config.swarm.particles, 7);
    assert_eq!(config.swarm.position_dispersion, 50.0);
    assert_eq!(config.ortho_scale, 5.0);
  }

  #[test]
  fn unknown_fields_are_rejected()
  {
    let err = DemoConfig::from_json(r#"{ "ortho_scael": 5.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }

  #[test]
  fn invalid_values_are_rejected()
  {
    for text in [
      r#"{ "swarm": { "particles": 0 } }"#,
      r#"{ "ortho_scale": 0.0 }"#,
      r#"{ "orbit": { "near": 10.0, "far": 5.0 } }"#,
      r#"{ "orbit": { "fov_degrees": 180.0 } }"#,
    ]
    {
      let err = DemoConfig::from_json(text).unwrap_err();
      assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
    }
  }

  #[test]
  fn missing_file_reports_path()
  {
    let err = DemoConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
  }
}
