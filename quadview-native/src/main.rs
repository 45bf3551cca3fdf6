mod app;
mod input;
mod renderer;

use std::path::PathBuf;

use anyhow::Context;
use log::info;
use quadview_core::DemoConfig;

const CONFIG_ENV: &str = "QUADVIEW_CONFIG";

fn main() -> anyhow::Result<()>
{
  // RUST_LOG overrides the default; wgpu_hal is very chatty at info.
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,wgpu_hal=off,naga=warn"))
    .init();

  let config = load_config()?;
  app::run(config)
}

fn load_config() -> anyhow::Result<DemoConfig>
{
  match std::env::var_os(CONFIG_ENV)
  {
    Some(path) =>
    {
      let path = PathBuf::from(path);
      let config = DemoConfig::load(&path).with_context(|| format!("loading {CONFIG_ENV}={}", path.display()))?;
      info!("config loaded from {}", path.display());
      Ok(config)
    }

    None =>
    {
      info!("no {CONFIG_ENV} set, using built-in defaults");
      Ok(DemoConfig::default())
    }
  }
}
