mod core;
mod depth;
mod gui;
mod lines;
mod particles;
mod uniform;

pub use self::core::Renderer;
pub use particles::ParticleInstance;
