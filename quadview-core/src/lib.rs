//! Windowless logic for the quadview demo.
//!
//! Four cameras (one orbit, three fixed orthographic) render one shared scene
//! into a tiled layout: a large main view on the right and four small views
//! stacked on the left. Everything here is plain data and math so a whole
//! frame can be composed and checked without a window or a GPU.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod input;
pub mod layout;
pub mod node;
pub mod scene;
pub mod state;
pub mod swarm;

pub use camera::{Camera, CameraScope, CameraSet, CameraSlot, Projection, ViewportPass};
pub use config::DemoConfig;
pub use error::{ConfigError, Result, SceneError};
pub use frame::{compose_frame, Frame, Overlay, OverlayLabel};
pub use input::{HostRequest, InputDispatcher};
pub use layout::{Rect, ViewportLayout};
pub use node::{NodeGraph, NodeId};
pub use scene::{draw_scene, project_to_viewport, DrawCommand, FrustumWire};
pub use state::AppState;
pub use swarm::{Particle, Swarm};
