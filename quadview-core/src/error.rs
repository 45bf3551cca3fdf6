use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug, PartialEq)]
pub enum SceneError
{
  #[error("unknown node {0:?}")]
  UnknownNode(NodeId),

  #[error("attaching {child:?} to {parent:?} would create a cycle")]
  ParentCycle { child: NodeId, parent: NodeId },

  #[error("camera slot {0} is out of range (0..=3)")]
  SlotOutOfRange(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError
{
  #[error("cannot read config {}: {source}", path.display())]
  Io { path: PathBuf, #[source] source: std::io::Error },

  #[error("cannot parse config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
