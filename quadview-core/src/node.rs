use glam::{Mat4, Quat, Vec3};

use crate::error::{Result, SceneError};

//
// ──────────────────────────────────────────────────────────────
//   Node table
//
//   Every transform in the scene (swarm, light, cameras) is a
//   node addressed by a `NodeId`. A node may name one parent by
//   handle; its global transform is parent_global * local.
//   Nodes never own each other.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId
{
  pub fn index(self) -> usize
  {
    self.0
  }
}

#[derive(Clone, Debug)]
pub struct Node
{
  pub name: String,
  pub translation: Vec3,
  pub rotation: Quat,
  pub scale: f32,
  parent: Option<NodeId>,
}

impl Node
{
  fn new(name: &str) -> Self
  {
    Self {
      name: name.to_string(),
      translation: Vec3::ZERO,
      rotation: Quat::IDENTITY,
      scale: 1.0,
      parent: None,
    }
  }

  pub fn parent(&self) -> Option<NodeId>
  {
    self.parent
  }

  pub fn local_matrix(&self) -> Mat4
  {
    Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
  }
}

#[derive(Clone, Debug, Default)]
pub struct NodeGraph
{
  nodes: Vec<Node>,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl NodeGraph
{
  pub fn new() -> Self
  {
    Self::default()
  }

  pub fn add(&mut self, name: &str) -> NodeId
  {
    self.nodes.push(Node::new(name));
    NodeId(self.nodes.len() - 1)
  }

  pub fn node(&self, id: NodeId) -> Result<&Node>
  {
    self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
  }

  pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node>
  {
    self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))
  }

  pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>>
  {
    Ok(self.node(id)?.parent)
  }

  /// Make `child`'s local transform relative to `parent`.
  ///
  /// The local transform is kept as-is, so the node jumps to wherever
  /// the parent puts it. Rejects self-parenting and cycles.
  pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<()>
  {
    self.node(parent)?;
    self.node(child)?;

    if self.is_ancestor_or_self(child, parent)?
    {
      return Err(SceneError::ParentCycle { child, parent });
    }

    self.node_mut(child)?.parent = Some(parent);
    Ok(())
  }

  pub fn clear_parent(&mut self, child: NodeId) -> Result<()>
  {
    self.node_mut(child)?.parent = None;
    Ok(())
  }

  pub fn global_matrix(&self, id: NodeId) -> Result<Mat4>
  {
    let node = self.node(id)?;
    let mut matrix = node.local_matrix();
    let mut next = node.parent;

    // set_parent keeps the table acyclic, so this walk terminates
    while let Some(parent_id) = next
    {
      let parent = self.node(parent_id)?;
      matrix = parent.local_matrix() * matrix;
      next = parent.parent;
    }

    Ok(matrix)
  }

  pub fn global_position(&self, id: NodeId) -> Result<Vec3>
  {
    Ok(self.global_matrix(id)?.w_axis.truncate())
  }

  pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<()>
  {
    self.node_mut(id)?.translation = position;
    Ok(())
  }

  /// Rotate around the node's local X axis.
  pub fn tilt(&mut self, id: NodeId, degrees: f32) -> Result<()>
  {
    let node = self.node_mut(id)?;
    node.rotation = (node.rotation * Quat::from_rotation_x(degrees.to_radians())).normalize();
    Ok(())
  }

  /// Rotate around the node's local Y axis.
  pub fn pan(&mut self, id: NodeId, degrees: f32) -> Result<()>
  {
    let node = self.node_mut(id)?;
    node.rotation = (node.rotation * Quat::from_rotation_y(degrees.to_radians())).normalize();
    Ok(())
  }

  /// Place the node at `eye` with its -Z axis facing `target`.
  pub fn look_at(&mut self, id: NodeId, eye: Vec3, target: Vec3, up: Vec3) -> Result<()>
  {
    let world = Mat4::look_at_rh(eye, target, up).inverse();
    let (_, rotation, _) = world.to_scale_rotation_translation();

    let node = self.node_mut(id)?;
    node.translation = eye;
    node.rotation = rotation;
    Ok(())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Helpers
// ──────────────────────────────────────────────────────────────
//

impl NodeGraph
{
  fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> Result<bool>
  {
    let mut next = Some(of);

    while let Some(id) = next
    {
      if id == candidate
      {
        return Ok(true);
      }
      next = self.node(id)?.parent;
    }

    Ok(false)
  }
}
