use crate::error::Result;
use crate::node::{NodeGraph, NodeId};

//
// ──────────────────────────────────────────────────────────────
//   Fixed orthographic views
//
//   All three sit at their node origin and only differ in the
//   pan/tilt applied once at setup:
//     Front → looking down -Z
//     Top   → tilt(-90°), looking down -Y
//     Left  → pan(-90°),  looking along +X
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixedView
{
  Front,
  Top,
  Left,
}

impl FixedView
{
  pub fn label(self) -> &'static str
  {
    match self
    {
      FixedView::Front => "Front",
      FixedView::Top => "Top",
      FixedView::Left => "Left",
    }
  }

  pub fn orient(self, nodes: &mut NodeGraph, node: NodeId) -> Result<()>
  {
    match self
    {
      FixedView::Front => Ok(()),
      FixedView::Top => nodes.tilt(node, -90.0),
      FixedView::Left => nodes.pan(node, -90.0),
    }
  }
}
