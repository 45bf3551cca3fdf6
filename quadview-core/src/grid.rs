//
// ──────────────────────────────────────────────────────────────
//   Reference grid: XZ ground plane plus coloured axes
// ──────────────────────────────────────────────────────────────
//

const GRID_HALF_EXTENT: f32 = 50.0;
const GRID_STEP: f32 = 10.0;
const AXIS_LENGTH: f32 = 25.0;

const COL_GRID: [f32; 3] = [0.45, 0.45, 0.45];

// Positive arm colours
const COL_X_POS: [f32; 3] = [1.0, 0.2, 0.2];
const COL_Y_POS: [f32; 3] = [0.2, 1.0, 0.2];
const COL_Z_POS: [f32; 3] = [0.2, 0.4, 1.0];

// Negative arm colours (dimmed)
const COL_X_NEG: [f32; 3] = [0.3, 0.1, 0.1];
const COL_Y_NEG: [f32; 3] = [0.1, 0.3, 0.1];
const COL_Z_NEG: [f32; 3] = [0.1, 0.15, 0.3];

//
// ──────────────────────────────────────────────────────────────
//   Vertex layout: [x, y, z,  r, g, b]  (line list, 2 per segment)
// ──────────────────────────────────────────────────────────────
//

pub type LineVertex = [f32; 6];

pub fn make_vertex(pos: [f32; 3], col: [f32; 3]) -> LineVertex
{
  [pos[0], pos[1], pos[2], col[0], col[1], col[2]]
}

/// Grid lines first, axes last so they overdraw the centre lines.
pub fn grid_vertices() -> Vec<LineVertex>
{
  let mut verts = Vec::new();
  push_ground_lines(&mut verts);
  push_axes(&mut verts);
  verts
}

fn push_ground_lines(verts: &mut Vec<LineVertex>)
{
  let steps = (GRID_HALF_EXTENT / GRID_STEP) as i32;
  let e = GRID_HALF_EXTENT;

  for i in -steps..=steps
  {
    let t = i as f32 * GRID_STEP;

    // parallel to Z
    verts.push(make_vertex([t, 0.0, -e], COL_GRID));
    verts.push(make_vertex([t, 0.0, e], COL_GRID));

    // parallel to X
    verts.push(make_vertex([-e, 0.0, t], COL_GRID));
    verts.push(make_vertex([e, 0.0, t], COL_GRID));
  }
}

fn push_axes(verts: &mut Vec<LineVertex>)
{
  let origin = [0.0_f32, 0.0, 0.0];
  let l = AXIS_LENGTH;

  verts.extend_from_slice(&[
    // +X / -X
    make_vertex(origin, COL_X_POS),
    make_vertex([l, 0.0, 0.0], COL_X_POS),
    make_vertex(origin, COL_X_NEG),
    make_vertex([-l, 0.0, 0.0], COL_X_NEG),
    // +Y / -Y
    make_vertex(origin, COL_Y_POS),
    make_vertex([0.0, l, 0.0], COL_Y_POS),
    make_vertex(origin, COL_Y_NEG),
    make_vertex([0.0, -l, 0.0], COL_Y_NEG),
    // +Z / -Z
    make_vertex(origin, COL_Z_POS),
    make_vertex([0.0, 0.0, l], COL_Z_POS),
    make_vertex(origin, COL_Z_NEG),
    make_vertex([0.0, 0.0, -l], COL_Z_NEG),
  ]);
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn grid_is_a_line_list_on_the_ground()
  {
    let verts = grid_vertices();
    let axes = 12;

    assert_eq!(verts.len() % 2, 0);
    assert!(verts[..verts.len() - axes].iter().all(|v| v[1] == 0.0));
  }

  #[test]
  fn grid_spans_its_extent()
  {
    let verts = grid_vertices();
    let max_x = verts.iter().map(|v| v[0]).fold(f32::MIN, f32::max);

    assert_eq!(max_x, GRID_HALF_EXTENT);
  }
}
