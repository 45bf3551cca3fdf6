//
// ──────────────────────────────────────────────────────────────
//   Viewport layout
//
//   ┌────────┬─────────────────┐
//   │ grid 0 │                 │
//   ├────────┤                 │
//   │ grid 1 │                 │
//   ├────────┤      main       │
//   │ grid 2 │                 │
//   ├────────┤                 │
//   │ grid 3 │                 │
//   └────────┴─────────────────┘
//
//   Left third: four stacked cells, one per camera.
//   Right two thirds: the selected camera, full height.
// ──────────────────────────────────────────────────────────────
//

/// Screen rectangle in physical pixels, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect
{
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl Rect
{
  pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self
  {
    Self { x, y, width, height }
  }

  pub fn is_empty(&self) -> bool
  {
    self.width == 0 || self.height == 0
  }

  /// Width over height; 1.0 for degenerate rectangles.
  pub fn aspect(&self) -> f32
  {
    if self.is_empty()
    {
      return 1.0;
    }

    self.width as f32 / self.height as f32
  }

  pub fn contains(&self, px: f32, py: f32) -> bool
  {
    px >= self.x as f32
      && py >= self.y as f32
      && px < (self.x + self.width) as f32
      && py < (self.y + self.height) as f32
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportLayout
{
  pub main: Rect,
  pub grid: [Rect; 4],
}

impl ViewportLayout
{
  /// Pure function of the window size. Zero sizes give zero-area rectangles.
  pub fn recompute(width: u32, height: u32) -> Self
  {
    let x_offset = width / 3;
    let y_offset = height / 4;

    let main = Rect::new(x_offset, 0, x_offset * 2, height);
    let grid = std::array::from_fn(|i| Rect::new(0, y_offset * i as u32, x_offset, y_offset));

    Self { main, grid }
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn layout_900_by_800()
  {
    let layout = ViewportLayout::recompute(900, 800);

    assert_eq!(layout.main, Rect::new(300, 0, 600, 800));
    assert_eq!(
      layout.grid,
      [
        Rect::new(0, 0, 300, 200),
        Rect::new(0, 200, 300, 200),
        Rect::new(0, 400, 300, 200),
        Rect::new(0, 600, 300, 200),
      ]
    );
  }

  #[test]
  fn widths_and_heights_cover_window_within_rounding()
  {
    for w in (0..2000).step_by(7)
    {
      for h in (0..1500).step_by(11)
      {
        let layout = ViewportLayout::recompute(w, h);

        let covered_w = layout.main.width + layout.grid[0].width;
        let covered_h: u32 = layout.grid.iter().map(|r| r.height).sum();

        assert!(w - covered_w < 3, "w={w} covered={covered_w}");
        assert!(h - covered_h < 4, "h={h} covered={covered_h}");
        assert_eq!(layout.main.height, h);
      }
    }
  }

  #[test]
  fn zero_size_gives_empty_rects()
  {
    let layout = ViewportLayout::recompute(0, 0);

    assert!(layout.main.is_empty());
    assert!(layout.grid.iter().all(Rect::is_empty));
    assert_eq!(layout.main.aspect(), 1.0);
  }

  #[test]
  fn recompute_is_idempotent()
  {
    assert_eq!(ViewportLayout::recompute(1280, 720), ViewportLayout::recompute(1280, 720));
  }

  #[test]
  fn contains_is_half_open()
  {
    let r = Rect::new(10, 20, 30, 40);

    assert!(r.contains(10.0, 20.0));
    assert!(r.contains(39.9, 59.9));
    assert!(!r.contains(40.0, 30.0));
    assert!(!r.contains(15.0, 60.0));
  }
}
