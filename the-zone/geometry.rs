use serde::{
  Deserialize,
  Serialize,
};

/// Pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f32,
  pub y: f32,
}

impl Point {
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}

/// Axis-aligned bounding box of a zone as last measured, in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRect {
  pub left:   f32,
  pub top:    f32,
  pub width:  f32,
  pub height: f32,
}

impl ZoneRect {
  /// The rectangle of a zone that has never been measured.
  pub const EMPTY: Self = Self {
    left:   0.0,
    top:    0.0,
    width:  0.0,
    height: 0.0,
  };

  pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
    Self {
      left,
      top,
      width,
      height,
    }
  }

  pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
    Self {
      left,
      top,
      width: right - left,
      height: bottom - top,
    }
  }

  pub fn right(&self) -> f32 {
    self.left + self.width
  }

  pub fn bottom(&self) -> f32 {
    self.top + self.height
  }

  /// A rectangle without area contains no point.
  pub fn is_empty(&self) -> bool {
    !(self.width > 0.0 && self.height > 0.0)
  }

  /// Inclusive on all four edges.
  pub fn contains(&self, point: Point) -> bool {
    !self.is_empty()
      && point.x >= self.left
      && point.x <= self.right()
      && point.y >= self.top
      && point.y <= self.bottom()
  }
}

/// Size of the element being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSize {
  pub width:  f32,
  pub height: f32,
}

impl Default for ItemSize {
  fn default() -> Self {
    Self {
      width:  100.0,
      height: 100.0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn edges_are_inclusive() {
    let rect = ZoneRect::new(10.0, 20.0, 100.0, 50.0);
    assert!(rect.contains(Point::new(10.0, 20.0)));
    assert!(rect.contains(Point::new(110.0, 70.0)));
    assert!(rect.contains(Point::new(10.0, 70.0)));
    assert!(!rect.contains(Point::new(110.5, 70.0)));
    assert!(!rect.contains(Point::new(50.0, 19.9)));
  }

  #[test]
  fn empty_rect_contains_nothing() {
    assert!(ZoneRect::EMPTY.is_empty());
    assert!(!ZoneRect::EMPTY.contains(Point::new(0.0, 0.0)));
    assert!(!ZoneRect::new(5.0, 5.0, 0.0, 10.0).contains(Point::new(5.0, 6.0)));
  }

  #[test]
  fn nan_geometry_contains_nothing() {
    let rect = ZoneRect::new(0.0, 0.0, f32::NAN, 10.0);
    assert!(!rect.contains(Point::new(0.0, 5.0)));
    let rect = ZoneRect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!rect.contains(Point::new(f32::NAN, 5.0)));
  }

  #[test]
  fn from_edges_matches_new() {
    assert_eq!(
      ZoneRect::from_edges(10.0, 20.0, 110.0, 70.0),
      ZoneRect::new(10.0, 20.0, 100.0, 50.0)
    );
  }
}
