use crate::{
  geometry::{
    ItemSize,
    Point,
    ZoneRect,
  },
  registry::{
    SpatialRegistry,
    Zone,
  },
};

/// Inclusive on all four edges. A rect without area, whether never reported
/// or reported with zero width or height, contains no point.
pub fn point_in_zone(point: Point, rect: ZoneRect) -> bool {
  rect.contains(point)
}

/// Whether `point` lies inside the workspace zone's last reported rect.
pub fn resolve_zone(point: Point, registry: &SpatialRegistry) -> bool {
  point_in_zone(point, registry.rect(Zone::Workspace))
}

/// The zone containing `point`. Overlaps resolve in favour of the
/// workspace, then the catalog.
pub fn zone_at(point: Point, registry: &SpatialRegistry) -> Option<Zone> {
  [Zone::Workspace, Zone::Catalog, Zone::Output]
    .into_iter()
    .find(|zone| point_in_zone(point, registry.rect(*zone)))
}

/// Where a dragged element returns to when dropped outside the workspace:
/// centered in the catalog zone.
pub fn rest_position(catalog: ZoneRect, item: ItemSize) -> Point {
  Point::new(
    catalog.left + catalog.width / 2.0 - item.width / 2.0,
    catalog.top + catalog.height / 2.0 - item.height / 2.0,
  )
}

/// Transient state of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
  pointer:          Point,
  inside_workspace: bool,
}

impl DragState {
  /// A drag whose element starts outside the workspace.
  pub fn new(origin: Point) -> Self {
    Self {
      pointer:          origin,
      inside_workspace: false,
    }
  }

  /// A drag whose initial membership is read from the registry, so moving an
  /// element that already sits in the workspace does not count as entering.
  pub fn start(origin: Point, registry: &SpatialRegistry) -> Self {
    Self {
      pointer:          origin,
      inside_workspace: resolve_zone(origin, registry),
    }
  }

  pub fn pointer(&self) -> Point {
    self.pointer
  }

  pub fn inside_workspace(&self) -> bool {
    self.inside_workspace
  }

  /// Moves the element to `point`. Samples with a zero coordinate are what
  /// hosts report while a drag is being released; the element keeps its last
  /// position and `false` is returned.
  pub fn track(&mut self, point: Point) -> bool {
    if is_release_sample(point) {
      return false;
    }
    self.pointer = point;
    true
  }
}

fn is_release_sample(point: Point) -> bool {
  point.x == 0.0 || point.y == 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneTransition {
  Entered,
  Exited,
  StayedInside,
  StayedOutside,
}

impl ZoneTransition {
  pub fn is_entry(self) -> bool {
    self == ZoneTransition::Entered
  }

  pub fn is_inside(self) -> bool {
    matches!(self, ZoneTransition::Entered | ZoneTransition::StayedInside)
  }

  fn between(was_inside: bool, inside: bool) -> Self {
    match (was_inside, inside) {
      (false, true) => ZoneTransition::Entered,
      (true, false) => ZoneTransition::Exited,
      (true, true) => ZoneTransition::StayedInside,
      (false, false) => ZoneTransition::StayedOutside,
    }
  }
}

/// Feeds one pointer sample to `drag`.
///
/// Only an outside-to-inside change yields [`ZoneTransition::Entered`]; the
/// caller acts on it once. When the result is outside, the caller moves the
/// element back to [`rest_position`].
pub fn update_drag(drag: &mut DragState, point: Point, registry: &SpatialRegistry) -> ZoneTransition {
  if !drag.track(point) {
    tracing::trace!(?point, "release sample kept element in place");
  }

  let inside = resolve_zone(point, registry);
  let transition = ZoneTransition::between(drag.inside_workspace, inside);
  drag.inside_workspace = inside;

  match transition {
    ZoneTransition::Entered | ZoneTransition::Exited => {
      tracing::debug!(?transition, ?point, "workspace membership changed");
    },
    _ => tracing::trace!(?point, inside, "drag sample"),
  }
  transition
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
  /// The element stays where it was dropped, inside the workspace.
  Placed { at: Point },
  /// The element goes back to its rest position in the catalog.
  Returned { rest: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropResult {
  pub outcome: DropOutcome,
  /// Whether the drop itself moved the element into the workspace.
  pub entered: bool,
}

/// Ends `drag` at `point`.
pub fn finish_drag(
  drag: DragState,
  point: Point,
  registry: &SpatialRegistry,
  item: ItemSize,
) -> DropResult {
  let inside = resolve_zone(point, registry);
  let entered = inside && !drag.inside_workspace;
  let outcome = if inside {
    DropOutcome::Placed { at: point }
  } else {
    DropOutcome::Returned {
      rest: rest_position(registry.rect(Zone::Catalog), item),
    }
  };
  tracing::debug!(?outcome, entered, "drag finished");
  DropResult { outcome, entered }
}

#[cfg(test)]
mod tests {
  use super::*;

  const INSIDE: Point = Point::new(150.0, 150.0);
  const OUTSIDE: Point = Point::new(50.0, 50.0);

  fn registry() -> SpatialRegistry {
    let mut registry = SpatialRegistry::new();
    registry.report_rect(Zone::Catalog, ZoneRect::new(0.0, 0.0, 100.0, 400.0));
    registry.report_rect(Zone::Workspace, ZoneRect::new(100.0, 0.0, 300.0, 400.0));
    registry.report_rect(Zone::Output, ZoneRect::new(400.0, 0.0, 200.0, 400.0));
    registry
  }

  #[test]
  fn entry_is_signalled_once_per_transition() {
    let registry = registry();
    let mut drag = DragState::new(OUTSIDE);
    let transitions: Vec<_> = [OUTSIDE, INSIDE, INSIDE, OUTSIDE]
      .into_iter()
      .map(|point| update_drag(&mut drag, point, &registry))
      .collect();

    assert_eq!(transitions, [
      ZoneTransition::StayedOutside,
      ZoneTransition::Entered,
      ZoneTransition::StayedInside,
      ZoneTransition::Exited,
    ]);
    assert_eq!(transitions.iter().filter(|t| t.is_entry()).count(), 1);
  }

  #[test]
  fn missing_workspace_never_resolves_inside() {
    let registry = SpatialRegistry::new();
    let mut drag = DragState::new(OUTSIDE);
    assert!(!resolve_zone(Point::new(0.0, 0.0), &registry));
    assert_eq!(
      update_drag(&mut drag, INSIDE, &registry),
      ZoneTransition::StayedOutside
    );
  }

  #[test]
  fn release_samples_keep_position_but_update_membership() {
    let registry = registry();
    let mut drag = DragState::new(OUTSIDE);
    assert!(update_drag(&mut drag, INSIDE, &registry).is_entry());

    let transition = update_drag(&mut drag, Point::new(0.0, 0.0), &registry);
    assert_eq!(transition, ZoneTransition::Exited);
    assert_eq!(drag.pointer(), INSIDE);
    assert!(!drag.inside_workspace());
  }

  #[test]
  fn workspace_flush_with_viewport_edge() {
    let mut registry = SpatialRegistry::new();
    registry.report_rect(Zone::Workspace, ZoneRect::new(0.0, 0.0, 500.0, 600.0));
    let mut drag = DragState::new(Point::new(600.0, 300.0));

    assert!(update_drag(&mut drag, Point::new(0.0, 300.0), &registry).is_entry());
    assert_eq!(drag.pointer(), Point::new(600.0, 300.0));
    assert_eq!(
      update_drag(&mut drag, Point::new(250.0, 0.0), &registry),
      ZoneTransition::StayedInside
    );
    assert_eq!(
      update_drag(&mut drag, Point::new(700.0, 0.0), &registry),
      ZoneTransition::Exited
    );
  }

  #[test]
  fn degenerate_reported_rect_contains_nothing() {
    let rect = ZoneRect::new(100.0, 0.0, 0.0, 400.0);
    assert!(!point_in_zone(Point::new(100.0, 10.0), rect));
  }

  #[test]
  fn drag_started_in_workspace_is_not_an_entry() {
    let registry = registry();
    let mut drag = DragState::start(INSIDE, &registry);
    assert!(drag.inside_workspace());
    assert!(!update_drag(&mut drag, Point::new(160.0, 160.0), &registry).is_entry());
  }

  #[test]
  fn zone_at_finds_each_zone() {
    let registry = registry();
    assert_eq!(zone_at(OUTSIDE, &registry), Some(Zone::Catalog));
    assert_eq!(zone_at(INSIDE, &registry), Some(Zone::Workspace));
    assert_eq!(zone_at(Point::new(500.0, 10.0), &registry), Some(Zone::Output));
    assert_eq!(zone_at(Point::new(900.0, 10.0), &registry), None);
    // shared edge between catalog and workspace
    assert_eq!(zone_at(Point::new(100.0, 10.0), &registry), Some(Zone::Workspace));
  }

  #[test]
  fn rest_position_is_centered_in_catalog() {
    let rest = rest_position(ZoneRect::new(0.0, 0.0, 300.0, 600.0), ItemSize::default());
    assert_eq!(rest, Point::new(100.0, 250.0));

    let rest = rest_position(ZoneRect::new(20.0, 10.0, 300.0, 600.0), ItemSize {
      width:  50.0,
      height: 20.0,
    });
    assert_eq!(rest, Point::new(145.0, 300.0));
  }

  #[test]
  fn drop_inside_is_placed() {
    let registry = registry();
    let drag = DragState::new(OUTSIDE);
    let result = finish_drag(drag, INSIDE, &registry, ItemSize::default());
    assert_eq!(result.outcome, DropOutcome::Placed { at: INSIDE });
    assert!(result.entered);
  }

  #[test]
  fn drop_outside_returns_to_rest() {
    let registry = registry();
    let mut drag = DragState::new(OUTSIDE);
    update_drag(&mut drag, INSIDE, &registry);
    let result = finish_drag(drag, Point::new(500.0, 10.0), &registry, ItemSize::default());
    assert_eq!(result.outcome, DropOutcome::Returned {
      rest: Point::new(0.0, 150.0),
    });
    assert!(!result.entered);
  }

  #[test]
  fn drop_after_entry_does_not_signal_again() {
    let registry = registry();
    let mut drag = DragState::new(OUTSIDE);
    assert!(update_drag(&mut drag, INSIDE, &registry).is_entry());
    let result = finish_drag(drag, INSIDE, &registry, ItemSize::default());
    assert!(!result.entered);
  }

  quickcheck::quickcheck! {
    fn entries_match_outside_to_inside_edges(path: Vec<bool>) -> bool {
      let registry = registry();
      let mut drag = DragState::new(OUTSIDE);
      let mut previous = false;
      let mut expected = 0;
      let mut signalled = 0;
      for inside in path {
        if inside && !previous {
          expected += 1;
        }
        previous = inside;
        let point = if inside { INSIDE } else { OUTSIDE };
        if update_drag(&mut drag, point, &registry).is_entry() {
          signalled += 1;
        }
      }
      expected == signalled
    }
  }
}
