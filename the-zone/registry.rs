use serde::{
  Deserialize,
  Serialize,
};

use crate::geometry::ZoneRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
  /// Where catalog fields are listed and dragged from.
  Catalog,
  /// The design area; dropping a field here contributes to the query.
  Workspace,
  /// Where the query text is rendered.
  Output,
}

impl Zone {
  pub const ALL: [Zone; 3] = [Zone::Catalog, Zone::Workspace, Zone::Output];

  fn index(self) -> usize {
    match self {
      Zone::Catalog => 0,
      Zone::Workspace => 1,
      Zone::Output => 2,
    }
  }
}

/// Last reported rectangle per zone.
///
/// Reads never wait for a fresh measurement: a zone that has not been
/// reported yet resolves to [`ZoneRect::EMPTY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialRegistry {
  rects: [Option<ZoneRect>; 3],
}

impl SpatialRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn report_rect(&mut self, zone: Zone, rect: ZoneRect) {
    tracing::trace!(?zone, ?rect, "zone rect reported");
    self.rects[zone.index()] = Some(rect);
  }

  pub fn rect(&self, zone: Zone) -> ZoneRect {
    self.rects[zone.index()].unwrap_or(ZoneRect::EMPTY)
  }

  pub fn is_reported(&self, zone: Zone) -> bool {
    self.rects[zone.index()].is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unreported_zone_is_empty() {
    let registry = SpatialRegistry::new();
    for zone in Zone::ALL {
      assert_eq!(registry.rect(zone), ZoneRect::EMPTY);
      assert!(!registry.is_reported(zone));
    }
  }

  #[test]
  fn last_report_wins() {
    let mut registry = SpatialRegistry::new();
    registry.report_rect(Zone::Workspace, ZoneRect::new(0.0, 0.0, 10.0, 10.0));
    registry.report_rect(Zone::Workspace, ZoneRect::new(5.0, 5.0, 20.0, 20.0));
    registry.report_rect(Zone::Output, ZoneRect::new(1.0, 1.0, 1.0, 1.0));

    assert_eq!(
      registry.rect(Zone::Workspace),
      ZoneRect::new(5.0, 5.0, 20.0, 20.0)
    );
    assert_eq!(registry.rect(Zone::Catalog), ZoneRect::EMPTY);
  }

  #[test]
  fn zone_names_are_kebab_case() {
    let zone: Zone = serde_json::from_str("\"workspace\"").unwrap();
    assert_eq!(zone, Zone::Workspace);
  }
}
