//! Catalog search and match highlighting.

pub mod catalog;
pub mod fuzzy;
pub mod highlight;
pub mod search;

pub use catalog::{
  Catalog,
  CatalogError,
  FieldDescriptor,
};
pub use highlight::{
  MatchRange,
  RangePolicy,
  Segment,
  SegmentKind,
  highlight,
  highlight_with,
};
pub use search::{
  AttributeMatch,
  DEFAULT_MAX_RESULTS,
  FieldSearch,
  FuzzySearch,
  HighlightedRow,
  MatchAttribute,
  SearchHit,
  SearchWeights,
};
