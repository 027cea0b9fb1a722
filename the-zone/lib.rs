//! Drop-zone geometry.
//!
//! The layout collaborator reports the bounding box of each named [`Zone`]
//! into a [`SpatialRegistry`]. During a drag, pointer samples are resolved
//! against the workspace rectangle and entry transitions are edge-detected by
//! [`update_drag`].

mod drag;
mod geometry;
mod registry;

pub use drag::{
  DragState,
  DropOutcome,
  DropResult,
  ZoneTransition,
  finish_drag,
  point_in_zone,
  resolve_zone,
  rest_position,
  update_drag,
  zone_at,
};
pub use geometry::{
  ItemSize,
  Point,
  ZoneRect,
};
pub use registry::{
  SpatialRegistry,
  Zone,
};
