//! Query assembly.
//!
//! Fragments contributed by independent user actions accumulate in a
//! [`ClauseStore`](clause::ClauseStore) and are rendered into one canonical
//! query text by [`serialize`](serialize::serialize). Observers learn about
//! changes through [`QueryEvents`](events::QueryEvents).

pub mod clause;
pub mod events;
pub mod serialize;

pub use clause::{
  ClauseChanges,
  ClauseKind,
  ClauseSnapshot,
  ClauseStore,
  Contribution,
};
pub use events::{
  DEFAULT_EVENT_LIMIT,
  QueryEvent,
  QueryEventKind,
  QueryEvents,
  SubscriptionId,
};
pub use serialize::serialize;
