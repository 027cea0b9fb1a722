//! Clause fragment storage.
//!
//! A [`ClauseStore`] holds three ordered categories of fragments (`select`,
//! `join` and `where`) plus the fixed clauses supplied at construction. The
//! only way to mutate it is [`ClauseStore::apply_contribution`], which appends
//! each populated fragment to its category unless the category already holds
//! an identical string.
//!
//! # Example
//!
//! ```
//! use the_query::{
//!   ClauseStore,
//!   Contribution,
//! };
//!
//! let mut store = ClauseStore::new("from table_name_1");
//! store.apply_contribution(&Contribution::new().with_select("member_id"));
//! store.apply_contribution(&Contribution::new().with_select("member_id"));
//!
//! assert_eq!(store.snapshot().select, vec!["member_id".to_string()]);
//! ```

use bitflags::bitflags;
use indexmap::IndexSet;
use serde::{
  Deserialize,
  Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
  Select,
  Join,
  Where,
}

impl ClauseKind {
  pub const ALL: [ClauseKind; 3] = [ClauseKind::Select, ClauseKind::Join, ClauseKind::Where];

  pub fn as_str(self) -> &'static str {
    match self {
      ClauseKind::Select => "select",
      ClauseKind::Join => "join",
      ClauseKind::Where => "where",
    }
  }

  fn flag(self) -> ClauseChanges {
    match self {
      ClauseKind::Select => ClauseChanges::SELECT,
      ClauseKind::Join => ClauseChanges::JOIN,
      ClauseKind::Where => ClauseChanges::WHERE,
    }
  }
}

bitflags! {
  /// Categories modified by a single contribution.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct ClauseChanges: u8 {
    const SELECT = 1 << 0;
    const JOIN   = 1 << 1;
    const WHERE  = 1 << 2;
  }
}

impl ClauseChanges {
  pub fn kinds(self) -> impl Iterator<Item = ClauseKind> {
    ClauseKind::ALL
      .into_iter()
      .filter(move |kind| self.contains(kind.flag()))
  }
}

/// The fragments one user action adds to a query.
///
/// Absent and empty fields contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Contribution {
  pub select: Option<String>,
  pub join:   Option<String>,
  #[serde(rename = "where")]
  pub filter: Option<String>,
}

impl Contribution {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_select(mut self, fragment: impl Into<String>) -> Self {
    self.select = Some(fragment.into());
    self
  }

  pub fn with_join(mut self, fragment: impl Into<String>) -> Self {
    self.join = Some(fragment.into());
    self
  }

  pub fn with_where(mut self, fragment: impl Into<String>) -> Self {
    self.filter = Some(fragment.into());
    self
  }

  /// The populated fragment for `kind`, if any.
  pub fn fragment(&self, kind: ClauseKind) -> Option<&str> {
    let value = match kind {
      ClauseKind::Select => self.select.as_deref(),
      ClauseKind::Join => self.join.as_deref(),
      ClauseKind::Where => self.filter.as_deref(),
    };
    value.filter(|value| !value.is_empty())
  }

  pub fn is_empty(&self) -> bool {
    ClauseKind::ALL
      .into_iter()
      .all(|kind| self.fragment(kind).is_none())
  }
}

/// Immutable copy of a store's contents, in contribution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClauseSnapshot {
  pub select:   Vec<String>,
  pub base:     String,
  pub join:     Vec<String>,
  #[serde(rename = "where")]
  pub filter:   Vec<String>,
  pub order_by: Option<String>,
}

impl ClauseSnapshot {
  pub fn fragments(&self, kind: ClauseKind) -> &[String] {
    match kind {
      ClauseKind::Select => &self.select,
      ClauseKind::Join => &self.join,
      ClauseKind::Where => &self.filter,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ClauseStore {
  select:   IndexSet<String>,
  join:     IndexSet<String>,
  filter:   IndexSet<String>,
  base:     String,
  order_by: Option<String>,
}

impl ClauseStore {
  pub fn new(base: impl Into<String>) -> Self {
    Self {
      select:   IndexSet::new(),
      join:     IndexSet::new(),
      filter:   IndexSet::new(),
      base:     base.into(),
      order_by: None,
    }
  }

  /// Sets the fixed clause emitted after `where`. An empty string means none.
  pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
    let order_by = order_by.into();
    self.order_by = (!order_by.is_empty()).then_some(order_by);
    self
  }

  pub fn base(&self) -> &str {
    &self.base
  }

  pub fn order_by(&self) -> Option<&str> {
    self.order_by.as_deref()
  }

  pub fn len(&self, kind: ClauseKind) -> usize {
    self.category(kind).len()
  }

  pub fn is_empty(&self) -> bool {
    ClauseKind::ALL.into_iter().all(|kind| self.len(kind) == 0)
  }

  pub fn contains(&self, kind: ClauseKind, fragment: &str) -> bool {
    self.category(kind).contains(fragment)
  }

  pub fn fragments(&self, kind: ClauseKind) -> impl Iterator<Item = &str> {
    self.category(kind).iter().map(String::as_str)
  }

  /// Appends every populated fragment of `contribution` to its category,
  /// skipping fragments the category already holds. Returns the categories
  /// that grew.
  pub fn apply_contribution(&mut self, contribution: &Contribution) -> ClauseChanges {
    let mut changes = ClauseChanges::empty();
    for kind in ClauseKind::ALL {
      let Some(fragment) = contribution.fragment(kind) else {
        continue;
      };
      if self.category_mut(kind).insert(fragment.to_string()) {
        changes |= kind.flag();
      }
    }

    if changes.is_empty() {
      tracing::trace!(?contribution, "contribution left clause store unchanged");
    } else {
      tracing::debug!(?changes, "applied clause contribution");
    }
    changes
  }

  pub fn snapshot(&self) -> ClauseSnapshot {
    ClauseSnapshot {
      select:   self.select.iter().cloned().collect(),
      base:     self.base.clone(),
      join:     self.join.iter().cloned().collect(),
      filter:   self.filter.iter().cloned().collect(),
      order_by: self.order_by.clone(),
    }
  }

  fn category(&self, kind: ClauseKind) -> &IndexSet<String> {
    match kind {
      ClauseKind::Select => &self.select,
      ClauseKind::Join => &self.join,
      ClauseKind::Where => &self.filter,
    }
  }

  fn category_mut(&mut self, kind: ClauseKind) -> &mut IndexSet<String> {
    match kind {
      ClauseKind::Select => &mut self.select,
      ClauseKind::Join => &mut self.join,
      ClauseKind::Where => &mut self.filter,
    }
  }
}
