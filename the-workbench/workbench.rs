//! One query-building session.
//!
//! A [`Workbench`] owns the clause store, the zone registry, the active drag
//! and the cached query text. Everything runs synchronously on the caller's
//! event loop: search-result clicks and drag events are applied in the order
//! they are delivered, and every change to the text is published to
//! subscribers before the call returns.

use the_query::{
  ClauseChanges,
  ClauseSnapshot,
  ClauseStore,
  Contribution,
  QueryEvent,
  QueryEventKind,
  QueryEvents,
  SubscriptionId,
};
use the_search::{
  Catalog,
  FieldSearch,
  FuzzySearch,
  RangePolicy,
  SearchHit,
};
use the_zone::{
  DragState,
  DropResult,
  ItemSize,
  Point,
  SpatialRegistry,
  Zone,
  ZoneRect,
  ZoneTransition,
  finish_drag,
  update_drag,
  zone_at,
};
use thiserror::Error;

use crate::config::WorkbenchConfig;

#[derive(Debug, Error)]
pub enum WorkbenchError {
  #[error("unknown catalog field `{0}`")]
  UnknownField(String),
  #[error("search hit refers to field #{0}, which is not in the catalog")]
  StaleHit(usize),
}

pub type Result<T> = std::result::Result<T, WorkbenchError>;

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
  state: DragState,
  /// Catalog field carried by the drag, if any.
  field: Option<usize>,
}

pub struct Workbench<S = FuzzySearch> {
  store:       ClauseStore,
  registry:    SpatialRegistry,
  catalog:     Catalog,
  search:      S,
  ranges:      RangePolicy,
  item:        ItemSize,
  drag:        Option<ActiveDrag>,
  text:        String,
  placeholder: String,
  events:      QueryEvents,
}

impl Workbench<FuzzySearch> {
  pub fn new(config: &WorkbenchConfig) -> Self {
    let search = FuzzySearch::new(config.search.weights, config.search.max_results);
    Self::with_search(config, search)
  }
}

impl<S: FieldSearch> Workbench<S> {
  pub fn with_search(config: &WorkbenchConfig, search: S) -> Self {
    let store =
      ClauseStore::new(config.query.base_clause.as_str()).with_order_by(config.query.order_by.as_str());
    Self {
      store,
      registry: SpatialRegistry::new(),
      catalog: config.catalog(),
      search,
      ranges: config.highlight.ranges,
      item: config.drag.item_size(),
      drag: None,
      text: config.query.initial_query.clone(),
      placeholder: config.query.placeholder.clone(),
      events: QueryEvents::with_limit(config.query.event_limit),
    }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn store(&self) -> &ClauseStore {
    &self.store
  }

  pub fn snapshot(&self) -> ClauseSnapshot {
    self.store.snapshot()
  }

  pub fn registry(&self) -> &SpatialRegistry {
    &self.registry
  }

  /// How search-result rows should be highlighted.
  pub fn range_policy(&self) -> RangePolicy {
    self.ranges
  }

  pub fn search(&mut self, query: &str) -> Vec<SearchHit> {
    self.search.search(&self.catalog, query)
  }

  /// Applies the contribution of the field behind a clicked search result.
  pub fn choose(&mut self, hit: &SearchHit) -> Result<ClauseChanges> {
    let field = hit
      .field(&self.catalog)
      .ok_or(WorkbenchError::StaleHit(hit.field_index))?;
    let contribution = field.contribution.clone();
    Ok(self.apply(&contribution))
  }

  pub fn choose_field(&mut self, name: &str) -> Result<ClauseChanges> {
    let (_, field) = self
      .catalog
      .find(name)
      .ok_or_else(|| WorkbenchError::UnknownField(name.to_string()))?;
    let contribution = field.contribution.clone();
    Ok(self.apply(&contribution))
  }

  /// Applies `contribution` and, if the store changed, recomputes and
  /// publishes the query text.
  pub fn apply(&mut self, contribution: &Contribution) -> ClauseChanges {
    let changes = self.store.apply_contribution(contribution);
    if changes.is_empty() {
      return changes;
    }

    self.text = self.store.to_query();
    self.events.publish(QueryEventKind::Contributed {
      changed: changes.kinds().collect(),
      text:    self.text.clone(),
    });
    changes
  }

  pub fn report_rect(&mut self, zone: Zone, rect: ZoneRect) {
    self.registry.report_rect(zone, rect);
  }

  pub fn zone_at(&self, point: Point) -> Option<Zone> {
    zone_at(point, &self.registry)
  }

  /// Starts dragging an element that carries no catalog field. Any drag in
  /// progress is abandoned.
  pub fn begin_drag(&mut self, at: Point) {
    self.start_drag(at, None);
  }

  /// Starts dragging the catalog field `name`; entering the workspace
  /// applies its contribution.
  pub fn begin_field_drag(&mut self, name: &str, at: Point) -> Result<()> {
    let (index, _) = self
      .catalog
      .find(name)
      .ok_or_else(|| WorkbenchError::UnknownField(name.to_string()))?;
    self.start_drag(at, Some(index));
    Ok(())
  }

  fn start_drag(&mut self, at: Point, field: Option<usize>) {
    if self.drag.is_some() {
      tracing::debug!("abandoning unfinished drag");
    }
    self.drag = Some(ActiveDrag {
      state: DragState::start(at, &self.registry),
      field,
    });
  }

  pub fn is_dragging(&self) -> bool {
    self.drag.is_some()
  }

  /// Feeds a pointer move to the active drag. Returns `None` when no drag is
  /// in progress.
  pub fn drag_to(&mut self, point: Point) -> Option<ZoneTransition> {
    let drag = self.drag.as_mut()?;
    let transition = update_drag(&mut drag.state, point, &self.registry);
    let field = drag.field;
    if transition.is_entry() {
      self.enter_workspace(field);
    }
    Some(transition)
  }

  /// Ends the active drag at `point`. Returns `None` when no drag is in
  /// progress.
  pub fn end_drag(&mut self, point: Point) -> Option<DropResult> {
    let drag = self.drag.take()?;
    let result = finish_drag(drag.state, point, &self.registry, self.item);
    if result.entered {
      self.enter_workspace(drag.field);
    }
    Some(result)
  }

  /// Drops the active drag without touching the store.
  pub fn cancel_drag(&mut self) -> bool {
    self.drag.take().is_some()
  }

  fn enter_workspace(&mut self, field: Option<usize>) {
    let Some(field) = field.and_then(|index| self.catalog.get(index)) else {
      return;
    };
    let contribution = field.contribution.clone();
    self.apply(&contribution);
  }

  /// The last computed (or overwritten) query text.
  pub fn query_text(&self) -> &str {
    &self.text
  }

  /// The query text, or the placeholder while it is empty.
  pub fn display_text(&self) -> &str {
    if self.text.is_empty() {
      &self.placeholder
    } else {
      &self.text
    }
  }

  /// Replaces the displayed text until the next contribution recomputes it.
  pub fn set_query(&mut self, text: impl Into<String>) {
    self.text = text.into();
    self.events.publish(QueryEventKind::Overwritten {
      text: self.text.clone(),
    });
  }

  pub fn subscribe(&mut self, subscriber: impl FnMut(&QueryEvent) + 'static) -> SubscriptionId {
    self.events.subscribe(subscriber)
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    self.events.unsubscribe(id)
  }

  pub fn events_since(&self, seq: u64) -> Vec<QueryEvent> {
    self.events.events_since(seq)
  }

  pub fn latest_seq(&self) -> u64 {
    self.events.latest_seq()
  }
}
