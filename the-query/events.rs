use std::{
  collections::VecDeque,
  fmt,
};

use serde::{
  Deserialize,
  Serialize,
};

use crate::clause::ClauseKind;

pub const DEFAULT_EVENT_LIMIT: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryEventKind {
  /// A contribution grew the clause store and the text was recomputed.
  Contributed {
    changed: Vec<ClauseKind>,
    text:    String,
  },
  /// The displayed text was replaced without touching the store.
  Overwritten { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvent {
  pub seq:  u64,
  #[serde(flatten)]
  pub kind: QueryEventKind,
}

impl QueryEvent {
  pub fn text(&self) -> &str {
    match &self.kind {
      QueryEventKind::Contributed { text, .. } | QueryEventKind::Overwritten { text } => text,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&QueryEvent)>;

/// Change notifications for the canonical query text.
///
/// Presentation code either subscribes a callback, invoked synchronously for
/// each event, or polls with [`QueryEvents::events_since`]. The retained log
/// is bounded; sequence numbers keep increasing past evicted events.
pub struct QueryEvents {
  events:          VecDeque<QueryEvent>,
  subscribers:     Vec<(SubscriptionId, Subscriber)>,
  next_event_seq:  u64,
  next_subscriber: u64,
  event_limit:     usize,
}

impl Default for QueryEvents {
  fn default() -> Self {
    Self::with_limit(DEFAULT_EVENT_LIMIT)
  }
}

impl fmt::Debug for QueryEvents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QueryEvents")
      .field("events", &self.events)
      .field("subscribers", &self.subscribers.len())
      .field("next_event_seq", &self.next_event_seq)
      .field("event_limit", &self.event_limit)
      .finish()
  }
}

impl QueryEvents {
  pub fn with_limit(event_limit: usize) -> Self {
    Self {
      events:          VecDeque::new(),
      subscribers:     Vec::new(),
      next_event_seq:  1,
      next_subscriber: 1,
      event_limit:     event_limit.max(1),
    }
  }

  pub fn subscribe(&mut self, subscriber: impl FnMut(&QueryEvent) + 'static) -> SubscriptionId {
    let id = SubscriptionId(self.next_subscriber);
    self.next_subscriber = self.next_subscriber.saturating_add(1);
    self.subscribers.push((id, Box::new(subscriber)));
    id
  }

  /// Returns false if `id` was not subscribed.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.subscribers.len();
    self.subscribers.retain(|(subscriber, _)| *subscriber != id);
    self.subscribers.len() != before
  }

  pub fn latest_seq(&self) -> u64 {
    self.next_event_seq.saturating_sub(1)
  }

  pub fn events_since(&self, seq: u64) -> Vec<QueryEvent> {
    self
      .events
      .iter()
      .filter(|event| event.seq > seq)
      .cloned()
      .collect()
  }

  pub fn publish(&mut self, kind: QueryEventKind) -> u64 {
    let event = QueryEvent {
      seq: self.next_event_seq,
      kind,
    };
    self.next_event_seq = self.next_event_seq.saturating_add(1);

    for (_, subscriber) in &mut self.subscribers {
      subscriber(&event);
    }

    let seq = event.seq;
    self.events.push_back(event);
    while self.events.len() > self.event_limit {
      self.events.pop_front();
    }
    seq
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::RefCell,
    rc::Rc,
  };

  use super::*;

  fn overwritten(text: &str) -> QueryEventKind {
    QueryEventKind::Overwritten {
      text: text.to_string(),
    }
  }

  #[test]
  fn publish_notifies_subscribers_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut events = QueryEvents::default();
    let sink = Rc::clone(&seen);
    events.subscribe(move |event| sink.borrow_mut().push(event.seq));

    events.publish(overwritten("a"));
    events.publish(overwritten("b"));

    assert_eq!(*seen.borrow(), [1, 2]);
    assert_eq!(events.latest_seq(), 2);
  }

  #[test]
  fn unsubscribed_callbacks_are_not_called() {
    let seen = Rc::new(RefCell::new(0));
    let mut events = QueryEvents::default();
    let sink = Rc::clone(&seen);
    let id = events.subscribe(move |_| *sink.borrow_mut() += 1);

    events.publish(overwritten("a"));
    assert!(events.unsubscribe(id));
    assert!(!events.unsubscribe(id));
    events.publish(overwritten("b"));

    assert_eq!(*seen.borrow(), 1);
  }

  #[test]
  fn event_limit_is_enforced() {
    let mut events = QueryEvents::with_limit(2);
    events.publish(overwritten("a"));
    events.publish(overwritten("b"));
    events.publish(overwritten("c"));

    let retained = events.events_since(0);
    assert_eq!(retained.len(), 2);
    assert_eq!(retained[0].seq, 2);
    assert_eq!(retained[1].text(), "c");
    assert!(events.events_since(3).is_empty());
  }

  #[test]
  fn events_serialize_with_flattened_kind() {
    let event = QueryEvent {
      seq:  7,
      kind: QueryEventKind::Contributed {
        changed: vec![ClauseKind::Select],
        text:    "select a\nfrom t;".to_string(),
      },
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["seq"], 7);
    assert_eq!(json["kind"], "contributed");
    assert_eq!(json["changed"][0], "select");
  }
}
