//! Canonical query text.
//!
//! [`serialize`] is a pure function of a [`ClauseSnapshot`]: identical
//! snapshots always render to byte-identical text. No grammar checking is
//! performed; fragments are concatenated exactly as contributed.
//!
//! Layout, one clause block per line:
//!
//! ```text
//! select <s1>, <s2>, ...
//! <base clause>
//! <join 1>
//! <join 2>
//! where <w1> and <w2> and ...
//! <order by clause>
//! ```
//!
//! Blocks without content are dropped and a single `;` terminates the text.
//! An empty select category still emits its `select ` line.

use crate::clause::ClauseSnapshot;

const SELECT_SEPARATOR: &str = ", ";
const WHERE_CONNECTOR: &str = " and ";

pub fn serialize(snapshot: &ClauseSnapshot) -> String {
  let select = format!("select {}", snapshot.select.join(SELECT_SEPARATOR));
  let filter = if snapshot.filter.is_empty() {
    String::new()
  } else {
    format!("where {}", snapshot.filter.join(WHERE_CONNECTOR))
  };

  let lines = std::iter::once(select.as_str())
    .chain(std::iter::once(snapshot.base.as_str()))
    .chain(snapshot.join.iter().map(String::as_str))
    .chain(std::iter::once(filter.as_str()))
    .chain(snapshot.order_by.as_deref())
    .filter(|line| !line.trim().is_empty());

  let mut text = String::new();
  for (i, line) in lines.enumerate() {
    if i > 0 {
      text.push('\n');
    }
    text.push_str(line);
  }
  text.push(';');
  text
}

impl crate::clause::ClauseStore {
  /// Renders the current contents, see [`serialize`].
  pub fn to_query(&self) -> String {
    serialize(&self.snapshot())
  }
}
