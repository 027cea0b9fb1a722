//! Searching the catalog.
//!
//! [`FieldSearch`] is the seam between the workbench and whatever ranks
//! catalog fields for a free-text query. [`FuzzySearch`] is the default
//! implementation: each field is matched on its combined example values, its
//! name and its description, attribute scores are weighted and summed, and
//! the best [`DEFAULT_MAX_RESULTS`] fields are returned.

use std::borrow::Cow;

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  catalog::{
    Catalog,
    FieldDescriptor,
  },
  fuzzy::{
    FuzzyQuery,
    fuzzy_match,
  },
  highlight::{
    MatchRange,
    RangePolicy,
    Segment,
    highlight_with,
  },
};

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchAttribute {
  Values,
  Name,
  Description,
}

impl MatchAttribute {
  pub const ALL: [MatchAttribute; 3] = [
    MatchAttribute::Values,
    MatchAttribute::Name,
    MatchAttribute::Description,
  ];

  pub fn label(self) -> &'static str {
    match self {
      MatchAttribute::Values => "Field Values",
      MatchAttribute::Name => "name",
      MatchAttribute::Description => "Field Desc",
    }
  }

  /// Name matches are not listed as rows; the field name heads every result.
  pub fn is_row(self) -> bool {
    self != MatchAttribute::Name
  }

  pub fn text(self, field: &FieldDescriptor) -> Cow<'_, str> {
    match self {
      MatchAttribute::Values => Cow::Owned(field.combined_values()),
      MatchAttribute::Name => Cow::Borrowed(&field.name),
      MatchAttribute::Description => Cow::Borrowed(&field.description),
    }
  }
}

/// Per-attribute weights applied to matcher scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchWeights {
  pub values:      f32,
  pub name:        f32,
  pub description: f32,
}

impl Default for SearchWeights {
  fn default() -> Self {
    Self {
      values:      0.4,
      name:        0.3,
      description: 0.3,
    }
  }
}

impl SearchWeights {
  pub fn weight(&self, attribute: MatchAttribute) -> f32 {
    match attribute {
      MatchAttribute::Values => self.values,
      MatchAttribute::Name => self.name,
      MatchAttribute::Description => self.description,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatch {
  pub attribute: MatchAttribute,
  pub value:     String,
  pub ranges:    Vec<MatchRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
  /// Position of the field in the searched catalog.
  pub field_index: usize,
  pub score:       f32,
  pub matches:     Vec<AttributeMatch>,
}

/// One highlighted line of a rendered search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedRow<'a> {
  pub label:    &'static str,
  pub segments: Vec<Segment<'a>>,
}

impl SearchHit {
  pub fn field<'c>(&self, catalog: &'c Catalog) -> Option<&'c FieldDescriptor> {
    catalog.get(self.field_index)
  }

  pub fn matched(&self, attribute: MatchAttribute) -> Option<&AttributeMatch> {
    self
      .matches
      .iter()
      .find(|matched| matched.attribute == attribute)
  }

  /// Rows to display under the field name, in match order.
  pub fn rows(&self, policy: RangePolicy) -> Vec<HighlightedRow<'_>> {
    self
      .matches
      .iter()
      .filter(|matched| matched.attribute.is_row())
      .map(|matched| HighlightedRow {
        label:    matched.attribute.label(),
        segments: highlight_with(&matched.value, &matched.ranges, policy),
      })
      .collect()
  }
}

/// Ranks catalog fields for a free-text query.
pub trait FieldSearch {
  fn search(&mut self, catalog: &Catalog, query: &str) -> Vec<SearchHit>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzySearch {
  weights:     SearchWeights,
  max_results: usize,
}

impl Default for FuzzySearch {
  fn default() -> Self {
    Self::new(SearchWeights::default(), DEFAULT_MAX_RESULTS)
  }
}

impl FuzzySearch {
  pub fn new(weights: SearchWeights, max_results: usize) -> Self {
    Self {
      weights,
      max_results,
    }
  }

  pub fn weights(&self) -> SearchWeights {
    self.weights
  }

  pub fn max_results(&self) -> usize {
    self.max_results
  }

  fn match_field(
    &self,
    query: &FuzzyQuery,
    field_index: usize,
    field: &FieldDescriptor,
  ) -> Option<SearchHit> {
    let mut score = 0.0;
    let mut matches = Vec::new();
    for attribute in MatchAttribute::ALL {
      let value = attribute.text(field);
      let Some(found) = fuzzy_match(query, &value) else {
        continue;
      };
      score += self.weights.weight(attribute) * found.score as f32;
      matches.push(AttributeMatch {
        attribute,
        value: value.into_owned(),
        ranges: found.ranges,
      });
    }

    (!matches.is_empty()).then_some(SearchHit {
      field_index,
      score,
      matches,
    })
  }
}

impl FieldSearch for FuzzySearch {
  fn search(&mut self, catalog: &Catalog, query: &str) -> Vec<SearchHit> {
    let query = FuzzyQuery::parse(query);
    if query.is_empty() {
      return Vec::new();
    }

    let mut hits: Vec<SearchHit> = catalog
      .iter()
      .enumerate()
      .filter_map(|(index, field)| self.match_field(&query, index, field))
      .collect();
    hits.sort_by(|left, right| {
      right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.field_index.cmp(&right.field_index))
    });
    hits.truncate(self.max_results);

    tracing::debug!(hits = hits.len(), "catalog search finished");
    hits
  }
}
