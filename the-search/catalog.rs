//! Catalog of selectable fields.

use std::collections::HashSet;

use serde::{
  Deserialize,
  Serialize,
};
use the_query::Contribution;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to parse catalog: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("catalog field #{0} has an empty name")]
  EmptyName(usize),
  #[error("catalog field `{0}` is defined more than once")]
  DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A field the user can pick, and what picking it adds to the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
  pub name:         String,
  #[serde(default)]
  pub values:       Vec<String>,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub contribution: Contribution,
}

impl FieldDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  pub fn with_values<I, S>(mut self, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.values = values.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn with_contribution(mut self, contribution: Contribution) -> Self {
    self.contribution = contribution;
    self
  }

  /// Example values as one space separated string, the form they are
  /// searched in.
  pub fn combined_values(&self) -> String {
    self.values.join(" ")
  }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogRaw {
  #[serde(default)]
  fields: Vec<FieldDescriptor>,
}

/// Ordered, read-only list of fields with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRaw")]
pub struct Catalog {
  fields: Vec<FieldDescriptor>,
}

impl TryFrom<CatalogRaw> for Catalog {
  type Error = CatalogError;

  fn try_from(raw: CatalogRaw) -> Result<Self> {
    Catalog::new(raw.fields)
  }
}

impl Catalog {
  pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
      if field.name.trim().is_empty() {
        return Err(CatalogError::EmptyName(position));
      }
      if !seen.insert(field.name.as_str()) {
        return Err(CatalogError::DuplicateField(field.name.clone()));
      }
      if field.contribution.is_empty() {
        tracing::warn!(field = %field.name, "catalog field contributes nothing to the query");
      }
    }
    Ok(Self { fields })
  }

  pub fn from_toml(source: &str) -> Result<Self> {
    let raw: CatalogRaw = toml::from_str(source)?;
    raw.try_into()
  }

  /// The catalog shipped with the crate.
  pub fn builtin() -> Self {
    Self::from_toml(BUILTIN_CATALOG).expect("Could not deserialize built-in catalog.toml")
  }

  pub fn fields(&self) -> &[FieldDescriptor] {
    &self.fields
  }

  pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
    self.fields.get(index)
  }

  pub fn find(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
    self
      .fields
      .iter()
      .enumerate()
      .find(|(_, field)| field.name == name)
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
    self.fields.iter()
  }
}

#[cfg(test)]
mod tests {
  use the_query::ClauseKind;

  use super::*;

  #[test]
  fn builtin_catalog_parses() {
    let catalog = Catalog::builtin();
    let names: Vec<_> = catalog.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, ["group_id", "plan_type"]);

    let (index, plan_type) = catalog.find("plan_type").unwrap();
    assert_eq!(index, 1);
    assert_eq!(plan_type.combined_values(), "HMO PPO EPO POS");
    assert_eq!(
      plan_type.contribution.fragment(ClauseKind::Select),
      Some("plan_type")
    );
    assert_eq!(plan_type.contribution.fragment(ClauseKind::Where), None);
  }

  #[test]
  fn duplicate_names_are_rejected() {
    let err = Catalog::new(vec![FieldDescriptor::new("a"), FieldDescriptor::new("a")]).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateField(name) if name == "a"));
  }

  #[test]
  fn empty_names_are_rejected() {
    let err = Catalog::from_toml("[[fields]]\nname = \" \"\n").unwrap_err();
    assert!(matches!(err, CatalogError::EmptyName(0)));
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let err = Catalog::from_toml("[[fields]]\nname = \"a\"\ncolour = \"red\"\n").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
  }

  #[test]
  fn deserialize_validates() {
    #[derive(Deserialize)]
    struct Wrapper {
      catalog: Catalog,
    }

    let source = "[[catalog.fields]]\nname = \"a\"\n[[catalog.fields]]\nname = \"a\"\n";
    assert!(toml::from_str::<Wrapper>(source).is_err());

    let source = "[[catalog.fields]]\nname = \"a\"\ncontribution = { where = \"a > 1\" }\n";
    let wrapper: Wrapper = toml::from_str(source).unwrap();
    assert_eq!(wrapper.catalog.len(), 1);
  }
}
