//! Workbench configuration, read from TOML.
//!
//! Every section is optional; missing keys take the built-in defaults.
//!
//! ```toml
//! [query]
//! base-clause = "from table_name_1"
//!
//! [search]
//! max-results = 5
//! weights = { values = 0.4, name = 0.3, description = 0.3 }
//!
//! [highlight]
//! ranges = "normalize"
//!
//! [drag]
//! item-width = 100.0
//! item-height = 100.0
//! ```

use std::{
  fs,
  path::{
    Path,
    PathBuf,
  },
};

use serde::Deserialize;
use the_query::DEFAULT_EVENT_LIMIT;
use the_search::{
  Catalog,
  DEFAULT_MAX_RESULTS,
  RangePolicy,
  SearchWeights,
};
use the_zone::ItemSize;
use thiserror::Error;

pub const DEFAULT_BASE_CLAUSE: &str = "from table_name_1";
pub const DEFAULT_PLACEHOLDER: &str = "-- Your SQL query will appear here";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {}: {}", .path.display(), .source)]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("invalid config: {0}")]
  Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkbenchConfig {
  pub query:     QueryConfig,
  pub search:    SearchConfig,
  pub highlight: HighlightConfig,
  pub drag:      DragConfig,
  /// Replaces the built-in catalog when present.
  pub catalog:   Option<Catalog>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct QueryConfig {
  pub base_clause:   String,
  /// Fixed clause emitted after `where`; empty for none.
  pub order_by:      String,
  /// Text shown before anything has been contributed.
  pub initial_query: String,
  /// Text shown while the query text is empty.
  pub placeholder:   String,
  pub event_limit:   usize,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      base_clause:   DEFAULT_BASE_CLAUSE.to_string(),
      order_by:      String::new(),
      initial_query: String::new(),
      placeholder:   DEFAULT_PLACEHOLDER.to_string(),
      event_limit:   DEFAULT_EVENT_LIMIT,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SearchConfig {
  pub max_results: usize,
  pub weights:     SearchWeights,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      max_results: DEFAULT_MAX_RESULTS,
      weights:     SearchWeights::default(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HighlightConfig {
  pub ranges: RangePolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DragConfig {
  pub item_width:  f32,
  pub item_height: f32,
}

impl Default for DragConfig {
  fn default() -> Self {
    let item = ItemSize::default();
    Self {
      item_width:  item.width,
      item_height: item.height,
    }
  }
}

impl DragConfig {
  pub fn item_size(&self) -> ItemSize {
    ItemSize {
      width:  self.item_width,
      height: self.item_height,
    }
  }
}

impl WorkbenchConfig {
  pub fn from_toml(source: &str) -> Result<Self> {
    let config: WorkbenchConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;
    tracing::debug!(path = %path.display(), "loading workbench config");
    Self::from_toml(&source)
  }

  pub fn validate(&self) -> Result<()> {
    if self.search.max_results == 0 {
      return Err(ConfigError::Invalid(
        "search.max-results must be at least 1".to_string(),
      ));
    }
    if self.query.event_limit == 0 {
      return Err(ConfigError::Invalid(
        "query.event-limit must be at least 1".to_string(),
      ));
    }
    for (key, value) in [
      ("drag.item-width", self.drag.item_width),
      ("drag.item-height", self.drag.item_height),
    ] {
      if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::Invalid(format!(
          "{key} must be a positive number, got {value}"
        )));
      }
    }
    let weights = self.search.weights;
    for (key, value) in [
      ("values", weights.values),
      ("name", weights.name),
      ("description", weights.description),
    ] {
      if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::Invalid(format!(
          "search.weights.{key} must be a non-negative number, got {value}"
        )));
      }
    }
    Ok(())
  }

  /// The configured catalog, or the built-in one.
  pub fn catalog(&self) -> Catalog {
    self.catalog.clone().unwrap_or_else(Catalog::builtin)
  }
}
