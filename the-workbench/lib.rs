//! Query workbench.
//!
//! Ties the pieces of a query-building surface together: a catalog and its
//! search, the clause store and its canonical text, and the drop zones that
//! turn drags into contributions. This crate holds policy only; rendering and
//! layout stay with the host.

pub mod config;
mod workbench;

pub use config::{
  ConfigError,
  WorkbenchConfig,
};
pub use workbench::{
  Result,
  Workbench,
  WorkbenchError,
};
