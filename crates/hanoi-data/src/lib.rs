//! Configuration loading for the Hanoi simulation.
//!
//! Reads `hanoi.ron`, `hanoi.toml` or `hanoi.json` and produces a validated
//! [`hanoi_core::config::SimConfig`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_config, load_config_file, load_config_or_default};
pub use schema::{ConfigData, UnrepresentableValue};
