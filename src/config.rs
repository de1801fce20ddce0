//! Configuration loader and schema types.
//!
//! This module exposes the settings schema and helpers to load it from
//! defaults, a TOML file and `MUSICFLOW__*` environment variables.

mod load;
mod schema;

pub use load::{CONFIG_PATH_ENV, default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;
