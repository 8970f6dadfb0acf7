//! Configuration file parsing for the AREA client
//!
//! Supports `<config_dir>/area/config.toml`, overridden by `AREA_API_URL` and
//! the `--api-url` flag.

pub mod settings;
pub mod types;

pub use settings::{
    apply_overrides, default_config_path, init_config, load_settings, API_URL_ENV_VAR,
};
pub use types::*;
