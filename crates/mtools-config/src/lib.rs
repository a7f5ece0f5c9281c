//! Configuration for custom library builds.
//!
//! [`MaterialToolsConfig::load`] layers serialized defaults, an optional
//! `mtools.toml` / `mtools.json` file, `MTOOLS_*` environment variables and
//! explicit [`ConfigOverrides`], in increasing priority.

pub mod config;
pub mod error;
pub mod loading;
mod validation;

pub use config::{
    DEFAULT_CACHE, DEFAULT_DESTINATION_FILENAME, DEFAULT_MAIN_FILENAME, MaterialToolsConfig,
};
pub use error::{ConfigError, Result};
pub use loading::{CONFIG_FILES, ConfigOverrides, ENV_PREFIX};
