//! Error handling for the `mtools` CLI.
//!
//! Library errors convert into [`CliError`] via `#[from]`; `main` renders the
//! result as a miette report with a hint where one helps.

use std::path::PathBuf;

use mtools_config::ConfigError;
use mtools_resolver::ResolveError;
use mtools_theme::ThemeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Extension for attaching the offending path to I/O errors.
pub trait ResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| CliError::Io {
            path: path.into(),
            source,
        })
    }
}

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Resolve(ResolveError::VersionNotCached { version, path }) => miette::miette!(
            "Version {version} is not available at {}\n\nHint: Download it into the cache or use --material-version local",
            path.display()
        ),
        CliError::Resolve(ResolveError::LocalPackage { package, reason }) => miette::miette!(
            "The package {package} is not installed: {reason}\n\nHint: Install it with npm or select a cached version"
        ),
        CliError::Config(ConfigError::NotFound(path)) => miette::miette!(
            "Config file not found: {}\n\nHint: Create an mtools.toml file or fix the --config path",
            path.display()
        ),
        CliError::Config(ConfigError::MissingField { field, hint }) if field == "destination" => miette::miette!(
            "{hint}\n\nHint: Pass --destination or set destination in mtools.toml"
        ),
        CliError::Theme(ThemeError::GeneratorNotFound(name)) => miette::miette!(
            "The library has no '{name}' run block\n\nHint: Static themes need a library version with a theming service"
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_name_the_path() {
        let err = std::fs::read_to_string("/definitely/missing.css")
            .with_path("/definitely/missing.css")
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/missing.css"));
    }

    #[test]
    fn test_uncached_version_hint() {
        let err = CliError::from(ResolveError::VersionNotCached {
            version: "1.1.0".to_string(),
            path: PathBuf::from("cache/1.1.0"),
        });
        let report = cli_error_to_miette(err);
        assert!(report.to_string().contains("--material-version local"));
    }
}
