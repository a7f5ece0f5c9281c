//! Error types for dependency, package and file resolution.

use std::path::PathBuf;

use mtools_sandbox::SandboxError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("library entry not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    /// The requested version has no directory in the local cache.
    #[error("version {version} is not cached at {}", .path.display())]
    VersionNotCached { version: String, path: PathBuf },

    #[error("no locally installed '{package}' package: {reason}")]
    LocalPackage { package: String, reason: String },

    #[error("invalid package manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("package manifest {} has no version", .0.display())]
    MissingVersion(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required file category matched nothing.
    #[error("could not find {category} files for [{}] in {}", .modules.join(", "), .dir.display())]
    MissingFiles {
        category: &'static str,
        modules: Vec<String>,
        dir: PathBuf,
    },

    #[error("file discovery task failed: {0}")]
    Task(String),
}
