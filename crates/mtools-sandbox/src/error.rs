//! Error types for realm construction and sandboxed module loading.

use std::path::PathBuf;

use boa_engine::JsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SandboxError>;

#[derive(Debug, Error)]
pub enum SandboxError {
    /// A `require` specifier could not be mapped to a file.
    #[error("cannot resolve module '{specifier}' from {}: {reason}", .from.display())]
    Resolution {
        specifier: String,
        from: PathBuf,
        reason: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON module {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file's own code failed to parse or threw while executing.
    #[error("evaluation of {} failed: {message}", .path.display())]
    Evaluation { path: PathBuf, message: String },

    /// Engine failure outside of a module body (setup, host calls into the realm).
    #[error("sandbox script error: {0}")]
    Script(String),

    #[error("framework global '{0}' is not an object")]
    MissingFramework(String),
}

impl SandboxError {
    pub(crate) fn evaluation(path: impl Into<PathBuf>, error: &JsError) -> Self {
        Self::Evaluation {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

impl From<JsError> for SandboxError {
    fn from(error: JsError) -> Self {
        Self::Script(error.to_string())
    }
}
