use std::path::PathBuf;

use boa_engine::JsError;
use mtools_sandbox::SandboxError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("library entry not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    /// The library did not register a value the builder depends on.
    #[error("the library does not register '{0}'")]
    MissingInjectable(&'static str),

    #[error("the library has no '{0}' run block")]
    GeneratorNotFound(&'static str),

    #[error("palette '{palette}' extends unknown palette '{base}'")]
    UnknownPalette { palette: String, base: String },

    #[error("palette '{palette}' is missing swatches: {}", .missing.join(", "))]
    IncompletePalette { palette: String, missing: Vec<String> },

    #[error("palette '{palette}' defines unknown swatch '{swatch}'")]
    UnknownSwatch { palette: String, swatch: String },

    #[error("theme '{theme}': {reason}")]
    InvalidTheme { theme: String, reason: String },

    /// The theming service threw while configuring or generating.
    #[error("theming library error: {0}")]
    Script(String),
}

impl From<JsError> for ThemeError {
    fn from(error: JsError) -> Self {
        Self::Script(error.to_string())
    }
}
