use std::path::{Path, PathBuf};

use boa_engine::{Context, JsObject, JsString, JsValue, Source};

use crate::browser::BrowserDocument;
use crate::error::{Result, SandboxError};
use crate::globals::{self, GlobalOverrides};
use crate::loader::{ModuleLoader, RunOptions};

/// Construction parameters for a [`SandboxRealm`].
#[derive(Debug, Clone, Default)]
pub struct RealmConfig {
    base_dir: Option<PathBuf>,
    globals: GlobalOverrides,
}

impl RealmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that top-level specifiers passed to [`SandboxRealm::run`] are
    /// resolved against. Defaults to the current working directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Adds or overrides a global, applied after the browser surface.
    pub fn global(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }
}

/// An isolated JavaScript execution context with a mocked browser surface.
///
/// A realm is created per resolver or builder invocation and discarded once the
/// extraction completes. It is deliberately `!Send`: evaluation is synchronous
/// and single threaded.
pub struct SandboxRealm {
    context: Context,
    loader: ModuleLoader,
    document: BrowserDocument,
}

impl std::fmt::Debug for SandboxRealm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxRealm")
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl SandboxRealm {
    pub fn new(config: RealmConfig) -> Result<Self> {
        let base_dir = match config.base_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|source| SandboxError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };

        let mut context = Context::default();
        let document = BrowserDocument::install(&mut context)?;
        globals::apply_overrides(&config.globals, &mut context)?;

        tracing::debug!("created sandbox realm rooted at {}", base_dir.display());

        Ok(Self {
            context,
            loader: ModuleLoader::new(base_dir),
            document,
        })
    }

    /// Runs a file inside the realm and returns its `module.exports`.
    pub fn run(&mut self, file: impl AsRef<Path>, options: RunOptions) -> Result<JsValue> {
        let specifier = file.as_ref().to_string_lossy().into_owned();
        self.loader.run(&specifier, options, &mut self.context)
    }

    /// Evaluates a script directly on the global scope.
    pub fn eval(&mut self, code: &str) -> Result<JsValue> {
        Ok(self.context.eval(Source::from_bytes(code))?)
    }

    /// The mocked root object (`window`).
    pub fn globals(&self) -> JsObject {
        self.context.global_object()
    }

    pub fn global(&mut self, name: &str) -> Result<JsValue> {
        let global = self.context.global_object();
        Ok(global.get(JsString::from(name), &mut self.context)?)
    }

    pub fn set_global(&mut self, name: &str, value: impl Into<JsValue>) -> Result<()> {
        let global = self.context.global_object();
        global.set(JsString::from(name), value, false, &mut self.context)?;
        Ok(())
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    pub fn document(&self) -> &BrowserDocument {
        &self.document
    }

    pub fn context(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Number of nodes appended under `document.head`.
    pub fn head_len(&mut self) -> Result<usize> {
        Ok(self.document.head_len(&mut self.context)?)
    }

    /// Text content of each node under `document.head`, in insertion order.
    pub fn head_texts(&mut self) -> Result<Vec<String>> {
        Ok(self.document.head_texts(&mut self.context)?)
    }
}

impl Drop for SandboxRealm {
    fn drop(&mut self) {
        self.loader.clear_cache();
    }
}
