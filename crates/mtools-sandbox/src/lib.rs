//! Isolated JavaScript execution for harvesting data from a UI library's own code.
//!
//! The library assumes a browser and a framework runtime. This crate provides a
//! [`SandboxRealm`]: a fresh engine context whose global object mimics the
//! minimal browser surface the library touches, plus a CommonJS loader that keeps
//! every nested `require` inside the realm. [`LibraryHost`] boots the library in
//! such a realm with its module registration API routed through an
//! [`Interceptor`].
//!
//! ```no_run
//! use mtools_sandbox::{RealmConfig, RunOptions, SandboxRealm};
//!
//! let mut realm = SandboxRealm::new(RealmConfig::new().base_dir("/srv/lib"))?;
//! let exports = realm.run("./index.js", RunOptions::strict())?;
//! # let _ = exports;
//! # Ok::<(), mtools_sandbox::SandboxError>(())
//! ```

mod browser;
pub mod error;
mod globals;
pub mod intercept;
pub mod library;
pub mod loader;
mod realm;
pub mod value;

pub use boa_engine::{Context, JsObject, JsResult, JsValue};
pub use browser::BrowserDocument;
pub use error::{Result, SandboxError};
pub use globals::GlobalOverrides;
pub use intercept::{FrameworkShim, HookKind, InterceptedCall, Interceptor, ModuleMethod, NoopInterceptor};
pub use library::{LibraryConventions, LibraryHost};
pub use loader::{ModuleLoader, RunOptions};
pub use realm::{RealmConfig, SandboxRealm};
