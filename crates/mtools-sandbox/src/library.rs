//! Booting the target library inside a fresh realm.
//!
//! The framework (`angular`) is loaded from the entry's `node_modules` chain
//! when it can be resolved; otherwise a bare framework object is installed.
//! Either way its registration API is replaced by a [`FrameworkShim`] before the
//! library entry runs, so the library's own initialization code executes
//! unmodified against the interceptor.

use std::path::{Path, PathBuf};

use boa_engine::{object::ObjectInitializer, JsObject, JsString, JsValue};

use crate::error::{Result, SandboxError};
use crate::intercept::{FrameworkShim, Interceptor};
use crate::loader::RunOptions;
use crate::realm::{RealmConfig, SandboxRealm};

/// Naming conventions of the target library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConventions {
    /// Package that provides the framework runtime.
    pub framework_package: String,
    /// Global the framework installs itself under.
    pub framework_global: String,
    /// Marker contained in every in-library module name.
    pub namespace: String,
    /// Raw name of the library's aggregate module.
    pub main_module: String,
}

impl Default for LibraryConventions {
    fn default() -> Self {
        Self {
            framework_package: "angular".to_string(),
            framework_global: "angular".to_string(),
            namespace: "material.".to_string(),
            main_module: "ngMaterial".to_string(),
        }
    }
}

impl LibraryConventions {
    /// Whether a raw registration name belongs to the library.
    pub fn is_library_module(&self, raw_name: &str) -> bool {
        raw_name.contains(&self.namespace)
    }
}

/// A realm in which the library entry has been executed.
#[derive(Debug)]
pub struct LibraryHost {
    realm: SandboxRealm,
    shim: FrameworkShim,
    entry: PathBuf,
    exports: JsValue,
}

impl LibraryHost {
    /// Creates a realm, installs `interceptor` on the framework and runs `entry`.
    pub fn boot(
        entry: &Path,
        conventions: &LibraryConventions,
        interceptor: impl Interceptor + 'static,
    ) -> Result<Self> {
        // A relative entry is a path from the working directory, not a package name.
        let entry = std::path::absolute(entry).map_err(|source| SandboxError::Io {
            path: entry.to_path_buf(),
            source,
        })?;
        let entry = entry.as_path();
        let base_dir = entry.parent().unwrap_or(Path::new("/")).to_path_buf();
        let mut realm = SandboxRealm::new(RealmConfig::new().base_dir(&base_dir))?;

        let framework = load_framework(&mut realm, &base_dir, conventions)?;
        let shim = FrameworkShim::new(interceptor);
        shim.install(&framework, realm.context())?;

        tracing::debug!("running library entry {}", entry.display());
        let exports = realm.run(entry, RunOptions::strict())?;

        Ok(Self {
            realm,
            shim,
            entry: entry.to_path_buf(),
            exports,
        })
    }

    pub fn realm(&mut self) -> &mut SandboxRealm {
        &mut self.realm
    }

    pub fn shim(&self) -> &FrameworkShim {
        &self.shim
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn exports(&self) -> &JsValue {
        &self.exports
    }

    /// Injectable registered by the library under `key`.
    pub fn injectable(&self, key: &str) -> Option<JsValue> {
        self.shim.injectable(key)
    }
}

fn load_framework(
    realm: &mut SandboxRealm,
    base_dir: &Path,
    conventions: &LibraryConventions,
) -> Result<JsObject> {
    let resolved = realm.loader().resolve(&conventions.framework_package, base_dir);
    match resolved {
        Ok(path) => {
            tracing::debug!("loading framework from {}", path.display());
            realm.run(&path, RunOptions::default())?;
        }
        Err(err) => {
            tracing::debug!("framework not resolvable, installing a bare object: {err}");
        }
    }

    let existing = realm.global(&conventions.framework_global)?;
    if let Some(framework) = existing.as_object() {
        return Ok(framework.clone());
    }
    if !existing.is_undefined() {
        return Err(SandboxError::MissingFramework(conventions.framework_global.clone()));
    }

    let framework = ObjectInitializer::new(realm.context()).build();
    let globals = realm.globals();
    globals.set(
        JsString::from(conventions.framework_global.as_str()),
        framework.clone(),
        false,
        realm.context(),
    )?;
    Ok(framework)
}
