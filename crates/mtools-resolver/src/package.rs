//! Locating the directories of a library version.
//!
//! A version lives in the cache as `<cache>/<version>/module` (the published
//! package) and `<cache>/<version>/source` (the source repository). The special
//! version `local` refers to the package installed next to the working
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use oxc_resolver::{ResolveOptions, Resolver};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::version;

/// Version name selecting the locally installed package.
pub const LOCAL_VERSION: &str = "local";

/// npm name of the library package.
pub const PACKAGE_NAME: &str = "angular-material";

/// How a version's published package is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildLayout {
    /// Per-component theme stylesheets ship precompiled under `modules/js`.
    Modern,
    /// Themes and styles only exist as SCSS in the source tree.
    Legacy,
}

/// Directories of one resolved library version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialPackage {
    pub root: PathBuf,
    pub module: PathBuf,
    pub source: Option<PathBuf>,
    pub version: String,
    pub layout: BuildLayout,
}

impl MaterialPackage {
    /// Inspects `module` to determine the layout.
    pub fn new(root: PathBuf, module: PathBuf, source: Option<PathBuf>, version: String) -> Self {
        let layout = detect_layout(&module);
        Self {
            root,
            module,
            source,
            version,
            layout,
        }
    }

    /// `module/modules/js`, where per-component files are published.
    pub fn js_modules(&self) -> PathBuf {
        self.module.join("modules").join("js")
    }

    pub fn layout_modules(&self) -> PathBuf {
        self.module.join("modules").join("layouts")
    }

    /// `source/src`, when the version ships a source tree.
    pub fn source_root(&self) -> Option<PathBuf> {
        self.source.as_ref().map(|source| source.join("src"))
    }
}

#[derive(Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// Finds the directories for a requested version.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    working_dir: PathBuf,
}

impl PackageResolver {
    /// `working_dir` is where the locally installed package is looked up from.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn resolve(&self, version: &str, cache_root: &Path) -> Result<MaterialPackage> {
        let local = if version == LOCAL_VERSION {
            Some(self.local_package()?)
        } else {
            None
        };
        let version = match &local {
            Some((_, local_version)) => local_version.clone(),
            None => version.to_string(),
        };

        if version::is_unsupported(&version) {
            tracing::warn!(
                "Loading an unsupported version ({version}). Only >= v1.0.0 versions are fully supported."
            );
        }

        let cached = cache_root.join(&version);
        if cached.is_dir() {
            tracing::info!("Using version {version} from cache.");
            let module = cached.join("module");
            let source = Some(cached.join("source")).filter(|source| source.is_dir());
            return Ok(MaterialPackage::new(cached, module, source, version));
        }

        match local {
            Some((dir, _)) => {
                tracing::info!("Using locally installed version {version}.");
                Ok(MaterialPackage::new(dir.clone(), dir, None, version))
            }
            None => Err(ResolveError::VersionNotCached {
                version,
                path: cached,
            }),
        }
    }

    /// Directory and version of the package installed for the working directory.
    pub fn local_package(&self) -> Result<(PathBuf, String)> {
        let resolver = Resolver::new(ResolveOptions {
            condition_names: vec!["require".into(), "node".into(), "default".into()],
            ..Default::default()
        });
        let resolution = resolver
            .resolve(&self.working_dir, PACKAGE_NAME)
            .map_err(|err| ResolveError::LocalPackage {
                package: PACKAGE_NAME.to_string(),
                reason: err.to_string(),
            })?;

        let dir = resolution
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.working_dir.clone());
        let manifest_path = dir.join("package.json");
        let manifest = fs::read_to_string(&manifest_path).map_err(|source| ResolveError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: PackageManifest =
            serde_json::from_str(&manifest).map_err(|source| ResolveError::Manifest {
                path: manifest_path.clone(),
                source,
            })?;
        let version = manifest
            .version
            .ok_or(ResolveError::MissingVersion(manifest_path))?;

        Ok((dir, version))
    }
}

/// `Modern` when `modules/js` holds precompiled `*-theme.css` files.
pub fn detect_layout(module: &Path) -> BuildLayout {
    let js_modules = module.join("modules").join("js");
    let has_theme_css = walkdir::WalkDir::new(js_modules)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .ends_with("-theme.css")
        });

    if has_theme_css {
        BuildLayout::Modern
    } else {
        BuildLayout::Legacy
    }
}
