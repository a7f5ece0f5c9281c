//! Everything a custom build needs, gathered in one pass.

use std::path::PathBuf;

use serde::Serialize;

use crate::dependency::DependencyResolver;
use crate::error::Result;
use crate::files::{FileResolver, ResolvedFileSet};
use crate::graph::ResolvedDependencies;
use crate::package::{LOCAL_VERSION, MaterialPackage, PackageResolver};

/// Inputs of [`BuildData::collect`].
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub version: String,
    pub cache: PathBuf,
    /// Requested components by clean name. Empty selects all of them.
    pub modules: Vec<String>,
    pub exclude_modules: Vec<String>,
    /// Library file inside the package's module directory that is executed
    /// to capture registrations.
    pub main_filename: String,
    pub main_module: Option<String>,
    /// Directory the locally installed package is resolved from.
    pub working_dir: PathBuf,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            version: LOCAL_VERSION.to_string(),
            cache: PathBuf::from("./.material-cache/"),
            modules: Vec::new(),
            exclude_modules: Vec::new(),
            main_filename: "angular-material.js".to_string(),
            main_module: None,
            working_dir: PathBuf::from("."),
        }
    }
}

/// Resolved package, component closure and file set.
#[derive(Debug, Clone, Serialize)]
pub struct BuildData {
    pub package: MaterialPackage,
    pub dependencies: ResolvedDependencies,
    pub files: ResolvedFileSet,
}

impl BuildData {
    /// Resolves the package, computes the component closure, applies
    /// exclusions and collects the files of the remaining components.
    pub async fn collect(request: &BuildRequest) -> Result<Self> {
        let package = PackageResolver::new(&request.working_dir).resolve(&request.version, &request.cache)?;

        let entry = package.module.join(&request.main_filename);
        let mut dependencies = DependencyResolver::new().resolve(
            &entry,
            &request.modules,
            request.main_module.as_deref(),
        )?;
        dependencies.exclude(&request.exclude_modules);

        let files = FileResolver::resolve(dependencies.flat(), &package).await?;

        Ok(Self {
            package,
            dependencies,
            files,
        })
    }
}
