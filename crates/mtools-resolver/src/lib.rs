//! Resolution of custom library builds.
//!
//! The component graph is read from the library itself: [`DependencyResolver`]
//! executes the library entry inside a sandbox and records every module
//! registration, then [`DependencyGraph::resolve`] computes the transitive
//! closure of the requested components. [`PackageResolver`] and
//! [`FileResolver`] locate the version's directories and the source files of
//! the resolved components, and [`BuildData`] ties the three together.

pub mod build;
pub mod component;
pub mod dependency;
pub mod error;
pub mod files;
pub mod graph;
pub mod package;
pub mod version;

pub use build::{BuildData, BuildRequest};
pub use component::{Component, MainModule, clean_name};
pub use dependency::DependencyResolver;
pub use error::{ResolveError, Result};
pub use files::{FileResolver, ResolvedFileSet};
pub use graph::{DependencyGraph, ResolvedDependencies};
pub use package::{BuildLayout, MaterialPackage, PackageResolver, LOCAL_VERSION, PACKAGE_NAME};
pub use version::{is_unsupported, version_number};
