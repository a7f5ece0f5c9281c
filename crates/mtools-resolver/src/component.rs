//! Components captured from the library's module registrations.

use mtools_sandbox::LibraryConventions;
use serde::{Deserialize, Serialize};

/// Suffix after the last `.` of a raw registration name.
///
/// `material.components.list` becomes `list`; names without a dot are returned
/// unchanged.
pub fn clean_name(raw_name: &str) -> &str {
    match raw_name.rfind('.') {
        Some(index) => &raw_name[index + 1..],
        None => raw_name,
    }
}

/// A library module declared through `angular.module(name, requires)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub raw_name: String,
    pub clean_name: String,
    /// In-library dependencies, by clean name, in declaration order.
    pub dependencies: Vec<String>,
}

impl Component {
    /// Builds a component from a registration, keeping only in-library
    /// dependencies.
    pub fn from_registration(raw_name: &str, requires: &[String], conventions: &LibraryConventions) -> Self {
        let dependencies = requires
            .iter()
            .filter(|name| conventions.is_library_module(name))
            .map(|name| clean_name(name).to_string())
            .collect();

        Self {
            raw_name: raw_name.to_string(),
            clean_name: clean_name(raw_name).to_string(),
            dependencies,
        }
    }
}

/// The library's aggregate module and the dependencies a custom build of it
/// must declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainModule {
    pub raw_name: String,
    /// External dependencies first, followed by the raw names of every
    /// resolved component. Never contains duplicates.
    pub dependencies: Vec<String>,
}

impl MainModule {
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Appends `name` unless it is already present. Returns whether it was added.
    pub fn push_unique(&mut self, name: &str) -> bool {
        if self.dependencies.iter().any(|existing| existing == name) {
            return false;
        }
        self.dependencies.push(name.to_string());
        true
    }

    /// Records the main module's own declaration, keeping only dependencies
    /// from outside the library.
    pub fn set_external(&mut self, requires: &[String], conventions: &LibraryConventions) {
        self.dependencies.clear();
        for name in requires {
            if !conventions.is_library_module(name) {
                self.push_unique(name);
            }
        }
    }
}

impl Default for MainModule {
    fn default() -> Self {
        Self::new(LibraryConventions::default().main_module)
    }
}
