//! The captured component graph and its transitive closure.
//!
//! A [`DependencyGraph`] is what one sandboxed run of the library yields: every
//! in-library component in registration order plus the main module record.
//! [`DependencyGraph::resolve`] walks it from a set of requested names and
//! produces the [`ResolvedDependencies`] a custom build is assembled from.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::component::{Component, MainModule};

/// Components keyed by clean name, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    components: IndexMap<String, Component>,
    main_module: MainModule,
}

impl DependencyGraph {
    pub fn new(main_module: MainModule) -> Self {
        Self {
            components: IndexMap::new(),
            main_module,
        }
    }

    /// Adds a component. A later registration under the same clean name
    /// replaces the earlier one but keeps its position.
    pub fn insert(&mut self, component: Component) {
        self.components.insert(component.clean_name.clone(), component);
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Clean names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn main_module(&self) -> &MainModule {
        &self.main_module
    }

    pub fn main_module_mut(&mut self) -> &mut MainModule {
        &mut self.main_module
    }

    /// Computes the transitive closure of `requested`.
    ///
    /// An empty request walks every captured component, taken in registration
    /// order, so the result is a dependency-first preorder over registration
    /// order rather than registration order itself. Traversal is a preorder
    /// depth-first walk: a component is recorded when first reached, then its
    /// dependencies are visited in declaration order. Names the library does not define are reported once and dropped,
    /// both from the traversal and from the dependency lists that mention them.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> ResolvedDependencies {
        let roots: Vec<&str> = if requested.is_empty() {
            self.names().collect()
        } else {
            requested.iter().map(AsRef::as_ref).collect()
        };

        let mut resolved = ResolvedDependencies {
            flat: Vec::new(),
            dependencies: IndexMap::new(),
            main_module: self.main_module.clone(),
        };
        let mut warned: FxHashSet<&str> = FxHashSet::default();

        for root in roots {
            let mut stack = vec![root];
            while let Some(name) = stack.pop() {
                if resolved.dependencies.contains_key(name) {
                    continue;
                }
                let Some(component) = self.components.get(name) else {
                    if warned.insert(name) {
                        tracing::warn!("Module \"{name}\" does not exist and will be skipped.");
                    }
                    continue;
                };

                let known: Vec<String> = component
                    .dependencies
                    .iter()
                    .filter(|dependency| self.contains(dependency))
                    .cloned()
                    .collect();

                resolved.flat.push(name.to_string());
                resolved.main_module.push_unique(&component.raw_name);

                // Reverse push keeps declaration order on pop.
                stack.extend(component.dependencies.iter().rev().map(String::as_str));
                resolved.dependencies.insert(name.to_string(), known);
            }
        }

        resolved
    }
}

/// Result of a dependency resolution.
///
/// Serializes to the map shape downstream build steps consume:
/// `{ "_flat": [...], "_mainModule": { "rawName", "dependencies" }, "<name>": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencies {
    flat: Vec<String>,
    dependencies: IndexMap<String, Vec<String>>,
    main_module: MainModule,
}

impl ResolvedDependencies {
    /// Every resolved clean name once, in first-visit order.
    pub fn flat(&self) -> &[String] {
        &self.flat
    }

    /// Direct dependencies of a resolved component.
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.dependencies.get(name).map(Vec::as_slice)
    }

    pub fn dependencies(&self) -> &IndexMap<String, Vec<String>> {
        &self.dependencies
    }

    pub fn main_module(&self) -> &MainModule {
        &self.main_module
    }

    /// Removes explicitly excluded modules from the build.
    ///
    /// Excluded clean names leave `flat` and the dependency map; main module
    /// entries are dropped when their raw name contains an excluded name, so
    /// excluding `animate` also drops `material.core.animate`.
    pub fn exclude<S: AsRef<str>>(&mut self, names: &[S]) {
        if names.is_empty() {
            return;
        }
        let excluded: Vec<&str> = names.iter().map(AsRef::as_ref).collect();

        self.flat.retain(|name| !excluded.contains(&name.as_str()));
        self.dependencies
            .retain(|name, _| !excluded.contains(&name.as_str()));
        self.main_module
            .dependencies
            .retain(|raw| !excluded.iter().any(|name| raw.contains(name)));
    }
}

impl Serialize for ResolvedDependencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dependencies.len() + 2))?;
        map.serialize_entry("_flat", &self.flat)?;
        map.serialize_entry("_mainModule", &self.main_module)?;
        for (name, dependencies) in &self.dependencies {
            map.serialize_entry(name, dependencies)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtools_sandbox::LibraryConventions;
    use serde_json::json;

    fn graph(components: &[(&str, &[&str])]) -> DependencyGraph {
        let conventions = LibraryConventions::default();
        let mut main = MainModule::default();
        main.set_external(&["ng".to_string(), "ngAnimate".to_string()], &conventions);

        let mut graph = DependencyGraph::new(main);
        for (name, dependencies) in components {
            let requires: Vec<String> = dependencies
                .iter()
                .map(|dependency| format!("material.components.{dependency}"))
                .collect();
            graph.insert(Component::from_registration(
                &format!("material.components.{name}"),
                &requires,
                &conventions,
            ));
        }
        graph
    }

    #[test]
    fn single_request_pulls_chain() {
        let graph = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let resolved = graph.resolve(&["a"]);

        assert_eq!(resolved.flat(), ["a", "b", "c"]);
        assert_eq!(resolved.dependencies_of("a"), Some(&["b".to_string()][..]));
        assert_eq!(resolved.dependencies_of("c"), Some(&[][..]));
        assert_eq!(
            resolved.main_module().dependencies,
            [
                "ng",
                "ngAnimate",
                "material.components.a",
                "material.components.b",
                "material.components.c"
            ]
        );
    }

    #[test]
    fn overlapping_requests_visit_once() {
        let graph = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let resolved = graph.resolve(&["a", "c"]);

        assert_eq!(resolved.flat(), ["a", "b", "c"]);
        assert_eq!(resolved.main_module().dependencies.len(), 5);
    }

    #[test]
    fn preorder_follows_declaration_order() {
        let graph = graph(&[("a", &["b", "d"]), ("b", &["c"]), ("c", &[]), ("d", &[])]);
        assert_eq!(graph.resolve(&["a"]).flat(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_request_selects_everything() {
        let graph = graph(&[("list", &[]), ("button", &["list"]), ("core", &[])]);
        let resolved = graph.resolve::<&str>(&[]);

        assert_eq!(resolved.flat(), ["list", "button", "core"]);
        assert_eq!(resolved.dependencies().len(), 3);
    }

    #[test]
    fn unknown_names_are_dropped() {
        let graph = graph(&[("a", &["ghost", "b"]), ("b", &[])]);
        let resolved = graph.resolve(&["missing", "a"]);

        assert_eq!(resolved.flat(), ["a", "b"]);
        assert_eq!(resolved.dependencies_of("a"), Some(&["b".to_string()][..]));
        assert_eq!(resolved.dependencies_of("missing"), None);
    }

    #[test]
    fn cycles_terminate() {
        let graph = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert_eq!(graph.resolve(&["b"]).flat(), ["b", "a"]);
    }

    #[test]
    fn exclude_removes_modules_and_main_entries() {
        let graph = graph(&[("a", &["b"]), ("b", &[]), ("c", &[])]);
        let mut resolved = graph.resolve::<&str>(&[]);
        resolved.exclude(&["b"]);

        assert_eq!(resolved.flat(), ["a", "c"]);
        assert!(resolved.dependencies_of("b").is_none());
        assert_eq!(
            resolved.main_module().dependencies,
            ["ng", "ngAnimate", "material.components.a", "material.components.c"]
        );
    }

    #[test]
    fn serializes_to_build_map() {
        let graph = graph(&[("a", &["b"]), ("b", &[])]);
        let value = serde_json::to_value(graph.resolve(&["a"])).unwrap();

        assert_eq!(
            value,
            json!({
                "_flat": ["a", "b"],
                "_mainModule": {
                    "rawName": "ngMaterial",
                    "dependencies": ["ng", "ngAnimate", "material.components.a", "material.components.b"]
                },
                "a": ["b"],
                "b": []
            })
        );
    }
}
