//! Dependency resolution against a fixture library executed in the sandbox.

use std::path::PathBuf;

use mtools_resolver::{DependencyResolver, ResolveError};
use serde_json::json;

fn library_entry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("angular-material.js")
}

#[test]
fn test_capture_records_declarations_in_order() {
    let graph = DependencyResolver::new().capture(&library_entry(), None).unwrap();

    let names: Vec<&str> = graph.names().collect();
    assert_eq!(names, ["core", "a", "b", "c", "solo"]);

    let b = graph.get("b").unwrap();
    assert_eq!(b.raw_name, "material.components.b");
    assert_eq!(b.dependencies, ["core", "c", "ghost"]);

    assert_eq!(graph.main_module().raw_name, "ngMaterial");
    assert_eq!(graph.main_module().dependencies, ["ng", "ngAnimate", "ngAria"]);
}

#[test]
fn test_resolve_single_component() {
    let resolved = DependencyResolver::new()
        .resolve(&library_entry(), &["a"], None)
        .unwrap();

    assert_eq!(resolved.flat(), ["a", "core", "b", "c"]);
    assert_eq!(
        resolved.main_module().dependencies,
        [
            "ng",
            "ngAnimate",
            "ngAria",
            "material.components.a",
            "material.core",
            "material.components.b",
            "material.components.c"
        ]
    );
}

#[test]
fn test_resolve_overlapping_request() {
    let resolved = DependencyResolver::new()
        .resolve(&library_entry(), &["a", "c"], None)
        .unwrap();

    assert_eq!(resolved.flat(), ["a", "core", "b", "c"]);
}

#[test]
fn test_resolve_everything_when_request_is_empty() {
    let resolved = DependencyResolver::new()
        .resolve::<&str>(&library_entry(), &[], None)
        .unwrap();

    assert_eq!(resolved.flat(), ["core", "a", "b", "c", "solo"]);
    assert_eq!(resolved.dependencies().len(), 5);
}

#[test]
fn test_unknown_names_are_skipped() {
    let resolved = DependencyResolver::new()
        .resolve(&library_entry(), &["nonexistent", "solo"], None)
        .unwrap();

    assert_eq!(resolved.flat(), ["solo"]);
}

#[test]
fn test_output_shape() {
    let resolved = DependencyResolver::new()
        .resolve(&library_entry(), &["c"], None)
        .unwrap();

    assert_eq!(
        serde_json::to_value(&resolved).unwrap(),
        json!({
            "_flat": ["c", "core"],
            "_mainModule": {
                "rawName": "ngMaterial",
                "dependencies": ["ng", "ngAnimate", "ngAria", "material.components.c", "material.core"]
            },
            "c": ["core"],
            "core": []
        })
    );
}

#[test]
fn test_custom_main_module_name() {
    let graph = DependencyResolver::new()
        .capture(&library_entry(), Some("ngMaterialCustom"))
        .unwrap();

    // The fixture never declares that name, so no external dependencies are known.
    assert_eq!(graph.main_module().raw_name, "ngMaterialCustom");
    assert!(graph.main_module().dependencies.is_empty());
    assert_eq!(graph.len(), 5);
}

#[test]
fn test_missing_entry() {
    let entry = library_entry().with_file_name("missing.js");
    let err = DependencyResolver::new().capture(&entry, None).unwrap_err();

    assert!(matches!(err, ResolveError::EntryNotFound(path) if path == entry));
}
