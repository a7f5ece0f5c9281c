//! Integration tests for the sandboxed CommonJS loader.
//!
//! Every test runs fixture files from `tests/fixtures/loader` inside a fresh
//! realm and inspects the resulting exports through the realm itself.

use std::path::PathBuf;

use mtools_sandbox::{RealmConfig, RunOptions, SandboxError, SandboxRealm};
use serde_json::json;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("loader")
}

fn realm() -> SandboxRealm {
    SandboxRealm::new(RealmConfig::new().base_dir(fixtures_dir())).expect("realm")
}

/// Evaluates `expression` against `exports` bound to the global `result`.
fn inspect(realm: &mut SandboxRealm, exports: mtools_sandbox::JsValue, expression: &str) -> serde_json::Value {
    realm.set_global("result", exports).unwrap();
    let value = realm.eval(expression).unwrap();
    value.to_json(realm.context()).unwrap()
}

#[test]
fn test_run_returns_module_exports() {
    let mut realm = realm();
    let exports = realm.run("./entry.js", RunOptions::default()).unwrap();

    assert_eq!(inspect(&mut realm, exports.clone(), "result.numbers.length").as_f64(), Some(50.0));
    assert_eq!(inspect(&mut realm, exports.clone(), "result.numbers[49]").as_f64(), Some(49.0));
    assert_eq!(
        inspect(&mut realm, exports.clone(), "result.module.exports === result"),
        json!(true)
    );
    assert_eq!(
        inspect(&mut realm, exports, "typeof result.require"),
        json!("function")
    );
}

#[test]
fn test_nested_json_module() {
    let mut realm = realm();
    let exports = realm.run("./entry.js", RunOptions::default()).unwrap();

    assert_eq!(
        inspect(&mut realm, exports, "result.config"),
        json!({ "name": "fixture", "modules": ["button", "list"] })
    );
}

#[test]
fn test_module_locals() {
    let mut realm = realm();
    let exports = realm.run("./entry.js", RunOptions::default()).unwrap();

    let entry = fixtures_dir().join("entry.js").canonicalize().unwrap();
    let dir = entry.parent().unwrap().to_path_buf();

    assert_eq!(
        inspect(&mut realm, exports.clone(), "result.filename"),
        json!(entry.to_string_lossy())
    );
    assert_eq!(
        inspect(&mut realm, exports.clone(), "result.dirname"),
        json!(dir.to_string_lossy())
    );
    assert_eq!(inspect(&mut realm, exports, "result.sameGlobal"), json!(true));
}

#[test]
fn test_block_scoped_declarations() {
    let mut realm = realm();
    let exports = realm.run("./block-scope.js", RunOptions::strict()).unwrap();

    assert_eq!(inspect(&mut realm, exports.clone(), "result.numbers.length").as_f64(), Some(50.0));
    assert_eq!(inspect(&mut realm, exports, "result.label"), json!("block"));
}

#[test]
fn test_cached_exports_are_reused() {
    let mut realm = realm();
    let first = realm.run("./numbers.js", RunOptions::default()).unwrap();
    let second = realm.run("./numbers.js", RunOptions::default()).unwrap();

    realm.set_global("first", first).unwrap();
    realm.set_global("second", second).unwrap();
    let same = realm.eval("first === second").unwrap();
    assert_eq!(same.as_boolean(), Some(true));

    let path = fixtures_dir().join("numbers.js").canonicalize().unwrap();
    assert!(realm.loader().cached(&path).is_some());
}

#[test]
fn test_nested_requires_populate_cache() {
    let mut realm = realm();
    realm.run("./entry.js", RunOptions::default()).unwrap();

    // entry.js, numbers.js and data/config.json
    assert_eq!(realm.loader().cache_len(), 3);

    realm.loader().clear_cache();
    assert_eq!(realm.loader().cache_len(), 0);
}

#[test]
fn test_caching_disabled_reevaluates() {
    let mut realm = realm();
    let options = RunOptions::default().with_caching(false);
    let first = realm.run("./numbers.js", options).unwrap();
    let second = realm.run("./numbers.js", options).unwrap();

    realm.set_global("first", first).unwrap();
    realm.set_global("second", second).unwrap();
    let same = realm.eval("first === second").unwrap();
    assert_eq!(same.as_boolean(), Some(false));
    assert_eq!(realm.loader().cache_len(), 0);
}

#[test]
fn test_sloppy_code_runs_without_strict_mode() {
    let mut realm = realm();
    let exports = realm.run("./sloppy.js", RunOptions::default()).unwrap();
    assert_eq!(exports.as_number(), Some(42.0));
}

#[test]
fn test_strict_mode_rejects_implicit_globals() {
    let mut realm = realm();
    let err = realm.run("./sloppy.js", RunOptions::strict()).unwrap_err();

    match err {
        SandboxError::Evaluation { path, .. } => {
            assert!(path.ends_with("sloppy.js"), "unexpected path: {}", path.display());
        }
        other => panic!("expected evaluation error, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_names_the_file() {
    let mut realm = realm();
    let err = realm.run("./broken.js", RunOptions::default()).unwrap_err();

    assert!(matches!(err, SandboxError::Evaluation { .. }));
    assert!(err.to_string().contains("broken.js"));
}

#[test]
fn test_thrown_error_is_reported() {
    let mut realm = realm();
    let err = realm.run("./throws.js", RunOptions::default()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("throws.js"));
    assert!(message.contains("library init failed"));
}

#[test]
fn test_nested_exception_propagates_to_top_level() {
    let mut realm = realm();
    let err = realm.run("./requires-throwing.js", RunOptions::default()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("requires-throwing.js"));
    assert!(message.contains("library init failed"));

    // A failed module is not left behind as a half-initialized cache entry.
    let throwing = fixtures_dir().join("throws.js").canonicalize().unwrap();
    assert!(realm.loader().cached(&throwing).is_none());
}

#[test]
fn test_missing_top_level_file() {
    let mut realm = realm();
    let err = realm.run("./does-not-exist.js", RunOptions::default()).unwrap_err();

    match err {
        SandboxError::Resolution { specifier, .. } => assert_eq!(specifier, "./does-not-exist.js"),
        other => panic!("expected resolution error, got {other:?}"),
    }
}

#[test]
fn test_missing_nested_require() {
    let mut realm = realm();
    let err = realm.run("./requires-missing.js", RunOptions::default()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("requires-missing.js"));
    assert!(message.contains("does-not-exist.js"));
}

#[test]
fn test_require_cycle_sees_partial_exports() {
    let mut realm = realm();
    let exports = realm.run("./cycle-a.js", RunOptions::default()).unwrap();

    assert_eq!(
        inspect(&mut realm, exports, "result"),
        json!({ "name": "a", "partner": "b", "seenByB": "a" })
    );
}

#[test]
fn test_host_globals_are_available() {
    let mut realm = realm();
    let exports = realm.run("./host-globals.js", RunOptions::strict()).unwrap();

    assert_eq!(
        inspect(&mut realm, exports, "result"),
        json!({ "console": "function", "setTimeout": "function", "timerId": "number" })
    );
}

#[test]
fn test_overrides_win_over_host_globals() {
    let mut realm = SandboxRealm::new(
        RealmConfig::new()
            .base_dir(fixtures_dir())
            .global("setTimeout", json!("custom"))
            .global("buildInfo", json!({ "channel": "fixture" })),
    )
    .unwrap();
    realm.run("./numbers.js", RunOptions::default()).unwrap();

    let timer = realm.eval("typeof setTimeout").unwrap();
    assert_eq!(timer.to_json(realm.context()).unwrap(), json!("string"));

    let info = realm.eval("window.buildInfo.channel").unwrap();
    assert_eq!(info.to_json(realm.context()).unwrap(), json!("fixture"));
}

#[test]
fn test_style_elements_collect_under_head() {
    let mut realm = realm();
    let exports = realm.run("./styles.js", RunOptions::strict()).unwrap();

    assert_eq!(inspect(&mut realm, exports.clone(), "result.count").as_f64(), Some(2.0));
    assert_eq!(inspect(&mut realm, exports.clone(), "result.attribute"), json!(""));
    assert_eq!(inspect(&mut realm, exports, "result.missing"), json!(""));
    assert_eq!(realm.head_len().unwrap(), 2);
    assert_eq!(
        realm.head_texts().unwrap(),
        vec![".a { color: red; }".to_string(), ".b { color: blue; }".to_string()]
    );
}

#[test]
fn test_elements_have_a_first_child() {
    let mut realm = realm();
    let value = realm
        .eval("!!document.head.firstElementChild && !!document.createElement('style').firstElementChild")
        .unwrap();

    assert_eq!(value.to_json(realm.context()).unwrap(), json!(true));
}

#[test]
fn test_realms_are_isolated() {
    let mut first = realm();
    first.eval("window.leaked = 1;").unwrap();
    first.run("./styles.js", RunOptions::default()).unwrap();

    let mut second = realm();
    let leaked = second.eval("typeof leaked").unwrap();
    assert_eq!(leaked.to_json(second.context()).unwrap(), json!("undefined"));
    assert_eq!(second.head_len().unwrap(), 0);
}
