//! Source file discovery for a set of components.
//!
//! Each file category is collected by its own blocking task; the categories
//! are independent, so they are scanned concurrently and joined at the end.

use std::path::PathBuf;

use serde::Serialize;
use tokio::task::JoinHandle;
use walkdir::{DirEntry, WalkDir};

use crate::error::{ResolveError, Result};
use crate::package::{BuildLayout, MaterialPackage};

/// Every file a custom build is assembled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedFileSet {
    pub root: PathBuf,
    pub js: Vec<PathBuf>,
    pub css: Vec<PathBuf>,
    pub scss: Vec<PathBuf>,
    pub themes: Vec<PathBuf>,
    pub layout: Vec<PathBuf>,
}

/// Which file names a scan accepts. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    /// `*.{ext}` excluding minified and theme files.
    Source(&'static str),
    /// `*-theme.css` and `*-theme.scss`.
    Theme,
    /// `*.layouts.css` and `*.layout-attributes.css`.
    Layout,
    /// Any `*.scss`.
    Stylesheet,
}

impl FileKind {
    fn matches(self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        match self {
            Self::Source(ext) => {
                let Some(stem) = name.strip_suffix(ext).and_then(|rest| rest.strip_suffix('.')) else {
                    return false;
                };
                !stem.is_empty() && !stem.ends_with(".min") && !stem.ends_with("-theme")
            }
            Self::Theme => name.ends_with("-theme.css") || name.ends_with("-theme.scss"),
            Self::Layout => name.ends_with(".layouts.css") || name.ends_with(".layout-attributes.css"),
            Self::Stylesheet => name.ends_with(".scss"),
        }
    }
}

/// One directory walk.
#[derive(Debug, Clone)]
struct Scan {
    dir: PathBuf,
    /// Lowercased component directory names to descend into. `None` scans only
    /// the files directly inside `dir`.
    components: Option<Vec<String>>,
    kind: FileKind,
}

impl Scan {
    fn per_component(dir: PathBuf, modules: &[String], kind: FileKind) -> Self {
        Self {
            dir,
            components: Some(modules.iter().map(|module| module.to_lowercase()).collect()),
            kind,
        }
    }

    fn flat(dir: PathBuf, kind: FileKind) -> Self {
        Self {
            dir,
            components: None,
            kind,
        }
    }

    /// Files under `<dir>/<component>/**` (or directly in `dir`), sorted.
    fn run(&self) -> Vec<PathBuf> {
        // Entries above `min_depth` never reach `filter_entry`, so component
        // directories are walked at depth 1 and pruned there.
        let (walker, min_file_depth) = match &self.components {
            Some(_) => (WalkDir::new(&self.dir).min_depth(1), 2),
            None => (WalkDir::new(&self.dir).min_depth(1).max_depth(1), 1),
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() != 1 || self.includes_top_level(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.depth() >= min_file_depth && entry.file_type().is_file())
            .filter(|entry| self.kind.matches(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }

    fn includes_top_level(&self, entry: &DirEntry) -> bool {
        let Some(components) = &self.components else {
            return true;
        };
        let name = entry.file_name().to_string_lossy().to_lowercase();
        entry.file_type().is_dir() && components.iter().any(|component| *component == name)
    }

    fn spawn(self) -> JoinHandle<Vec<PathBuf>> {
        tokio::task::spawn_blocking(move || self.run())
    }
}

/// Collects the files of the listed components from a resolved package.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

impl FileResolver {
    pub async fn resolve(modules: &[String], package: &MaterialPackage) -> Result<ResolvedFileSet> {
        let js_modules = package.js_modules();
        let source_root = package.source_root();
        let modern = package.layout == BuildLayout::Modern;

        let js = Scan::per_component(js_modules.clone(), modules, FileKind::Source("js")).spawn();
        let css = Scan::per_component(js_modules.clone(), modules, FileKind::Source("css")).spawn();

        let theme_dir = if modern {
            Some(js_modules.clone())
        } else {
            source_root.as_ref().map(|src| src.join("components"))
        };
        let themes = spawn_optional(theme_dir.map(|dir| Scan::per_component(dir, modules, FileKind::Theme)));

        let layout = Scan::flat(package.layout_modules(), FileKind::Layout).spawn();

        let (component_scss, core_scss) = match (&source_root, modern) {
            (Some(src), false) => (
                Some(Scan::per_component(src.join("components"), modules, FileKind::Source("scss"))),
                Some(Scan::flat(src.join("core").join("style"), FileKind::Stylesheet)),
            ),
            _ => (None, None),
        };
        let component_scss = spawn_optional(component_scss);
        let core_scss = spawn_optional(core_scss);

        let (js, css, themes, layout, component_scss, core_scss) =
            tokio::try_join!(js, css, themes, layout, component_scss, core_scss)
                .map_err(|err| ResolveError::Task(err.to_string()))?;

        if js.is_empty() {
            return Err(ResolveError::MissingFiles {
                category: "js",
                modules: modules.to_vec(),
                dir: js_modules,
            });
        }

        let mut scss = component_scss;
        scss.extend(core_scss);

        tracing::debug!(
            "resolved {} js, {} css, {} scss, {} theme and {} layout files",
            js.len(),
            css.len(),
            scss.len(),
            themes.len(),
            layout.len()
        );

        Ok(ResolvedFileSet {
            root: package.root.clone(),
            js,
            css,
            scss,
            themes,
            layout,
        })
    }
}

fn spawn_optional(scan: Option<Scan>) -> JoinHandle<Vec<PathBuf>> {
    match scan {
        Some(scan) => scan.spawn(),
        None => tokio::task::spawn_blocking(Vec::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_excludes_minified_and_themes() {
        let js = FileKind::Source("js");
        assert!(js.matches("button.js"));
        assert!(js.matches("Button.JS"));
        assert!(!js.matches("button.min.js"));
        assert!(!js.matches("button-theme.js"));
        assert!(!js.matches("button.css"));
        assert!(!js.matches(".js"));
    }

    #[test]
    fn theme_and_layout_kinds() {
        assert!(FileKind::Theme.matches("button-default-theme.scss"));
        assert!(FileKind::Theme.matches("button-default-theme.css"));
        assert!(!FileKind::Theme.matches("button.css"));

        assert!(FileKind::Layout.matches("angular-material.layouts.css"));
        assert!(FileKind::Layout.matches("angular-material.layout-attributes.css"));
        assert!(!FileKind::Layout.matches("angular-material.layouts.min.js"));
    }

    #[test]
    fn component_scan_only_descends_into_listed_components() {
        let dir = tempfile::TempDir::new().unwrap();
        for file in ["button/button.js", "button/nested/extra.js", "list/list.js", "top.js"] {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let scan = Scan::per_component(dir.path().to_path_buf(), &["BUTTON".to_string()], FileKind::Source("js"));
        let files = scan.run();

        assert_eq!(
            files,
            vec![
                dir.path().join("button/button.js"),
                dir.path().join("button/nested/extra.js"),
            ]
        );

        let flat = Scan::flat(dir.path().to_path_buf(), FileKind::Source("js")).run();
        assert_eq!(flat, vec![dir.path().join("top.js")]);
    }
}
