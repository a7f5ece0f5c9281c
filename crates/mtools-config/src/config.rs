use std::path::{Path, PathBuf};

use mtools_resolver::{BuildRequest, LOCAL_VERSION};
use mtools_theme::{PaletteSet, ThemeSpec};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_CACHE: &str = "./.material-cache/";
pub const DEFAULT_MAIN_FILENAME: &str = "angular-material.js";
pub const DEFAULT_DESTINATION_FILENAME: &str = "angular-material";
const THEMES_SUFFIX: &str = ".themes.css";

/// Options of a custom library build.
///
/// Field names are camelCase in every file format so existing JSON configs
/// keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialToolsConfig {
    /// Library version, or `local` for the installed package.
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory holding downloaded versions.
    #[serde(default = "default_cache")]
    pub cache: PathBuf,

    /// Components to include. Empty includes all of them.
    #[serde(default)]
    pub modules: Vec<String>,

    #[serde(default)]
    pub exclude_modules: Vec<String>,

    /// Library file that is executed to capture module registrations.
    #[serde(default = "default_main_filename")]
    pub main_filename: String,

    /// Name of the library's aggregate module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_module: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,

    /// Base for the output filenames.
    #[serde(default = "default_destination_filename")]
    pub destination_filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<ThemeSpec>,

    #[serde(default, skip_serializing_if = "PaletteSet::is_empty")]
    pub palettes: PaletteSet,
}

fn default_version() -> String {
    LOCAL_VERSION.to_string()
}

fn default_cache() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE)
}

fn default_main_filename() -> String {
    DEFAULT_MAIN_FILENAME.to_string()
}

fn default_destination_filename() -> String {
    DEFAULT_DESTINATION_FILENAME.to_string()
}

impl Default for MaterialToolsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cache: default_cache(),
            modules: Vec::new(),
            exclude_modules: Vec::new(),
            main_filename: default_main_filename(),
            main_module: None,
            destination: None,
            destination_filename: default_destination_filename(),
            theme: None,
            themes: Vec::new(),
            palettes: PaletteSet::new(),
        }
    }
}

impl MaterialToolsConfig {
    /// `theme` followed by `themes`.
    pub fn all_themes(&self) -> Vec<ThemeSpec> {
        self.theme.iter().chain(&self.themes).cloned().collect()
    }

    /// The resolver request for this config, with relative paths taken
    /// against `working_dir`.
    pub fn build_request(&self, working_dir: &Path) -> BuildRequest {
        BuildRequest {
            version: self.version.clone(),
            cache: working_dir.join(&self.cache),
            modules: self.modules.clone(),
            exclude_modules: self.exclude_modules.clone(),
            main_filename: self.main_filename.clone(),
            main_module: self.main_module.clone(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Output path without extension, e.g. `dist/angular-material`.
    pub fn output_base(&self) -> Option<PathBuf> {
        self.destination
            .as_ref()
            .map(|destination| destination.join(&self.destination_filename))
    }

    /// Where a build writes the static theme stylesheet,
    /// `<destination>/<destinationFilename>.themes.css`.
    pub fn themes_output(&self) -> Result<PathBuf> {
        self.validate_for_build()?;
        let mut path = self.output_base().unwrap_or_default().into_os_string();
        path.push(THEMES_SUFFIX);
        Ok(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtools_theme::PaletteRole;

    #[test]
    fn test_serialization() {
        let config = MaterialToolsConfig {
            exclude_modules: vec!["gestures".to_string()],
            destination: Some(PathBuf::from("dist")),
            ..MaterialToolsConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();

        assert!(json.get("excludeModules").is_some());
        assert!(json.get("mainFilename").is_some());
        assert!(json.get("destinationFilename").is_some());
        assert!(json.get("exclude_modules").is_none());

        // skip_serializing_if
        assert!(json.get("theme").is_none());
        assert!(json.get("themes").is_none());
        assert!(json.get("mainModule").is_none());

        let back: MaterialToolsConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: MaterialToolsConfig = serde_json::from_str(r#"{ "modules": ["list"] }"#).unwrap();
        assert_eq!(config.version, "local");
        assert_eq!(config.cache, PathBuf::from("./.material-cache/"));
        assert_eq!(config.main_filename, "angular-material.js");
        assert_eq!(config.destination_filename, "angular-material");
        assert_eq!(config.modules, ["list"]);
    }

    #[test]
    fn test_all_themes_puts_single_theme_first() {
        let config = MaterialToolsConfig {
            theme: Some(ThemeSpec::named("site")),
            themes: vec![ThemeSpec::named("admin").with_palette(PaletteRole::Primary, "teal")],
            ..MaterialToolsConfig::default()
        };
        let names: Vec<String> = config.all_themes().into_iter().map(|theme| theme.name).collect();
        assert_eq!(names, ["site", "admin"]);
    }

    #[test]
    fn test_build_request() {
        let config = MaterialToolsConfig {
            version: "1.1.0".to_string(),
            modules: vec!["list".to_string()],
            ..MaterialToolsConfig::default()
        };
        let request = config.build_request(Path::new("/work"));

        assert_eq!(request.version, "1.1.0");
        assert_eq!(request.cache, Path::new("/work").join("./.material-cache/"));
        assert_eq!(request.modules, ["list"]);
        assert_eq!(request.working_dir, PathBuf::from("/work"));
    }

    #[test]
    fn test_output_base() {
        assert_eq!(MaterialToolsConfig::default().output_base(), None);

        let config = MaterialToolsConfig {
            destination: Some(PathBuf::from("dist")),
            ..MaterialToolsConfig::default()
        };
        assert_eq!(config.output_base(), Some(PathBuf::from("dist/angular-material")));
    }

    #[test]
    fn test_themes_output() {
        assert!(MaterialToolsConfig::default().themes_output().is_err());

        let config = MaterialToolsConfig {
            destination: Some(PathBuf::from("dist")),
            destination_filename: "material".to_string(),
            ..MaterialToolsConfig::default()
        };
        assert_eq!(config.themes_output().unwrap(), PathBuf::from("dist/material.themes.css"));
    }
}
