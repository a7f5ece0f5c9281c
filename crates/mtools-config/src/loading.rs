use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::config::MaterialToolsConfig;
use crate::error::{ConfigError, Result};

/// Config files looked up in the project root, in order.
pub const CONFIG_FILES: [&str; 2] = ["mtools.toml", "mtools.json"];

/// Prefix of environment variables, e.g. `MTOOLS_MAIN_FILENAME`.
pub const ENV_PREFIX: &str = "MTOOLS_";

/// Values set explicitly by the caller, typically from command line flags.
/// Unset fields leave the lower layers alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_modules: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_filename: Option<String>,
}

impl MaterialToolsConfig {
    /// Load configuration from multiple sources.
    /// Priority: overrides > environment variables > config file > defaults
    ///
    /// Without an explicit `config_path`, the first of [`CONFIG_FILES`] found
    /// in `root` is used, if any.
    pub fn load(root: &Path, config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config: Self = Self::figment(root, config_path, overrides)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The layered sources, without extracting them.
    pub fn figment(root: &Path, config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Some(path)
            }
            None => CONFIG_FILES
                .iter()
                .map(|name| root.join(name))
                .find(|path| path.is_file()),
        };

        if let Some(path) = config_file {
            tracing::debug!("loading config from {}", path.display());
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => return Err(ConfigError::UnsupportedFormat(path)),
            };
        }

        // MTOOLS_EXCLUDE_MODULES -> excludeModules
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| camel_case(key.as_str()).into())
                .lowercase(false),
        );

        Ok(figment.merge(Serialized::defaults(overrides)))
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (index, word) in key.split('_').filter(|word| !word.is_empty()).enumerate() {
        let word = word.to_ascii_lowercase();
        if index == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::camel_case;

    #[test]
    fn env_keys_to_field_names() {
        assert_eq!(camel_case("VERSION"), "version");
        assert_eq!(camel_case("MAIN_FILENAME"), "mainFilename");
        assert_eq!(camel_case("exclude_modules"), "excludeModules");
        assert_eq!(camel_case("DESTINATION__FILENAME"), "destinationFilename");
    }
}
