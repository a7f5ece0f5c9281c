use mtools_theme::ThemeSpec;

use crate::config::MaterialToolsConfig;
use crate::error::{ConfigError, Result};

impl MaterialToolsConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "version".to_string(),
                hint: "Use a version such as 1.1.0 or 'local'".to_string(),
            });
        }

        if self.main_filename.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mainFilename".to_string(),
                hint: "Name the library file inside the module directory".to_string(),
            });
        }

        if let Some(module) = self.modules.iter().find(|module| module.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "modules".to_string(),
                hint: format!("Module names cannot be empty (got {module:?})"),
            });
        }

        for theme in self.all_themes() {
            validate_theme(&theme)?;
        }

        for (name, palette) in &self.palettes {
            palette.validate(name).map_err(|error| ConfigError::InvalidValue {
                field: format!("palettes.{name}"),
                hint: error.to_string(),
            })?;
        }

        Ok(())
    }

    /// Validation for commands that write output.
    pub fn validate_for_build(&self) -> Result<()> {
        self.validate()?;
        if self.destination.is_none() {
            return Err(ConfigError::MissingField {
                field: "destination".to_string(),
                hint: "You have to specify a destination".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_theme(theme: &ThemeSpec) -> Result<()> {
    theme.validate().map_err(|error| ConfigError::InvalidValue {
        field: format!("themes.{}", theme.name),
        hint: error.to_string(),
    })
}
