//! Theme descriptions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// The four palette slots of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteRole {
    Primary,
    Accent,
    Warn,
    Background,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 4] = [Self::Primary, Self::Accent, Self::Warn, Self::Background];

    /// Name of the theme builder method that assigns this role.
    pub fn method(self) -> &'static str {
        match self {
            Self::Primary => "primaryPalette",
            Self::Accent => "accentPalette",
            Self::Warn => "warnPalette",
            Self::Background => "backgroundPalette",
        }
    }

    pub fn default_palette(self) -> &'static str {
        match self {
            Self::Primary => "indigo",
            Self::Accent => "pink",
            Self::Warn => "deep-orange",
            Self::Background => "grey",
        }
    }
}

/// A palette name, optionally with hue overrides such as
/// `{ "default": "400", "hue-1": "100" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteAssignment {
    Name(String),
    WithHues {
        name: String,
        #[serde(default)]
        hues: IndexMap<String, String>,
    },
}

impl PaletteAssignment {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::WithHues { name, .. } => name,
        }
    }

    /// Hue overrides, if any were given.
    pub fn hues(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::WithHues { hues, .. } if !hues.is_empty() => Some(hues),
            _ => None,
        }
    }
}

impl From<&str> for PaletteAssignment {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PaletteAssignment {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A theme registered with the theming service before generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSpec {
    pub name: String,
    pub primary_palette: PaletteAssignment,
    pub accent_palette: PaletteAssignment,
    pub warn_palette: PaletteAssignment,
    pub background_palette: PaletteAssignment,
    pub dark: bool,
}

impl Default for ThemeSpec {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            primary_palette: PaletteRole::Primary.default_palette().into(),
            accent_palette: PaletteRole::Accent.default_palette().into(),
            warn_palette: PaletteRole::Warn.default_palette().into(),
            background_palette: PaletteRole::Background.default_palette().into(),
            dark: false,
        }
    }
}

impl ThemeSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn palette(&self, role: PaletteRole) -> &PaletteAssignment {
        match role {
            PaletteRole::Primary => &self.primary_palette,
            PaletteRole::Accent => &self.accent_palette,
            PaletteRole::Warn => &self.warn_palette,
            PaletteRole::Background => &self.background_palette,
        }
    }

    pub fn with_palette(mut self, role: PaletteRole, palette: impl Into<PaletteAssignment>) -> Self {
        let slot = match role {
            PaletteRole::Primary => &mut self.primary_palette,
            PaletteRole::Accent => &mut self.accent_palette,
            PaletteRole::Warn => &mut self.warn_palette,
            PaletteRole::Background => &mut self.background_palette,
        };
        *slot = palette.into();
        self
    }

    pub fn dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ThemeError::InvalidTheme {
                theme: self.name.clone(),
                reason: "theme name is empty".to_string(),
            });
        }
        for role in PaletteRole::ALL {
            if self.palette(role).name().trim().is_empty() {
                return Err(ThemeError::InvalidTheme {
                    theme: self.name.clone(),
                    reason: format!("{} is empty", role.method()),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let theme = ThemeSpec::default();
        assert_eq!(theme.name, "default");
        assert_eq!(theme.primary_palette.name(), "indigo");
        assert_eq!(theme.accent_palette.name(), "pink");
        assert_eq!(theme.warn_palette.name(), "deep-orange");
        assert_eq!(theme.background_palette.name(), "grey");
        assert!(!theme.dark);
    }

    #[test]
    fn deserializes_partial_theme() {
        let theme: ThemeSpec = serde_json::from_value(json!({
            "primaryPalette": "teal",
            "accentPalette": { "name": "amber", "hues": { "default": "400" } },
            "dark": true
        }))
        .unwrap();

        assert_eq!(theme.name, "default");
        assert_eq!(theme.primary_palette.name(), "teal");
        assert_eq!(theme.accent_palette.name(), "amber");
        assert_eq!(
            theme.accent_palette.hues().and_then(|hues| hues.get("default")).map(String::as_str),
            Some("400")
        );
        assert_eq!(theme.warn_palette.name(), "deep-orange");
        assert!(theme.dark);
    }

    #[test]
    fn empty_palette_name_is_invalid() {
        let theme = ThemeSpec::named("site").with_palette(PaletteRole::Warn, "");
        let err = theme.validate().unwrap_err();
        assert!(err.to_string().contains("warnPalette"));
    }
}
