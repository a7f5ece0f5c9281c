//! Custom color palettes.
//!
//! A palette maps the fourteen swatch keys (`50` through `900` plus the
//! `A100`..`A700` accents) to colors, along with the contrast metadata the
//! theming service uses to pick readable text colors. A palette may extend
//! another one, in which case its entries are merged over the base.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ThemeError};

/// Swatch keys every complete palette defines.
pub const SWATCH_KEYS: [&str; 14] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "A100", "A200", "A400", "A700",
];

/// A list of hue keys, given either as an array or as a space separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HueList {
    Joined(String),
    List(Vec<String>),
}

impl HueList {
    pub fn hues(&self) -> Vec<&str> {
        match self {
            Self::Joined(joined) => joined.split_whitespace().collect(),
            Self::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

/// A user supplied palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteDefinition {
    /// Name of a palette defined earlier or shipped with the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_default_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_dark_colors: Option<HueList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_light_colors: Option<HueList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_strong_light_colors: Option<HueList>,

    /// Swatch key to color.
    #[serde(flatten)]
    pub swatches: IndexMap<String, String>,
}

impl PaletteDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extending(base: impl Into<String>) -> Self {
        Self {
            extends: Some(base.into()),
            ..Self::default()
        }
    }

    pub fn swatch(mut self, key: impl Into<String>, color: impl Into<String>) -> Self {
        self.swatches.insert(key.into(), color.into());
        self
    }

    pub fn contrast_default(mut self, color: impl Into<String>) -> Self {
        self.contrast_default_color = Some(color.into());
        self
    }

    /// Rejects swatch keys the theming service does not know.
    pub fn validate(&self, name: &str) -> Result<()> {
        match self.swatches.keys().find(|key| !SWATCH_KEYS.contains(&key.as_str())) {
            Some(key) => Err(ThemeError::UnknownSwatch {
                palette: name.to_string(),
                swatch: key.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The palette as the theming service expects it, merged over `base`.
    ///
    /// Entries of this definition win over the base; the result must define
    /// every swatch key.
    pub fn to_palette(&self, name: &str, base: Option<&Map<String, Value>>) -> Result<Map<String, Value>> {
        self.validate(name)?;

        let mut palette = base.cloned().unwrap_or_default();
        if let Ok(Value::Object(mut own)) = serde_json::to_value(self) {
            own.remove("extends");
            for (key, value) in own {
                palette.insert(key, value);
            }
        }

        let missing: Vec<String> = SWATCH_KEYS
            .iter()
            .filter(|key| !palette.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ThemeError::IncompletePalette {
                palette: name.to_string(),
                missing,
            });
        }

        Ok(palette)
    }
}

/// Custom palettes by name, in definition order.
pub type PaletteSet = IndexMap<String, PaletteDefinition>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete(color: &str) -> PaletteDefinition {
        SWATCH_KEYS
            .iter()
            .fold(PaletteDefinition::new(), |palette, key| palette.swatch(*key, color))
            .contrast_default("light")
    }

    #[test]
    fn deserializes_flattened_swatches() {
        let palette: PaletteDefinition = serde_json::from_value(json!({
            "extends": "red",
            "500": "#ff0000",
            "contrastDefaultColor": "light",
            "contrastDarkColors": ["50", "100"],
            "contrastLightColors": "500 600"
        }))
        .unwrap();

        assert_eq!(palette.extends.as_deref(), Some("red"));
        assert_eq!(palette.swatches.get("500").map(String::as_str), Some("#ff0000"));
        assert_eq!(palette.contrast_dark_colors.unwrap().hues(), ["50", "100"]);
        assert_eq!(palette.contrast_light_colors.unwrap().hues(), ["500", "600"]);
    }

    #[test]
    fn merges_over_base() {
        let base = complete("#111111").to_palette("base", None).unwrap();
        let palette = PaletteDefinition::extending("base")
            .swatch("500", "#222222")
            .to_palette("custom", Some(&base))
            .unwrap();

        assert_eq!(palette["500"], json!("#222222"));
        assert_eq!(palette["50"], json!("#111111"));
        assert_eq!(palette["contrastDefaultColor"], json!("light"));
        assert!(!palette.contains_key("extends"));
    }

    #[test]
    fn incomplete_palette_is_rejected() {
        let err = PaletteDefinition::new()
            .swatch("500", "#000000")
            .to_palette("partial", None)
            .unwrap_err();

        match err {
            ThemeError::IncompletePalette { palette, missing } => {
                assert_eq!(palette, "partial");
                assert_eq!(missing.len(), 13);
                assert!(!missing.contains(&"500".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_swatch_is_rejected() {
        let err = complete("#000").swatch("A900", "#000").validate("odd").unwrap_err();
        assert!(matches!(err, ThemeError::UnknownSwatch { swatch, .. } if swatch == "A900"));
    }
}
