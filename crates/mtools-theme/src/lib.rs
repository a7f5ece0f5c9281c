//! Static theme stylesheets for custom library builds.
//!
//! Themes are not reimplemented here. [`ThemeBuilder`] runs the library's own
//! theming service inside a sandbox, so the generated CSS is exactly what the
//! library would inject at runtime for the same [`ThemeSpec`]s.

pub mod builder;
pub mod error;
pub mod palette;
pub mod theme;

pub use builder::ThemeBuilder;
pub use error::{Result, ThemeError};
pub use palette::{HueList, PaletteDefinition, PaletteSet, SWATCH_KEYS};
pub use theme::{PaletteAssignment, PaletteRole, ThemeSpec};
