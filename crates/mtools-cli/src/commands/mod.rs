//! Command implementations.

mod deps;
mod files;
mod theme;
mod utils;

pub use deps::execute as deps_execute;
pub use files::execute as files_execute;
pub use theme::execute as theme_execute;
pub use utils::Session;
