//! The `mtools` command line interface.
//!
//! - [`cli`] - argument definitions
//! - `commands` - `deps`, `files` and `theme`
//! - [`error`] - error type and miette rendering
//! - [`logger`] - tracing setup

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
