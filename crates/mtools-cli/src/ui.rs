//! Status messages on stderr.

use owo_colors::OwoColorize;

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}
