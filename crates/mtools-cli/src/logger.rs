//! Logging for the `mtools` CLI.
//!
//! Logs go to stderr so that JSON and CSS printed on stdout stay pipeable.
//! Messages from scripts running in the sandbox use the `mtools::console`
//! target.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "mtools=debug";
const QUIET_FILTER: &str = "mtools=error";
const DEFAULT_FILTER: &str = "mtools=info";

/// Initialize the tracing subscriber with the specified options.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: DEBUG for all mtools crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`
/// 4. INFO for all mtools crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .with_ansi(!no_color && should_use_colors())
                .compact(),
        )
        .init();
}

fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise they
/// follow the terminal's capabilities.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
