//! Entry point of the `mtools` binary.

use clap::Parser;
use miette::Result;
use mtools_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match commands::Session::from_cli(&args) {
        Ok(session) => match args.command {
            cli::Command::Deps(deps_args) => commands::deps_execute(&session, deps_args).await,
            cli::Command::Files(files_args) => commands::files_execute(&session, files_args).await,
            cli::Command::Theme(theme_args) => commands::theme_execute(&session, theme_args).await,
        },
        Err(err) => Err(err),
    };

    result.map_err(error::cli_error_to_miette)
}
