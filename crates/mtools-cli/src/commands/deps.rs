use mtools_resolver::DependencyResolver;

use crate::cli::DepsArgs;
use crate::commands::Session;
use crate::error::Result;

/// Prints the dependency closure of the selected components.
pub async fn execute(session: &Session, args: DepsArgs) -> Result<()> {
    let config = session.config(&args.build.overrides())?;
    let entry = session.library_entry(&config, args.entry.as_deref())?;

    let mut dependencies =
        DependencyResolver::new().resolve(&entry, &config.modules, config.main_module.as_deref())?;
    dependencies.exclude(&config.exclude_modules);
    tracing::info!("Resolved {} components.", dependencies.flat().len());

    let json = serde_json::to_string_pretty(&dependencies)?;
    session.emit(args.output.as_deref(), &json).await
}
