use mtools_resolver::BuildData;

use crate::cli::FilesArgs;
use crate::commands::Session;
use crate::error::Result;

/// Prints the files of the selected components, grouped by kind.
pub async fn execute(session: &Session, args: FilesArgs) -> Result<()> {
    let config = session.config(&args.build.overrides())?;
    let request = config.build_request(&session.working_dir);

    let data = BuildData::collect(&request).await?;
    tracing::info!(
        "Resolved {} js, {} css and {} theme files for version {}.",
        data.files.js.len(),
        data.files.css.len(),
        data.files.themes.len(),
        data.package.version
    );

    let json = serde_json::to_string_pretty(&data.files)?;
    session.emit(args.output.as_deref(), &json).await
}
