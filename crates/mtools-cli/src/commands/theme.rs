use mtools_config::MaterialToolsConfig;
use mtools_theme::{ThemeBuilder, ThemeSpec};

use crate::cli::ThemeArgs;
use crate::commands::Session;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Generates the theme stylesheet.
///
/// Themes given on the command line are generated one at a time as the
/// default theme, so each stylesheet applies without a theme attribute.
/// Otherwise the configured themes are generated together.
///
/// With `--write` the stylesheet goes to the configured destination, which
/// then has to be set.
pub async fn execute(session: &Session, args: ThemeArgs) -> Result<()> {
    let config = session.config(&args.build.overrides())?;
    let output = if args.write {
        Some(config.themes_output()?)
    } else {
        args.output.clone()
    };
    let entry = session.library_entry(&config, args.entry.as_deref())?;

    let override_css = match &args.css {
        Some(path) => {
            let path = session.working_dir.join(path);
            Some(tokio::fs::read_to_string(&path).await.with_path(&path)?)
        }
        None => None,
    };

    let mut stylesheets = Vec::new();
    for themes in theme_runs(&args, &config) {
        let mut builder = ThemeBuilder::new(&entry, &themes, &config.palettes)?;
        stylesheets.push(builder.build(override_css.as_deref())?);
    }

    let css = stylesheets.join("\n");
    if css.is_empty() {
        ui::warning("No theme styles were generated");
    }
    session.emit(output.as_deref(), &css).await
}

fn theme_runs(args: &ThemeArgs, config: &MaterialToolsConfig) -> Vec<Vec<ThemeSpec>> {
    let cli_themes = args.themes();
    if !cli_themes.is_empty() {
        return cli_themes.into_iter().map(|theme| vec![theme]).collect();
    }

    // No configured themes means the default theme.
    vec![config.all_themes()]
}

