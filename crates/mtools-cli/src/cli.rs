//! Command-line interface definition.
//!
//! - `mtools deps` - print the resolved component dependencies as JSON
//! - `mtools files` - print the files of the resolved components as JSON
//! - `mtools theme` - print a static theme stylesheet

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mtools_config::ConfigOverrides;
use mtools_theme::{PaletteRole, ThemeSpec};

/// Custom builds of the Material component library
#[derive(Parser, Debug)]
#[command(
    name = "mtools",
    version,
    about = "Custom builds of the Material component library",
    long_about = "Resolves the component dependencies of a Material library version by executing\n\
                  the library in a sandbox, locates the files of the selected components and\n\
                  generates static theme stylesheets with the library's own theming service."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to load instead of mtools.toml / mtools.json
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dependency closure of the selected components
    Deps(DepsArgs),

    /// Print the source files of the selected components
    Files(FilesArgs),

    /// Generate a static theme stylesheet
    Theme(ThemeArgs),
}

/// Options shared by every command, layered over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Library version, or `local` for the installed package
    #[arg(long = "material-version", value_name = "VERSION")]
    pub material_version: Option<String>,

    /// Components to include (comma separated). Defaults to all of them
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub modules: Vec<String>,

    /// Components to leave out (comma separated)
    #[arg(long = "exclude", value_delimiter = ',', num_args = 1..)]
    pub exclude_modules: Vec<String>,

    /// Directory holding downloaded versions
    #[arg(long, value_name = "DIR")]
    pub cache: Option<PathBuf>,

    /// Library file used to capture the module registrations
    #[arg(long, value_name = "NAME")]
    pub main_filename: Option<String>,

    /// Name of the library's aggregate module
    #[arg(long, value_name = "NAME")]
    pub main_module: Option<String>,

    /// Target directory for written build output
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Base for the output file names
    #[arg(long, value_name = "NAME")]
    pub destination_filename: Option<String>,
}

impl BuildArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            version: self.material_version.clone(),
            cache: self.cache.clone(),
            modules: (!self.modules.is_empty()).then(|| self.modules.clone()),
            exclude_modules: (!self.exclude_modules.is_empty()).then(|| self.exclude_modules.clone()),
            main_filename: self.main_filename.clone(),
            main_module: self.main_module.clone(),
            destination: self.destination.clone(),
            destination_filename: self.destination_filename.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DepsArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Library file to execute instead of the resolved version's main file
    #[arg(long, value_name = "FILE")]
    pub entry: Option<PathBuf>,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FilesArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Palette flags take several values; the n-th values of all flags form the
/// n-th theme.
#[derive(Args, Debug, Clone, Default)]
pub struct ThemeArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Library file to execute instead of the resolved version's main file
    #[arg(long, value_name = "FILE")]
    pub entry: Option<PathBuf>,

    /// Primary palette color
    #[arg(long, alias = "primary", num_args = 1.., value_name = "PALETTE")]
    pub primary_palette: Vec<String>,

    /// Accent palette color
    #[arg(long, alias = "accent", num_args = 1.., value_name = "PALETTE")]
    pub accent_palette: Vec<String>,

    /// Warning palette color
    #[arg(long, alias = "warn", num_args = 1.., value_name = "PALETTE")]
    pub warn_palette: Vec<String>,

    /// Background palette color
    #[arg(long, alias = "background", num_args = 1.., value_name = "PALETTE")]
    pub background_palette: Vec<String>,

    /// Generate dark themes
    #[arg(long)]
    pub dark: bool,

    /// Theme stylesheet template replacing the library's own
    #[arg(long, value_name = "FILE")]
    pub css: Option<PathBuf>,

    /// Write the stylesheet to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the stylesheet to `<destination>/<destination-filename>.themes.css`
    #[arg(short, long, conflicts_with = "output")]
    pub write: bool,
}

impl ThemeArgs {
    /// Themes described on the command line, or none when no theming flag
    /// was given.
    pub fn themes(&self) -> Vec<ThemeSpec> {
        let palettes = [
            (PaletteRole::Primary, &self.primary_palette),
            (PaletteRole::Accent, &self.accent_palette),
            (PaletteRole::Warn, &self.warn_palette),
            (PaletteRole::Background, &self.background_palette),
        ];
        let count = palettes.iter().map(|(_, values)| values.len()).max().unwrap_or(0);

        if count == 0 {
            return if self.dark {
                vec![ThemeSpec::default().dark(true)]
            } else {
                Vec::new()
            };
        }

        (0..count)
            .map(|index| {
                palettes
                    .iter()
                    .fold(ThemeSpec::default().dark(self.dark), |theme, (role, values)| {
                        match values.get(index) {
                            Some(palette) => theme.with_palette(*role, palette.as_str()),
                            None => theme,
                        }
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_deps() {
        let cli = Cli::try_parse_from([
            "mtools",
            "deps",
            "-m",
            "list,button",
            "--exclude",
            "gestures",
            "--material-version",
            "1.1.0",
        ])
        .unwrap();

        let Command::Deps(args) = cli.command else {
            panic!("expected deps");
        };
        let overrides = args.build.overrides();
        assert_eq!(overrides.modules, Some(vec!["list".to_string(), "button".to_string()]));
        assert_eq!(overrides.exclude_modules, Some(vec!["gestures".to_string()]));
        assert_eq!(overrides.version.as_deref(), Some("1.1.0"));
        assert_eq!(overrides.cache, None);
    }

    #[test]
    fn test_parse_theme_write() {
        let cli = Cli::try_parse_from(["mtools", "theme", "--write", "-d", "dist", "--destination-filename", "site"])
            .unwrap();
        let Command::Theme(args) = cli.command else {
            panic!("expected theme");
        };
        assert!(args.write);
        let overrides = args.build.overrides();
        assert_eq!(overrides.destination, Some(PathBuf::from("dist")));
        assert_eq!(overrides.destination_filename.as_deref(), Some("site"));

        assert!(Cli::try_parse_from(["mtools", "theme", "--write", "-o", "out.css"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mtools", "-v", "-q", "files"]).is_err());
    }

    #[test]
    fn test_palette_values_are_zipped_into_themes() {
        let cli = Cli::try_parse_from([
            "mtools",
            "theme",
            "--primary-palette",
            "teal",
            "amber",
            "--accent",
            "pink",
            "--dark",
        ])
        .unwrap();
        let Command::Theme(args) = cli.command else {
            panic!("expected theme");
        };

        let themes = args.themes();
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].palette(PaletteRole::Primary).name(), "teal");
        assert_eq!(themes[0].palette(PaletteRole::Accent).name(), "pink");
        assert_eq!(themes[1].palette(PaletteRole::Primary).name(), "amber");
        assert_eq!(themes[1].palette(PaletteRole::Accent).name(), "pink");
        assert!(themes.iter().all(|theme| theme.dark));
    }

    #[test]
    fn test_no_theming_flags() {
        assert!(ThemeArgs::default().themes().is_empty());

        let dark = ThemeArgs {
            dark: true,
            ..ThemeArgs::default()
        };
        assert_eq!(dark.themes(), vec![ThemeSpec::default().dark(true)]);
    }
}
