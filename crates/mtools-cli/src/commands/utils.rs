use std::path::{Path, PathBuf};

use mtools_config::{ConfigOverrides, MaterialToolsConfig};
use mtools_resolver::PackageResolver;

use crate::cli::Cli;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Global options every command runs with.
#[derive(Debug, Clone)]
pub struct Session {
    pub working_dir: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let current = std::env::current_dir().with_path(".")?;
        let working_dir = match &cli.cwd {
            Some(cwd) => current.join(cwd),
            None => current,
        };
        Ok(Self {
            working_dir,
            config_path: cli.config.clone(),
        })
    }

    /// Config layered from the project files, environment and `overrides`.
    pub fn config(&self, overrides: &ConfigOverrides) -> Result<MaterialToolsConfig> {
        Ok(MaterialToolsConfig::load(
            &self.working_dir,
            self.config_path.as_deref(),
            overrides,
        )?)
    }

    /// The library file to execute: `entry` when given, otherwise the main
    /// file of the configured version.
    pub fn library_entry(&self, config: &MaterialToolsConfig, entry: Option<&Path>) -> Result<PathBuf> {
        if let Some(entry) = entry {
            return Ok(self.working_dir.join(entry));
        }
        let package = PackageResolver::new(&self.working_dir)
            .resolve(&config.version, &self.working_dir.join(&config.cache))?;
        Ok(package.module.join(&config.main_filename))
    }

    /// Writes `content` to `output`, or prints it when there is none.
    pub async fn emit(&self, output: Option<&Path>, content: &str) -> Result<()> {
        let Some(output) = output else {
            println!("{content}");
            return Ok(());
        };

        let path = self.working_dir.join(output);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.with_path(parent)?;
        }
        tokio::fs::write(&path, content).await.with_path(&path)?;
        ui::success(&format!("Wrote {}", path.display()));
        Ok(())
    }
}
