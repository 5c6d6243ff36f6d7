//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::PathBuf;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    explicit_path: Option<PathBuf>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            if let Some(source) = &config.source {
                eprintln!("{}", formatter.info(&format!("Loaded from {}", source.display())));
            }
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = resolve_path(explicit_path)?;
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            let path = resolve_path(explicit_path)?;
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save(&path)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", path.display()))
            );
        }
    }
    Ok(())
}

fn resolve_path(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) => Ok(path),
        None => Config::default_path(),
    }
}
