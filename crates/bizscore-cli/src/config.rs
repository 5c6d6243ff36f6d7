//! Configuration management for the CLI.
//!
//! One TOML file holds both the pipeline sections (`[stages.*]`,
//! `[validation]`, `[scoring]`, ...) and an `[output]` section for the CLI.
//! Each side ignores the other's sections.

use crate::cli::PresetArg;
use crate::error::{CliError, Result};
use bizscore_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI output settings (`[output]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    output: Settings,
}

/// Effective configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,

    /// Pipeline configuration
    pub pipeline: PipelineConfig,

    /// Output settings
    pub settings: Settings,
}

impl Config {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".bizscore").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise built-in defaults. A preset replaces the pipeline
    /// sections of the file.
    pub fn load(explicit: Option<&Path>, preset: Option<PresetArg>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().ok().filter(|p| p.exists()),
        };

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(preset) = preset {
            config.pipeline = match preset {
                PresetArg::Default => PipelineConfig::default(),
                PresetArg::Strict => PipelineConfig::strict(),
                PresetArg::Lenient => PipelineConfig::lenient(),
            };
        }
        Ok(config)
    }

    /// Read configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings: SettingsFile = toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("Invalid [output] section: {}", e)))?;

        Ok(Self {
            source: Some(path.to_path_buf()),
            pipeline: PipelineConfig::from_toml(&contents)?,
            settings: settings.output,
        })
    }

    /// Render the full configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        let pipeline = self.pipeline.to_toml()?;
        let output = toml::to_string_pretty(&SettingsFile {
            output: self.settings.clone(),
        })
        .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        Ok(format!("{}\n{}", output.trim_end(), pipeline))
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            pipeline: PipelineConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.source.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.pipeline = PipelineConfig::lenient();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path), None).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.pipeline, PipelineConfig::lenient());
    }

    #[test]
    fn test_preset_replaces_file_pipeline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\ncolor = false\n\n[batch]\nconcurrency = 9\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.pipeline.batch.concurrency, 9);

        let config = Config::load(Some(&path), Some(PresetArg::Strict)).unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.pipeline, PipelineConfig::strict());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/bizscore.toml")), None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
