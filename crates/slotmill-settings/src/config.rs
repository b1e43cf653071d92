//! Configuration management for SlotMill
//!
//! A configuration file holds everything needed for an unattended run:
//! - Toolpath parameters (slot endpoints, depths, feeds, tool)
//! - Program options (units, comments, multi-pass)
//! - Output target (console or a directory on disk)
//!
//! Files may be TOML or JSON, chosen by extension. Missing keys fall back to
//! the built-in defaults.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use slotmill_camtools::emitter::is_plain_file_name;
use slotmill_camtools::{ConsoleEmitter, FileEmitter, ProgramEmitter, ProgramOptions};
use slotmill_core::{ToolpathParameters, ToolpathParametersBuilder};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest number of decimals accepted for feed words
pub const MAX_FEED_DECIMALS: usize = 4;

/// Where generated programs go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Print to stdout
    #[default]
    Console,
    /// Write a file into the output directory
    File,
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Console or file output
    pub target: OutputTarget,
    /// Directory for file output
    pub directory: PathBuf,
    /// Fixed file name; a `yyyyMMdd-HHmmss.txt` timestamp is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            target: OutputTarget::Console,
            directory: PathBuf::from("."),
            file_name: None,
        }
    }
}

impl OutputSettings {
    /// Build the emitter selected by these settings
    pub fn emitter(&self) -> Box<dyn ProgramEmitter> {
        match self.target {
            OutputTarget::Console => Box::new(ConsoleEmitter::stdout()),
            OutputTarget::File => {
                let emitter = FileEmitter::new(self.directory.clone());
                match &self.file_name {
                    Some(name) => Box::new(emitter.with_file_name(name.clone())),
                    None => Box::new(emitter),
                }
            }
        }
    }
}

/// Complete SlotMill configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Machining parameters, validated when converted
    pub toolpath: ToolpathParametersBuilder,
    /// Program formatting conventions
    pub program: ProgramOptions,
    /// Output destination
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/slotmill/config.toml`)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("slotmill");
        path.push("config.toml");
        path
    }

    /// Load from `path`, or from the default location when it exists
    ///
    /// Falls back to built-in defaults when no path is given and no default
    /// file is present.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    Self::load_from_file(&default_path)
                } else {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate all sections
    pub fn validate(&self) -> SettingsResult<()> {
        self.toolpath.validate()?;

        if self.program.comment_column == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "program.comment_column".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.program.feed_decimals > MAX_FEED_DECIMALS {
            return Err(SettingsError::InvalidSetting {
                key: "program.feed_decimals".to_string(),
                reason: format!("must be at most {}", MAX_FEED_DECIMALS),
            });
        }

        if !self.program.side_allowance.is_finite() {
            return Err(SettingsError::InvalidSetting {
                key: "program.side_allowance".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        if self.output.target == OutputTarget::File
            && self.output.directory.as_os_str().is_empty()
        {
            return Err(SettingsError::InvalidSetting {
                key: "output.directory".to_string(),
                reason: "required for file output".to_string(),
            });
        }

        if let Some(name) = &self.output.file_name {
            if !is_plain_file_name(name) {
                return Err(SettingsError::InvalidSetting {
                    key: "output.file_name".to_string(),
                    reason: format!("'{}' is not a plain file name", name),
                });
            }
        }

        Ok(())
    }

    /// Validated toolpath parameters
    pub fn to_parameters(&self) -> SettingsResult<ToolpathParameters> {
        Ok(self.toolpath.clone().build()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
