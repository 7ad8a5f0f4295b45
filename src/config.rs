//! Run configuration from `dezmap.yaml`.
//!
//! Values are resolved with precedence CLI > environment > config file >
//! default. Every key in the file is optional:
//!
//! ```yaml
//! output_dir: outputs
//! format: xlsx        # or json
//! sheet_name: "Transformation - Sourcing (1)"
//! author: Automated
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::sink::xlsx::{DEFAULT_AUTHOR, DEFAULT_SHEET_NAME};
use crate::sink::XlsxLayout;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dezmap.yaml";

pub const OUTPUT_DIR_ENV: &str = "DEZMAP_OUTPUT_DIR";
pub const FORMAT_ENV: &str = "DEZMAP_FORMAT";

/// Kind of document written per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.extension().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MappingConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_author")]
    pub author: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: OutputFormat::default(),
            sheet_name: default_sheet_name(),
            author: default_author(),
        }
    }
}

impl MappingConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load the explicit `--config` file, or `dezmap.yaml` when it exists, or
    /// fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!(path = DEFAULT_CONFIG_FILE, "Loading config file");
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `DEZMAP_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `DEZMAP_*` overrides using `lookup` to read variables.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(output_dir = %dir, "Using output directory from {}", OUTPUT_DIR_ENV);
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup(FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(format = %format, "Using format from {}", FORMAT_ENV);
            self.format = format.parse()?;
        }
        Ok(self)
    }

    /// Apply command-line overrides (highest priority).
    pub fn with_cli(mut self, output_dir: Option<PathBuf>, format: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(format) = format {
            self.format = format.parse()?;
        }
        Ok(self)
    }

    pub fn xlsx_layout(&self) -> XlsxLayout {
        XlsxLayout {
            sheet_name: self.sheet_name.clone(),
            author: self.author.clone(),
        }
    }
}
