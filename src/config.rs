//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.jtlreport.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".jtlreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input log settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Settings for reading the results log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field delimiter of the log (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Show a spinner while reading samples.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            show_progress: true,
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

impl InputConfig {
    /// The delimiter as a byte, as the CSV reader expects it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => anyhow::bail!(
                "Input delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Document title and main heading of the HTML report.
    #[serde(default = "default_title")]
    pub title: String,

    /// Number of slowest transactions printed after the run.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Script URL of the charting library.
    #[serde(default = "default_plotly_cdn_url")]
    pub plotly_cdn_url: String,

    /// Bar color of the average response time chart.
    #[serde(default = "default_avg_color")]
    pub avg_color: String,

    /// Bar color of the error percentage chart.
    #[serde(default = "default_error_color")]
    pub error_color: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            top_n: default_top_n(),
            plotly_cdn_url: default_plotly_cdn_url(),
            avg_color: default_avg_color(),
            error_color: default_error_color(),
        }
    }
}

fn default_title() -> String {
    "JMeter Aggregate Report".to_string()
}

fn default_top_n() -> usize {
    3
}

fn default_plotly_cdn_url() -> String {
    "https://cdn.plot.ly/plotly-latest.min.js".to_string()
}

fn default_avg_color() -> String {
    "indianred".to_string()
}

fn default_error_color() -> String {
    "crimson".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Quiet mode also silences the loader spinner
        if args.quiet {
            self.input.show_progress = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
