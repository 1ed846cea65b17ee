//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.rxstats.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".rxstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Mobile number validation settings.
    #[serde(default)]
    pub phone: PhoneConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Year ages are computed against. Defaults to the current year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

/// Mobile number validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneConfig {
    /// Country code stripped before validation (`+` form tried first).
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Required digit count after stripping.
    #[serde(default = "default_digits")]
    pub digits: usize,

    /// Smallest valid number (inclusive).
    #[serde(default = "default_min_number")]
    pub min_number: u64,

    /// Largest valid number (inclusive).
    #[serde(default = "default_max_number")]
    pub max_number: u64,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            digits: default_digits(),
            min_number: default_min_number(),
            max_number: default_max_number(),
        }
    }
}

fn default_country_code() -> String {
    "91".to_string()
}

fn default_digits() -> usize {
    10
}

fn default_min_number() -> u64 {
    6_000_000_000
}

fn default_max_number() -> u64 {
    9_999_999_999
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        if self.phone.digits == 0 {
            anyhow::bail!("phone.digits must be at least 1");
        }
        if self.phone.min_number > self.phone.max_number {
            anyhow::bail!(
                "phone.min_number ({}) is greater than phone.max_number ({})",
                self.phone.min_number,
                self.phone.max_number
            );
        }
        if !self.phone.country_code.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("phone.country_code must contain digits only");
        }
        if let Some(year) = self.general.reference_year {
            if !(1..=9999).contains(&year) {
                anyhow::bail!("general.reference_year must be between 1 and 9999, got {}", year);
            }
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(year) = args.reference_year {
            self.general.reference_year = Some(year);
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
