//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dataset::STDIN_PATH;

/// rxstats - descriptive statistics over patient consultation records
///
/// Reads a JSON array of consultation records and reports missing
/// demographics, gender split, adult count, prescription statistics,
/// valid mobile numbers and the age/medicine-count correlation.
///
/// Examples:
///   rxstats consultations.json
///   rxstats consultations.json --format markdown -o report.md
///   rxstats consultations.json --reference-year 2024 --annotated annotated.json
///   cat consultations.json | rxstats -
///   rxstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON dataset to analyze, or `-` to read standard input
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// If not specified, the report is written to standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (json, markdown)
    ///
    /// Overrides the format set in the configuration file
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .rxstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Year ages are computed against (defaults to the current year)
    #[arg(long, value_name = "YEAR", env = "RXSTATS_REFERENCE_YEAR")]
    pub reference_year: Option<i32>,

    /// Also write the annotated records (imputed gender, ageGroup,
    /// isValidMobile) to this file
    #[arg(long, value_name = "FILE")]
    pub annotated: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .rxstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// Markdown format
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path of the dataset, or `-` for stdin.
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| PathBuf::from(STDIN_PATH))
    }

    /// Human-readable name of the input source.
    pub fn input_label(&self) -> String {
        let path = self.input_path();
        if path.as_os_str() == STDIN_PATH {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        }
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate reference year
        if let Some(year) = self.reference_year {
            if !(1..=9999).contains(&year) {
                return Err("Reference year must be between 1 and 9999".to_string());
            }
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if input.as_os_str() != STDIN_PATH {
                if !input.exists() {
                    return Err(format!("Input file does not exist: {}", input.display()));
                }
                if !input.is_file() {
                    return Err(format!("Input path is not a file: {}", input.display()));
                }
            }
        }

        // The report and the annotated export must not clobber each other
        if let (Some(output), Some(annotated)) = (&self.output, &self.annotated) {
            if output == annotated {
                return Err("--output and --annotated must be different files".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
