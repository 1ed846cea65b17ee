//! rxstats - descriptive statistics over patient consultation records
//!
//! A CLI tool that loads a JSON array of consultation records, imputes
//! and annotates them, and reports a fixed set of statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, unreadable dataset, write failure)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use analysis::AnalysisOptions;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::ReportMetadata;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` can apply
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("rxstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config) {
        error!("Run failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .rxstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the reference year, phone rules and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr; stdout is reserved for the report.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, compute the statistics and write the outputs.
fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load every record before computing anything
    let input = args.input_path();
    let mut records = dataset::load_records(&input)?;

    // Step 2: Run the statistics pipeline
    let options = AnalysisOptions::from(config);
    let stats = analysis::compute_report(&mut records, &options);

    // Step 3: Render the report
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&stats, config.report.pretty)?,
        OutputFormat::Markdown => {
            let metadata = ReportMetadata {
                input: args.input_label(),
                generated_at: Utc::now(),
                record_count: records.len(),
                reference_year: options.reference_year,
                duration_seconds: start_time.elapsed().as_secs_f64(),
            };
            report::generate_markdown_report(&stats, &metadata)
        }
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", output.trim_end()).context("Failed to write report to stdout")?;
        }
    }

    // Step 4: Optional annotated export
    if let Some(ref path) = args.annotated {
        report::write_annotated_records(&records, path)?;
        info!("Annotated records written to {}", path.display());
    }

    if records.is_empty() {
        warn!("Dataset contained no records; all statistics use their defaults");
    }

    if !args.quiet {
        print_summary(args, &stats, records.len(), start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Print a short run summary to stderr.
fn print_summary(args: &Args, stats: &models::StatisticsReport, record_count: usize, duration: f64) {
    eprintln!("\nSummary:");
    eprintln!("   Records: {}", record_count);
    eprintln!("   Female (after imputation): {:.2}%", stats.percentage_female);
    eprintln!("   Adults: {}", stats.adult_count);
    eprintln!("   Average medicines: {:.2}", stats.average_medicines);
    eprintln!("   Valid mobile numbers: {}", stats.valid_phone_count);
    eprintln!("   Duration: {:.3}s", duration);
    if let Some(ref path) = args.output {
        eprintln!("\nReport saved to: {}", path.display());
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        // An explicit path must load
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("Warning: ignoring {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}
