//! Report generation.
//!
//! This module renders the computed statistics as JSON or Markdown and
//! exports the annotated record set.

use crate::models::{Record, ReportMetadata, StatisticsReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Placeholder for statistics that could not be computed.
const NOT_AVAILABLE: &str = "n/a";

/// Generate the JSON result mapping.
pub fn generate_json_report(report: &StatisticsReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &StatisticsReport, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# Consultation Statistics Report\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_completeness_section(report));
    output.push_str(&generate_demographics_section(report));
    output.push_str(&generate_prescriptions_section(report));
    output.push_str(&generate_contact_section(report));
    output.push_str(&generate_correlation_section(report));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!("- **Reference Year:** {}\n", metadata.reference_year));
    section.push_str(&format!("- **Duration:** {:.3}s\n", metadata.duration_seconds));
    section.push('\n');

    section
}

/// Generate the data completeness section.
fn generate_completeness_section(report: &StatisticsReport) -> String {
    let mut section = String::new();

    section.push_str("## Data Completeness\n\n");
    section.push_str("| Field | Missing |\n");
    section.push_str("|:---|---:|\n");
    for (field, pct) in &report.missing_percentages {
        section.push_str(&format!("| `{}` | {:.2}% |\n", field, pct));
    }
    section.push('\n');

    section
}

fn generate_demographics_section(report: &StatisticsReport) -> String {
    let mut section = String::new();

    section.push_str("## Demographics\n\n");
    section.push_str(&format!(
        "- **Female (after imputation):** {:.2}%\n",
        report.percentage_female
    ));
    section.push_str(&format!("- **Adults (20-59):** {}\n", report.adult_count));
    section.push('\n');

    section
}

fn generate_prescriptions_section(report: &StatisticsReport) -> String {
    let mut section = String::new();

    section.push_str("## Prescriptions\n\n");
    section.push_str(&format!(
        "- **Average Medicines per Consultation:** {:.2}\n",
        report.average_medicines
    ));
    section.push_str(&format!(
        "- **Third Most Frequent Medicine:** {}\n",
        report
            .third_most_frequent_medicine
            .as_deref()
            .unwrap_or(NOT_AVAILABLE)
    ));
    section.push('\n');

    section.push_str("| Active | Inactive |\n");
    section.push_str("|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.2}% | {:.2}% |\n\n",
        report.active_percentage, report.inactive_percentage
    ));

    section
}

fn generate_contact_section(report: &StatisticsReport) -> String {
    format!(
        "## Contact Data\n\n- **Valid Mobile Numbers:** {}\n\n",
        report.valid_phone_count
    )
}

fn generate_correlation_section(report: &StatisticsReport) -> String {
    let value = match report.pearson_correlation {
        Some(r) => format!("{:.4}", r),
        None => NOT_AVAILABLE.to_string(),
    };
    format!("## Correlation\n\n- **Age vs. Medicine Count (Pearson r):** {}\n\n", value)
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by rxstats*\n".to_string()
}

/// Write the annotated records as pretty JSON.
pub fn write_annotated_records(records: &[Record], path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(records)
        .context("Failed to serialize annotated records")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write annotated records to {}", path.display()))?;

    Ok(())
}
