//! Statistics pipeline.
//!
//! This module runs every pass over the record collection in order and
//! assembles the [`StatisticsReport`].

use super::age::assign_age_groups;
use super::correlation::age_medicine_correlation;
use super::demographics::{impute_gender, missing_percentages, percentage_female};
use super::medicines::{
    activity_distribution, average_medicines, nth_most_frequent_medicine, REPORTED_RANK,
};
use super::phone::{annotate_phone_validity, PhoneRules};
use crate::config::Config;
use crate::models::{Record, StatisticsReport};
use chrono::{Datelike, Utc};
use tracing::{debug, info};

/// Inputs to the pipeline besides the records themselves.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Year ages are computed against.
    pub reference_year: i32,
    /// Mobile number rules.
    pub phone: PhoneRules,
}

impl From<&Config> for AnalysisOptions {
    fn from(config: &Config) -> Self {
        Self {
            reference_year: config.general.reference_year.unwrap_or_else(current_year),
            phone: PhoneRules::from(&config.phone),
        }
    }
}

/// Current calendar year in UTC.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Compute all statistics.
///
/// Gender imputation runs before the female count, and the age-group
/// and phone passes annotate each record as they go. Passes that see
/// no usable data fall back to 0 or `None` on their own.
pub fn compute_report(records: &mut [Record], options: &AnalysisOptions) -> StatisticsReport {
    info!(
        "Analyzing {} records (reference year {})",
        records.len(),
        options.reference_year
    );

    let missing_percentages = missing_percentages(records);

    let (mode, imputed) = impute_gender(records);
    if imputed > 0 {
        info!("Imputed gender {:?} for {} records", mode.unwrap_or_default(), imputed);
    }
    let percentage_female = percentage_female(records);

    let age_groups = assign_age_groups(records, options.reference_year);

    let average_medicines = average_medicines(records);
    let third_most_frequent_medicine = nth_most_frequent_medicine(records, REPORTED_RANK);
    let activity = activity_distribution(records);
    debug!(
        "{} active, {} inactive medicines",
        activity.active, activity.inactive
    );

    let valid_phone_count = annotate_phone_validity(records, &options.phone);

    let pearson_correlation = age_medicine_correlation(records, options.reference_year);
    debug!("Pearson correlation: {:?}", pearson_correlation);

    StatisticsReport {
        missing_percentages,
        percentage_female,
        adult_count: age_groups.adult,
        average_medicines,
        third_most_frequent_medicine,
        active_percentage: activity.active_percentage,
        inactive_percentage: activity.inactive_percentage,
        valid_phone_count,
        pearson_correlation,
    }
}
