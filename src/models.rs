//! Data models for consultation statistics.
//!
//! This module contains the record structures read from the input
//! dataset and the report structures produced by the analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Age band assigned to a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// Aged 12 or younger
    Child,
    /// Aged 13 to 19
    Teen,
    /// Aged 20 to 59
    Adult,
    /// Aged 60 or older
    Senior,
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeGroup::Child => write!(f, "Child"),
            AgeGroup::Teen => write!(f, "Teen"),
            AgeGroup::Adult => write!(f, "Adult"),
            AgeGroup::Senior => write!(f, "Senior"),
        }
    }
}

impl AgeGroup {
    /// Classify an age in whole years. Bands are inclusive.
    pub fn from_age(age: i32) -> Self {
        match age {
            a if a <= 12 => AgeGroup::Child,
            13..=19 => AgeGroup::Teen,
            20..=59 => AgeGroup::Adult,
            _ => AgeGroup::Senior,
        }
    }
}

/// Demographic fields checked for completeness.
///
/// Variant order is the order the fields appear in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DemographicField {
    FirstName,
    LastName,
    BirthDate,
}

impl DemographicField {
    /// All fields, in report order.
    pub const ALL: [DemographicField; 3] = [
        DemographicField::FirstName,
        DemographicField::LastName,
        DemographicField::BirthDate,
    ];
}

impl fmt::Display for DemographicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemographicField::FirstName => write!(f, "firstName"),
            DemographicField::LastName => write!(f, "lastName"),
            DemographicField::BirthDate => write!(f, "birthDate"),
        }
    }
}

/// Demographic details of the patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// ISO-8601 date or date-time, possibly with a trailing `Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Fields this tool does not interpret, kept for the annotated export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientDetails {
    /// Returns the value of a demographic field, treating empty strings as absent.
    pub fn field(&self, field: DemographicField) -> Option<&str> {
        let value = match field {
            DemographicField::FirstName => &self.first_name,
            DemographicField::LastName => &self.last_name,
            DemographicField::BirthDate => &self.birth_date,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Returns the gender, treating an empty string as absent.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref().filter(|g| !g.is_empty())
    }
}

/// Deserialize a field, reading an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A prescribed medicine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Medicine {
    /// Whether the medicine is marked active. Absent counts as inactive.
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }
}

/// Clinical data recorded during the consultation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub medicines: Vec<Medicine>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One patient consultation entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient_details: PatientDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_data: Option<ConsultationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Set by the age-group pass; `None` when the age is undefined.
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
    /// Set by the phone validation pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid_mobile: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Medicines prescribed in this consultation (empty when absent).
    pub fn medicines(&self) -> &[Medicine] {
        self.consultation_data
            .as_ref()
            .map(|c| c.medicines.as_slice())
            .unwrap_or(&[])
    }

    /// Number of medicines prescribed.
    pub fn medicine_count(&self) -> usize {
        self.medicines().len()
    }
}

/// The computed statistics. Serializes to the nine-key result mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// Missing-value percentage per demographic field.
    pub missing_percentages: BTreeMap<DemographicField, f64>,
    /// Percentage of records with gender `F` after imputation.
    pub percentage_female: f64,
    /// Number of records classified as adults.
    pub adult_count: usize,
    /// Mean number of medicines per record.
    pub average_medicines: f64,
    /// Medicine name ranked third by prescription frequency.
    pub third_most_frequent_medicine: Option<String>,
    pub active_percentage: f64,
    pub inactive_percentage: f64,
    /// Number of records with a valid mobile number.
    pub valid_phone_count: usize,
    /// Pearson correlation between age and medicine count.
    pub pearson_correlation: Option<f64>,
}

/// Metadata about a report run, shown in the Markdown report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the records were read from.
    pub input: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records analyzed.
    pub record_count: usize,
    /// Year ages were computed against.
    pub reference_year: i32,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}
