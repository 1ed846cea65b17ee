//! Demographic completeness and gender statistics.

use super::percentage;
use crate::models::{DemographicField, Record};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Gender value counted as female.
pub const FEMALE: &str = "F";

/// Percentage of records missing each demographic field.
///
/// Absent, null and empty values all count as missing. An empty
/// collection yields 0 for every field.
pub fn missing_percentages(records: &[Record]) -> BTreeMap<DemographicField, f64> {
    DemographicField::ALL
        .iter()
        .map(|&field| {
            let missing = records
                .iter()
                .filter(|r| r.patient_details.field(field).is_none())
                .count();
            debug!("{} missing in {} of {} records", field, missing, records.len());
            (field, percentage(missing, records.len()))
        })
        .collect()
}

/// Most frequent uppercased gender among records that have one.
///
/// Ties go to the value seen first in input order. `None` when no
/// record carries a gender.
pub fn gender_mode(records: &[Record]) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for gender in records.iter().filter_map(|r| r.patient_details.gender()) {
        let normalized = gender.to_uppercase();
        let count = counts.entry(normalized.clone()).or_insert(0);
        if *count == 0 {
            order.push(normalized);
        }
        *count += 1;
    }

    let mut best: Option<(&String, usize)> = None;
    for value in &order {
        let count = counts[value];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.clone())
}

/// Fill missing genders with the mode. Returns the mode used and how
/// many records were filled.
///
/// Nothing is filled when no record has a gender.
pub fn impute_gender(records: &mut [Record]) -> (Option<String>, usize) {
    let mode = gender_mode(records);
    let mut imputed = 0;

    if let Some(ref value) = mode {
        for record in records.iter_mut() {
            if record.patient_details.gender().is_none() {
                record.patient_details.gender = Some(value.clone());
                imputed += 1;
            }
        }
    }

    debug!("Gender mode {:?}, imputed {} records", mode, imputed);
    (mode, imputed)
}

/// Percentage of records whose gender is exactly `F`.
///
/// The comparison is case-sensitive; run [`impute_gender`] first.
pub fn percentage_female(records: &[Record]) -> f64 {
    let female = records
        .iter()
        .filter(|r| r.patient_details.gender() == Some(FEMALE))
        .count();
    percentage(female, records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientDetails;

    fn person(first: Option<&str>, last: Option<&str>, birth: Option<&str>, gender: Option<&str>) -> Record {
        Record {
            patient_details: PatientDetails {
                first_name: first.map(String::from),
                last_name: last.map(String::from),
                birth_date: birth.map(String::from),
                gender: gender.map(String::from),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn with_gender(gender: Option<&str>) -> Record {
        person(None, None, None, gender)
    }

    #[test]
    fn test_missing_percentages() {
        let records = vec![
            person(Some("Asha"), Some("Rao"), Some("1990-01-01"), None),
            person(Some(""), Some("Kumar"), None, None),
            person(None, None, Some("2001-01-01"), None),
            person(Some("Ravi"), Some("Iyer"), Some("1980-01-01"), None),
        ];

        let missing = missing_percentages(&records);

        assert_eq!(missing[&DemographicField::FirstName], 50.0);
        assert_eq!(missing[&DemographicField::LastName], 25.0);
        assert_eq!(missing[&DemographicField::BirthDate], 25.0);
    }

    #[test]
    fn test_missing_percentages_empty() {
        let missing = missing_percentages(&[]);
        assert_eq!(missing.len(), 3);
        assert!(missing.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_gender_mode_uppercases() {
        let records = vec![
            with_gender(Some("m")),
            with_gender(Some("F")),
            with_gender(Some("M")),
            with_gender(None),
        ];
        assert_eq!(gender_mode(&records), Some("M".to_string()));
    }

    #[test]
    fn test_gender_mode_tie_prefers_first_seen() {
        let records = vec![
            with_gender(Some("f")),
            with_gender(Some("M")),
            with_gender(Some("m")),
            with_gender(Some("F")),
        ];
        assert_eq!(gender_mode(&records), Some("F".to_string()));
    }

    #[test]
    fn test_impute_gender_fills_missing() {
        let mut records = vec![
            with_gender(Some("F")),
            with_gender(None),
            with_gender(Some("")),
            with_gender(Some("M")),
            with_gender(Some("f")),
        ];

        let (mode, imputed) = impute_gender(&mut records);

        assert_eq!(mode.as_deref(), Some("F"));
        assert_eq!(imputed, 2);
        assert!(records.iter().all(|r| r.patient_details.gender().is_some()));
        // Existing values keep their original case.
        assert_eq!(records[4].patient_details.gender(), Some("f"));
    }

    #[test]
    fn test_impute_gender_is_idempotent() {
        let mut records = vec![with_gender(Some("M")), with_gender(None)];

        impute_gender(&mut records);
        let after_first = records.clone();
        let (_, imputed) = impute_gender(&mut records);

        assert_eq!(imputed, 0);
        assert_eq!(records, after_first);
    }

    #[test]
    fn test_impute_gender_without_any_gender() {
        let mut records = vec![with_gender(None), with_gender(Some(""))];

        let (mode, imputed) = impute_gender(&mut records);

        assert_eq!(mode, None);
        assert_eq!(imputed, 0);
        assert_eq!(percentage_female(&records), 0.0);
    }

    #[test]
    fn test_percentage_female_is_case_sensitive() {
        let records = vec![
            with_gender(Some("F")),
            with_gender(Some("f")),
            with_gender(Some("M")),
            with_gender(Some("F")),
        ];
        assert_eq!(percentage_female(&records), 50.0);
    }
}
