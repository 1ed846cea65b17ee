//! Age derivation and age-group classification.

use crate::models::{AgeGroup, DemographicField, Record};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Date-time layouts accepted for birth dates (after `Z` is stripped).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-time layouts carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Count of records per age group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeGroupCounts {
    pub child: usize,
    pub teen: usize,
    pub adult: usize,
    pub senior: usize,
}

impl AgeGroupCounts {
    fn record(&mut self, group: AgeGroup) {
        match group {
            AgeGroup::Child => self.child += 1,
            AgeGroup::Teen => self.teen += 1,
            AgeGroup::Adult => self.adult += 1,
            AgeGroup::Senior => self.senior += 1,
        }
    }

    /// Number of records that received a group.
    pub fn total(&self) -> usize {
        self.child + self.teen + self.adult + self.senior
    }
}

/// Extract the calendar year from an ISO-8601 date or date-time.
///
/// Every `Z` is removed before parsing. Returns `None` for anything that
/// does not parse.
pub fn parse_birth_year(raw: &str) -> Option<i32> {
    let cleaned = raw.replace('Z', "");
    let cleaned = cleaned.trim();

    if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
        return Some(date.year());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Some(datetime.year());
        }
    }

    // The year is taken from the local time as written, not converted to UTC.
    for format in OFFSET_FORMATS {
        if let Ok(datetime) = DateTime::parse_from_str(cleaned, format) {
            return Some(datetime.naive_local().year());
        }
    }

    None
}

/// Age in whole years at `reference_year`, ignoring month and day.
///
/// `None` when the birth date is absent, empty, or unparseable.
pub fn age_from_birth_date(birth_date: Option<&str>, reference_year: i32) -> Option<i32> {
    let raw = birth_date.filter(|b| !b.is_empty())?;
    reference_year.checked_sub(parse_birth_year(raw)?)
}

/// Age of the patient behind a record.
pub fn record_age(record: &Record, reference_year: i32) -> Option<i32> {
    age_from_birth_date(record.patient_details.birth_date.as_deref(), reference_year)
}

/// Annotate every record with its age group and count the groups.
pub fn assign_age_groups(records: &mut [Record], reference_year: i32) -> AgeGroupCounts {
    let mut counts = AgeGroupCounts::default();

    for record in records.iter_mut() {
        let age = record_age(record, reference_year);
        if age.is_none() {
            if let Some(raw) = record.patient_details.field(DemographicField::BirthDate) {
                warn!("Ignoring unparseable birth date: {:?}", raw);
            }
        }

        let group = age.map(AgeGroup::from_age);
        record.age_group = group;
        if let Some(group) = group {
            counts.record(group);
        }
    }

    debug!(
        "Age groups: {} child, {} teen, {} adult, {} senior, {} unclassified",
        counts.child,
        counts.teen,
        counts.adult,
        counts.senior,
        records.len() - counts.total()
    );

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientDetails;

    fn record_born(birth_date: Option<&str>) -> Record {
        Record {
            patient_details: PatientDetails {
                birth_date: birth_date.map(String::from),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_birth_year_formats() {
        assert_eq!(parse_birth_year("1990-05-01"), Some(1990));
        assert_eq!(parse_birth_year("1990-05-01T10:20:30"), Some(1990));
        assert_eq!(parse_birth_year("1990-05-01T10:20:30.123Z"), Some(1990));
        assert_eq!(parse_birth_year("1990-05-01 10:20"), Some(1990));
        assert_eq!(parse_birth_year("1999-12-31T23:30:00+05:30"), Some(1999));
    }

    #[test]
    fn test_parse_birth_year_rejects_garbage() {
        assert_eq!(parse_birth_year("not a date"), None);
        assert_eq!(parse_birth_year("31/12/1990"), None);
        assert_eq!(parse_birth_year(""), None);
    }

    #[test]
    fn test_age_from_birth_date() {
        assert_eq!(age_from_birth_date(Some("2000-01-01Z"), 2024), Some(24));
        assert_eq!(age_from_birth_date(Some("2000-12-31"), 2024), Some(24));
        assert_eq!(age_from_birth_date(None, 2024), None);
        assert_eq!(age_from_birth_date(Some(""), 2024), None);
        assert_eq!(age_from_birth_date(Some("yesterday"), 2024), None);
        assert_eq!(age_from_birth_date(Some("1990-01-01"), i32::MIN), None);
    }

    #[test]
    fn test_assign_age_groups_boundaries() {
        let mut records: Vec<Record> = [
            "2012-06-01", // 12
            "2011-06-01", // 13
            "2005-06-01", // 19
            "2004-06-01", // 20
            "1965-06-01", // 59
            "1964-06-01", // 60
        ]
        .iter()
        .map(|d| record_born(Some(*d)))
        .collect();

        let counts = assign_age_groups(&mut records, 2024);

        let groups: Vec<_> = records.iter().map(|r| r.age_group).collect();
        assert_eq!(
            groups,
            vec![
                Some(AgeGroup::Child),
                Some(AgeGroup::Teen),
                Some(AgeGroup::Teen),
                Some(AgeGroup::Adult),
                Some(AgeGroup::Adult),
                Some(AgeGroup::Senior),
            ]
        );
        assert_eq!(
            counts,
            AgeGroupCounts {
                child: 1,
                teen: 2,
                adult: 2,
                senior: 1
            }
        );
    }

    #[test]
    fn test_assign_age_groups_leaves_unknown_unset() {
        let mut records = vec![
            record_born(None),
            record_born(Some("garbage")),
            record_born(Some("1990-01-01")),
        ];
        records[0].age_group = Some(AgeGroup::Senior);

        let counts = assign_age_groups(&mut records, 2024);

        assert_eq!(records[0].age_group, None);
        assert_eq!(records[1].age_group, None);
        assert_eq!(records[2].age_group, Some(AgeGroup::Adult));
        assert_eq!(counts.adult, 1);
        assert_eq!(counts.total(), 1);
    }
}
