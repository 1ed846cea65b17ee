//! Dataset loading.
//!
//! Reads the whole input document into memory and turns it into
//! [`Record`]s. Any problem with the source is fatal: nothing is computed
//! from a partially read dataset.

use crate::models::Record;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Errors raised while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "dataset {} must contain a top-level array of records, found {found}",
        .path.display()
    )]
    NotAnArray { path: PathBuf, found: &'static str },

    #[error("record {index} in {} is malformed: {source}", .path.display())]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Load all records from a file, or from stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let content = read_source(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes from {}", content.len(), path.display());
    let records = parse_records(&content, path)?;
    info!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

/// Parse a JSON document into records.
///
/// `origin` is only used in error messages.
pub fn parse_records(content: &str, origin: &Path) -> Result<Vec<Record>, DatasetError> {
    let document: Value = serde_json::from_str(content).map_err(|source| DatasetError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(DatasetError::NotAnArray {
                path: origin.to_path_buf(),
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| DatasetError::Record {
                path: origin.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

fn read_source(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientDetails;
    use tempfile::TempDir;

    #[test]
    fn test_load_records_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[
                {"patientDetails": {"firstName": "Asha"}, "phoneNumber": "9876543210"},
                {"patientDetails": {}}
            ]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phone_number.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_load_records_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_records(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_parse_records_invalid_json() {
        let err = parse_records("[{", Path::new("inline")).unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
    }

    #[test]
    fn test_parse_records_requires_array() {
        let err = parse_records(r#"{"patientDetails": {}}"#, Path::new("inline")).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnArray { found: "an object", .. }));
        assert!(err.to_string().contains("top-level array"));
    }

    #[test]
    fn test_parse_records_reports_bad_index() {
        let err = parse_records(r#"[{"patientDetails": {}}, 42]"#, Path::new("inline")).unwrap_err();
        match err {
            DatasetError::Record { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_records_null_patient_details() {
        let records = parse_records(r#"[{"patientDetails": null}]"#, Path::new("inline")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].patient_details, PatientDetails::default());
    }

    #[test]
    fn test_parse_records_null_medicines() {
        let records = parse_records(
            r#"[{"consultationData": {"medicines": null}}, {"consultationData": null}]"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].consultation_data.is_some());
        assert_eq!(records[0].medicine_count(), 0);
        assert_eq!(records[1].medicine_count(), 0);
    }

    #[test]
    fn test_parse_empty_array() {
        let records = parse_records("[]", Path::new("inline")).unwrap();
        assert!(records.is_empty());
    }
}
