//! Input parsing for evaluation result files.
//!
//! Results arrive either as a JSON array of records or as a CSV file with an
//! `experiment,metric,value` header row. Dispatch is by file extension,
//! case-insensitively; anything else is rejected up front with the offending
//! path in the error.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One (experiment, metric, value) observation from a results file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricRecord {
    pub experiment: String,
    pub metric: String,
    pub value: f64,
}

#[derive(Debug)]
pub enum LoadError {
    /// The extension is neither `.json` nor `.csv`, or the path has none.
    UnsupportedFormat { path: PathBuf },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::UnsupportedFormat { path } => {
                write!(f, "unsupported file format: {}", path.display())
            }
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Json { path, source } => {
                write!(f, "invalid JSON in {}: {source}", path.display())
            }
            LoadError::Csv { path, source } => {
                write!(f, "invalid CSV in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::UnsupportedFormat { .. } => None,
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
            LoadError::Csv { source, .. } => Some(source),
        }
    }
}

/// Load all records from `path`, dispatching on the lowercased extension.
pub fn load_records(path: &Path) -> Result<Vec<MetricRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let records = match ext.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    for record in &records {
        // CSV accepts "NaN"/"inf" as floats; charts for these look broken.
        if !record.value.is_finite() {
            tracing::warn!(
                experiment = %record.experiment,
                metric = %record.metric,
                value = record.value,
                "non-finite value in results"
            );
        }
    }
    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<MetricRecord>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn load_csv(path: &Path) -> Result<Vec<MetricRecord>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: MetricRecord = row.map_err(|e| LoadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_json_single_record() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "results.json",
            r#"[{"experiment":"A","metric":"f1","value":0.8}]"#,
        );

        let records = load_records(&path).unwrap();
        assert_eq!(
            records,
            vec![MetricRecord {
                experiment: "A".to_string(),
                metric: "f1".to_string(),
                value: 0.8,
            }]
        );
    }

    #[test]
    fn load_json_integer_value_becomes_float() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "results.json",
            r#"[{"experiment":"A","metric":"hits","value":42}]"#,
        );

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].value, 42.0);
    }

    #[test]
    fn load_json_ignores_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "results.json",
            r#"[{"experiment":"A","metric":"f1","value":0.5,"note":"warmup run"}]"#,
        );

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metric, "f1");
    }

    #[test]
    fn load_json_bad_syntax_fails() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.json", "[{not json");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("results.json"));
    }

    #[test]
    fn load_csv_single_row() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.csv", "experiment,metric,value\nA,f1,0.8\n");

        let records = load_records(&path).unwrap();
        assert_eq!(
            records,
            vec![MetricRecord {
                experiment: "A".to_string(),
                metric: "f1".to_string(),
                value: 0.8,
            }]
        );
    }

    #[test]
    fn load_csv_column_order_follows_header() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "results.csv",
            "value,experiment,metric\n0.75,baseline,recall\n",
        );

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].experiment, "baseline");
        assert_eq!(records[0].metric, "recall");
        assert_eq!(records[0].value, 0.75);
    }

    #[test]
    fn load_csv_non_numeric_value_fails() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "results.csv",
            "experiment,metric,value\nA,f1,not-a-number\n",
        );

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
        assert!(err.to_string().contains("results.csv"));
    }

    #[test]
    fn load_csv_missing_column_fails() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.csv", "experiment,metric\nA,f1\n");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn load_csv_header_only_yields_no_records() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.csv", "experiment,metric,value\n");

        let records = load_records(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unsupported_extension_fails_with_path() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.txt", "whatever");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("results.txt"));
    }

    #[test]
    fn extensionless_path_fails() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results", "[]");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn uppercase_extension_loads() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "RESULTS.JSON",
            r#"[{"experiment":"A","metric":"f1","value":0.9}]"#,
        );

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn empty_json_array_yields_no_records() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "results.json", "[]");

        let records = load_records(&path).unwrap();
        assert!(records.is_empty());
    }
}
