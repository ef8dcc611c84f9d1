use crate::cleaner::CleaningReport;
use crate::error::Result;
use crate::stats::{CorrelationMatrix, Describe, GroupRate, NullCount, ValueCount};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the JSON report inside the output directory.
pub const REPORT_FILE_NAME: &str = "titanic_eda_report.json";

/// Shape of a table as (rows, columns).
pub type Shape = (usize, usize);

/// Everything a session computed, for `--json` and `--emit-report`.
///
/// Floating point fields that are undefined (for example the standard
/// deviation of a single value) serialize as `null`, so the report is
/// write-only.
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub train_file: String,
    pub test_file: String,

    // Shapes
    pub train_shape_before: Shape,
    pub train_shape_after: Shape,
    pub test_shape_before: Shape,
    pub test_shape_after: Shape,

    // Missing values (train)
    pub missing_before: Vec<NullCount>,
    pub missing_after: Vec<NullCount>,

    /// One entry per dataset, train first
    pub cleaning: Vec<CleaningReport>,

    // Statistics on the cleaned train table
    pub summary_statistics: Describe,
    pub survival_counts: Vec<ValueCount>,
    pub survival_by_sex: Vec<GroupRate>,
    pub survival_by_class: Vec<GroupRate>,
    pub correlation: CorrelationMatrix,

    /// Chart files written this run
    pub plots: Vec<String>,
    pub insights: Vec<String>,
}

pub(crate) fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Pretty-print the report as `<output_dir>/titanic_eda_report.json`.
pub fn write_report_to_file(report: &EdaReport, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let report_path = output_dir.join(REPORT_FILE_NAME);
    let mut file = File::create(&report_path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", report_path.display());

    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DatasetKind;
    use tempfile::TempDir;
    use polars::prelude::NamedFrom;

    fn minimal_report() -> EdaReport {
        EdaReport {
            generated_at: timestamp(),
            train_file: "data/train.csv".to_string(),
            test_file: "data/test.csv".to_string(),
            train_shape_before: (4, 6),
            train_shape_after: (4, 5),
            test_shape_before: (3, 5),
            test_shape_after: (3, 4),
            missing_before: vec![NullCount {
                column: "Age".to_string(),
                nulls: 1,
            }],
            missing_after: vec![NullCount {
                column: "Age".to_string(),
                nulls: 0,
            }],
            cleaning: vec![CleaningReport {
                dataset: DatasetKind::Train,
                imputed: Vec::new(),
                skipped: Vec::new(),
                dropped: vec!["Cabin".to_string()],
                actions: vec!["Dropped column 'Cabin'".to_string()],
            }],
            summary_statistics: Describe {
                columns: vec![crate::stats::ColumnDescription::from_series(&polars::prelude::Series::new(
                    "Age".into(),
                    &[30.0],
                ))
                .unwrap()],
            },
            survival_counts: Vec::new(),
            survival_by_sex: Vec::new(),
            survival_by_class: Vec::new(),
            correlation: CorrelationMatrix {
                columns: Vec::new(),
                values: Vec::new(),
            },
            plots: Vec::new(),
            insights: Vec::new(),
        }
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");

        let path = write_report_to_file(&minimal_report(), &out).unwrap();
        assert_eq!(path, out.join(REPORT_FILE_NAME));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["train_shape_after"], serde_json::json!([4, 5]));
        assert_eq!(json["cleaning"][0]["dataset"], "train");
        assert_eq!(json["cleaning"][0]["dropped"][0], "Cabin");
    }

    // NaN fields are written as null and could not be read back.
    static_assertions::assert_not_impl_any!(EdaReport: serde::de::DeserializeOwned);
    static_assertions::assert_not_impl_any!(Describe: serde::de::DeserializeOwned);
    static_assertions::assert_not_impl_any!(CorrelationMatrix: serde::de::DeserializeOwned);

    #[test]
    fn test_undefined_std_serializes_as_null() {
        let json = serde_json::to_value(minimal_report()).unwrap();
        assert!(json["summary_statistics"]["columns"][0]["std"].is_null());
        assert_eq!(json["summary_statistics"]["columns"][0]["mean"], 30.0);
    }
}
