//! Console output and the JSON session report.
//!
//! [`console`] prints the human-readable sections of a run. [`EdaReport`]
//! collects the same results for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - programmatic access in library mode

pub mod console;
mod report;

pub use report::{EdaReport, REPORT_FILE_NAME, Shape, write_report_to_file};

pub(crate) use report::timestamp;

/// Closing observations printed at the end of every run.
pub const KEY_INSIGHTS: [&str; 4] = [
    "Females had a significantly higher survival rate than males.",
    "Passengers in 1st class had the highest survival probability.",
    "Younger passengers had slightly better survival chances.",
    "Fare and passenger class strongly affect survival.",
];
