//! Titanic Exploratory Data Analysis
//!
//! Locates the Kaggle Titanic `train.csv` / `test.csv` files, loads them with
//! Polars, fills missing values with fixed per-column rules, prints summary
//! sections and renders five standard charts.
//!
//! # Overview
//!
//! - **File discovery**: four fixed candidate directories, last match wins
//! - **Cleaning**: median `Age` in both tables, mode `Embarked` in train,
//!   median `Fare` in test, `Cabin` dropped
//! - **Statistics**: info, missing counts, describe table, survival counts,
//!   survival rates by group, correlation matrix
//! - **Charts**: PNG files rendered with `plotters`
//! - **Report**: everything above as JSON
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use titanic_eda::{EdaConfig, EdaSession};
//!
//! let config = EdaConfig::builder()
//!     .working_dir("/srv/kaggle/titanic")
//!     .output_dir("plots")
//!     .build()?;
//!
//! let report = EdaSession::new(config).run(&mut std::io::stdout())?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # Cleaning on its own
//!
//! ```rust,ignore
//! use titanic_eda::{DatasetCleaner, load_csv};
//!
//! let train = load_csv("data/train.csv".as_ref())?;
//! let (train, report) = DatasetCleaner::clean_train(train)?;
//! assert_eq!(train.column("Age")?.null_count(), 0);
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod locator;
pub mod pipeline;
pub mod plots;
pub mod reporting;
pub mod stats;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    CleaningPlan, CleaningReport, ColumnPolicy, DatasetCleaner, DatasetKind, ImputationRule,
    ImputedColumn,
};
pub use config::{ConfigValidationError, EdaConfig, EdaConfigBuilder};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use imputers::{Imputation, StatisticalImputer};
pub use loader::load_csv;
pub use locator::{DatasetPaths, candidate_dirs, locate_files};
pub use pipeline::{EdaSession, EdaStage};
pub use plots::{PlotKind, PlotRenderer};
pub use reporting::{EdaReport, KEY_INSIGHTS, REPORT_FILE_NAME, write_report_to_file};
pub use stats::{CorrelationMatrix, Describe, correlation_matrix, describe};
