//! Configuration types for the EDA session.
//!
//! This module provides configuration options using the builder pattern.
//! Every default reproduces a plain run with no flags: search the working
//! directory and the program directory (plus their `data` subdirectories),
//! preview five rows, and write the five charts to `plots/`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the training file.
pub const DEFAULT_TRAIN_FILE: &str = "train.csv";

/// Default name of the test file.
pub const DEFAULT_TEST_FILE: &str = "test.csv";

/// Default subdirectory searched under each base directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration for an EDA session.
///
/// Use [`EdaConfig::builder()`] to create a new configuration with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use titanic_eda::config::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .working_dir("/srv/kaggle/titanic")
///     .render_plots(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Directory used in place of the process working directory.
    /// Default: None (use `std::env::current_dir()`)
    pub working_dir: Option<PathBuf>,

    /// Directory used in place of the executable's own directory.
    /// Default: None (use the parent of `std::env::current_exe()`)
    pub program_dir: Option<PathBuf>,

    /// Name of the subdirectory searched under each base directory.
    /// Default: "data"
    pub data_dir_name: String,

    /// File name of the labeled dataset.
    /// Default: "train.csv"
    pub train_file: String,

    /// File name of the unlabeled dataset.
    /// Default: "test.csv"
    pub test_file: String,

    /// Number of rows shown in the preview section.
    /// Default: 5
    pub head_rows: usize,

    /// Number of bins in the age histogram.
    /// Default: 30
    pub histogram_bins: usize,

    /// Whether to render the five charts.
    /// Default: true
    pub render_plots: bool,

    /// Directory for charts and the JSON report.
    /// Default: "plots"
    pub output_dir: PathBuf,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            working_dir: None,
            program_dir: None,
            data_dir_name: DEFAULT_DATA_DIR.to_string(),
            train_file: DEFAULT_TRAIN_FILE.to_string(),
            test_file: DEFAULT_TEST_FILE.to_string(),
            head_rows: 5,
            histogram_bins: 30,
            render_plots: true,
            output_dir: PathBuf::from("plots"),
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("train_file", &self.train_file),
            ("test_file", &self.test_file),
            ("data_dir_name", &self.data_dir_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyName(field.to_string()));
            }
        }

        if self.train_file == self.test_file {
            return Err(ConfigValidationError::SameFileNames(self.train_file.clone()));
        }

        if self.head_rows == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "head_rows".to_string(),
                value: self.head_rows,
            });
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "histogram_bins".to_string(),
                value: self.histogram_bins,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("'{0}' must not be empty")]
    EmptyName(String),

    #[error("Train and test file names must differ (both are '{0}')")]
    SameFileNames(String),

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    working_dir: Option<PathBuf>,
    program_dir: Option<PathBuf>,
    data_dir_name: Option<String>,
    train_file: Option<String>,
    test_file: Option<String>,
    head_rows: Option<usize>,
    histogram_bins: Option<usize>,
    render_plots: Option<bool>,
    output_dir: Option<PathBuf>,
}

impl EdaConfigBuilder {
    /// Search this directory instead of the process working directory.
    pub fn working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    /// Search this directory instead of the executable's directory.
    pub fn program_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.program_dir = Some(path.into());
        self
    }

    /// Set the name of the data subdirectory.
    pub fn data_dir_name(mut self, name: impl Into<String>) -> Self {
        self.data_dir_name = Some(name.into());
        self
    }

    /// Set the training file name.
    pub fn train_file(mut self, name: impl Into<String>) -> Self {
        self.train_file = Some(name.into());
        self
    }

    /// Set the test file name.
    pub fn test_file(mut self, name: impl Into<String>) -> Self {
        self.test_file = Some(name.into());
        self
    }

    /// Set the number of preview rows.
    pub fn head_rows(mut self, rows: usize) -> Self {
        self.head_rows = Some(rows);
        self
    }

    /// Set the number of age histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_plots(mut self, render: bool) -> Self {
        self.render_plots = Some(render);
        self
    }

    /// Set the output directory for charts and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();
        let config = EdaConfig {
            working_dir: self.working_dir,
            program_dir: self.program_dir,
            data_dir_name: self.data_dir_name.unwrap_or(defaults.data_dir_name),
            train_file: self.train_file.unwrap_or(defaults.train_file),
            test_file: self.test_file.unwrap_or(defaults.test_file),
            head_rows: self.head_rows.unwrap_or(defaults.head_rows),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            render_plots: self.render_plots.unwrap_or(defaults.render_plots),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EdaConfig::default();
        assert_eq!(config.train_file, "train.csv");
        assert_eq!(config.test_file, "test.csv");
        assert_eq!(config.data_dir_name, "data");
        assert_eq!(config.head_rows, 5);
        assert_eq!(config.histogram_bins, 30);
        assert!(config.render_plots);
        assert!(config.working_dir.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = EdaConfig::builder()
            .working_dir("/tmp/work")
            .head_rows(3)
            .render_plots(false)
            .output_dir("out")
            .build()
            .unwrap();

        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp/work")));
        assert_eq!(config.head_rows, 3);
        assert!(!config.render_plots);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn test_zero_head_rows_rejected() {
        let result = EdaConfig::builder().head_rows(0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(EdaConfig::builder().histogram_bins(0).build().is_err());
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let result = EdaConfig::builder().train_file("  ").build();
        assert!(matches!(result, Err(ConfigValidationError::EmptyName(_))));
    }

    #[test]
    fn test_same_file_names_rejected() {
        let result = EdaConfig::builder()
            .train_file("data.csv")
            .test_file("data.csv")
            .build();
        assert!(matches!(result, Err(ConfigValidationError::SameFileNames(_))));
    }
}
