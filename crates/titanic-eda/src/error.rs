//! Custom error types for the EDA session.
//!
//! This module provides the error hierarchy using `thiserror`. The only
//! failure the session recognizes as part of its domain is a missing input
//! file; everything else is either a schema mismatch or a wrapped library
//! error.
//!
//! Errors are serializable so they can be embedded in the JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the EDA session.
#[derive(Error, Debug)]
pub enum EdaError {
    /// One or both input files could not be found in any candidate directory.
    #[error("Input files not found (train: {}, test: {}); searched: {}", found(.train), found(.test), join_paths(.searched))]
    MissingInputFiles {
        train: Option<PathBuf>,
        test: Option<PathBuf>,
        searched: Vec<PathBuf>,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Imputation failed.
    #[error("Failed to impute missing values in column '{column}': {reason}")]
    ImputationFailed { column: String, reason: String },

    /// A chart could not be drawn.
    #[error("Failed to render plot: {0}")]
    PlotRenderingFailed(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

fn found(path: &Option<PathBuf>) -> &'static str {
    if path.is_some() { "found" } else { "missing" }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in the JSON report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInputFiles { .. } => "MISSING_INPUT_FILES",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ImputationFailed { .. } => "IMPUTATION_FAILED",
            Self::PlotRenderingFailed(_) => "PLOT_RENDERING_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is the fail-fast missing input condition.
    pub fn is_missing_input(&self) -> bool {
        match self {
            Self::MissingInputFiles { .. } => true,
            Self::WithContext { source, .. } => source.is_missing_input(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}
