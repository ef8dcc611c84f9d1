//! Statistical imputation methods.
//!
//! Median fill for numeric columns, mode fill for categorical columns, and
//! column removal. Each method records a human-readable step and returns the
//! value it filled with so callers can report it.

use crate::error::{EdaError, Result};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, has_column, series_median, string_mode,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Outcome of a single column imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation<T> {
    /// Value written into the missing cells
    pub value: T,
    /// Number of cells that were missing and got filled
    pub filled: usize,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing values of a numeric column with that column's median.
    ///
    /// Returns `Ok(None)` when the column has no values to take a median
    /// from; the column is left as-is in that case.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Imputation<f64>>> {
        let series = Self::column_series(df, col_name)?;
        let median = series_median(&series).map_err(|e| EdaError::ImputationFailed {
            column: col_name.to_string(),
            reason: e.to_string(),
        })?;

        let Some(median_val) = median else {
            warn!("Column '{}' has no values; median imputation skipped", col_name);
            return Ok(None);
        };

        let filled = series.null_count();
        let result = fill_numeric_nulls(&series, median_val)?;
        df.replace(col_name, result)?;

        debug!("Filled {} cells of '{}' with median {}", filled, col_name, median_val);
        processing_steps.push(format!(
            "Filled '{}' with median: {:.2} ({} values)",
            col_name, median_val, filled
        ));

        Ok(Some(Imputation {
            value: median_val,
            filled,
        }))
    }

    /// Fill missing values of a categorical column with its most frequent
    /// value. Ties go to the smallest value in sorted order.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Imputation<String>>> {
        let series = Self::column_series(df, col_name)?;

        let Some(mode_val) = string_mode(&series) else {
            warn!("Column '{}' has no values; mode imputation skipped", col_name);
            return Ok(None);
        };

        let filled = series.null_count();
        let result = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, result)?;

        debug!("Filled {} cells of '{}' with mode '{}'", filled, col_name, mode_val);
        processing_steps.push(format!(
            "Filled '{}' with mode: '{}' ({} values)",
            col_name, mode_val, filled
        ));

        Ok(Some(Imputation {
            value: mode_val,
            filled,
        }))
    }

    /// Remove a column if the table has it. Returns whether it was removed.
    pub fn drop_column_if_present(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<bool> {
        if !has_column(df, col_name) {
            debug!("Column '{}' not present; nothing to drop", col_name);
            return Ok(false);
        }

        df.drop_in_place(col_name)?;
        processing_steps.push(format!("Dropped column '{}'", col_name));
        Ok(true)
    }

    /// Clone the column out so the frame can be mutated afterwards.
    fn column_series(df: &DataFrame, col_name: &str) -> Result<Series> {
        df.column(col_name)
            .map(|col| col.as_materialized_series().clone())
            .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{f64_values, optional_string_values};

    // ========================================================================
    // apply_numeric_median() tests
    // ========================================================================

    #[test]
    fn test_apply_numeric_median_basic() {
        let mut df = df![
            "Age" => [Some(22.0), None, Some(38.0), Some(26.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation = StatisticalImputer::apply_numeric_median(&mut df, "Age", &mut steps)
            .unwrap()
            .unwrap();

        assert_eq!(imputation.value, 26.0);
        assert_eq!(imputation.filled, 1);

        let values = f64_values(df.column("Age").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values, vec![22.0, 26.0, 38.0, 26.0]);
        assert!(steps[0].contains("median"));
        assert!(steps[0].contains("26.00"));
    }

    #[test]
    fn test_apply_numeric_median_even_count() {
        let mut df = df![
            "Fare" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "Fare", &mut steps).unwrap();

        let fare = df.column("Fare").unwrap();
        assert_eq!(fare.null_count(), 0);
        assert_eq!(fare.get(1).unwrap().try_extract::<f64>().unwrap(), 2.0);
    }

    #[test]
    fn test_apply_numeric_median_no_nulls() {
        let mut df = df![
            "values" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps)
            .unwrap()
            .unwrap();

        assert_eq!(imputation.filled, 0);
        let values = f64_values(df.column("values").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_numeric_median_all_nulls() {
        let mut df = df![
            "values" => [Option::<f64>::None, None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation =
            StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        assert!(imputation.is_none());
        assert!(steps.is_empty());
        assert_eq!(df.column("values").unwrap().null_count(), 3);
    }

    #[test]
    fn test_apply_numeric_median_nonexistent_column() {
        let mut df = df![
            "other" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let err = StatisticalImputer::apply_numeric_median(&mut df, "Age", &mut steps).unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "Age"));
    }

    #[test]
    fn test_apply_numeric_median_integer_column_becomes_float() {
        let mut df = df![
            "Age" => [Some(1i64), Some(2), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "Age", &mut steps).unwrap();

        let age = df.column("Age").unwrap();
        assert!(matches!(age.dtype(), DataType::Float64));
        assert_eq!(age.get(2).unwrap().try_extract::<f64>().unwrap(), 1.5);
    }

    // ========================================================================
    // apply_mode_imputation() tests
    // ========================================================================

    #[test]
    fn test_apply_mode_imputation_basic() {
        let mut df = df![
            "Embarked" => [Some("S"), Some("S"), Some("C"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation = StatisticalImputer::apply_mode_imputation(&mut df, "Embarked", &mut steps)
            .unwrap()
            .unwrap();

        assert_eq!(imputation.value, "S");
        assert_eq!(imputation.filled, 1);

        let values =
            optional_string_values(df.column("Embarked").unwrap().as_materialized_series())
                .unwrap();
        assert_eq!(
            values,
            vec![
                Some("S".to_string()),
                Some("S".to_string()),
                Some("C".to_string()),
                Some("S".to_string()),
            ]
        );
        assert!(steps[0].contains("mode"));
    }

    #[test]
    fn test_apply_mode_imputation_tie_breaking() {
        let mut df = df![
            "Embarked" => [Some("S"), Some("Q"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation = StatisticalImputer::apply_mode_imputation(&mut df, "Embarked", &mut steps)
            .unwrap()
            .unwrap();

        assert_eq!(imputation.value, "Q");
        assert_eq!(df.column("Embarked").unwrap().null_count(), 0);
    }

    #[test]
    fn test_apply_mode_imputation_all_null() {
        let mut df = df![
            "Embarked" => [Option::<&str>::None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let imputation =
            StatisticalImputer::apply_mode_imputation(&mut df, "Embarked", &mut steps).unwrap();
        assert!(imputation.is_none());
        assert!(steps.is_empty());
    }

    // ========================================================================
    // drop_column_if_present() tests
    // ========================================================================

    #[test]
    fn test_drop_column_present() {
        let mut df = df![
            "PassengerId" => [1i64, 2],
            "Cabin" => [Some("C85"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let dropped = StatisticalImputer::drop_column_if_present(&mut df, "Cabin", &mut steps).unwrap();

        assert!(dropped);
        assert!(!has_column(&df, "Cabin"));
        assert_eq!(df.width(), 1);
        assert_eq!(steps, vec!["Dropped column 'Cabin'".to_string()]);
    }

    #[test]
    fn test_drop_column_absent_is_noop() {
        let mut df = df![
            "PassengerId" => [1i64, 2],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let dropped = StatisticalImputer::drop_column_if_present(&mut df, "Cabin", &mut steps).unwrap();

        assert!(!dropped);
        assert_eq!(df.width(), 1);
        assert!(steps.is_empty());
    }
}
