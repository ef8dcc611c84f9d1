//! Shared utilities for the EDA session.
//!
//! Helpers for dtype checks, pulling plain values out of polars columns, and
//! the small statistics (median, value counts, mode) the cleaner and the
//! summary tables share.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of the numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Whether the table has a column with this name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|n| n.as_str() == name)
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Column values as `f64`, nulls kept as `None`. NaN is treated as missing.
pub fn optional_f64_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing column values as `f64`.
pub fn f64_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(optional_f64_values(series)?.into_iter().flatten().collect())
}

/// Column values rendered as strings, nulls kept as `None`.
pub fn optional_string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Render a single cell for display. Missing values show as `NaN`, floats
/// get four decimals.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(f) if f.is_nan() => "NaN".to_string(),
        AnyValue::Float32(f) if f.is_nan() => "NaN".to_string(),
        AnyValue::Float64(f) => format!("{:.4}", f),
        AnyValue::Float32(f) => format!("{:.4}", f),
        other => format!("{}", other),
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Median of the non-missing values of a numeric Series.
///
/// Even counts give the mean of the two middle values.
pub fn series_median(series: &Series) -> PolarsResult<Option<f64>> {
    Ok(series.cast(&DataType::Float64)?.median())
}

/// Distinct non-null values with their counts, rendered as strings.
///
/// Sorted by count descending, then by value, so the order does not depend on
/// row order.
pub fn counts_by_value(series: &Series) -> PolarsResult<Vec<(String, usize)>> {
    let non_null = series.drop_nulls().with_name("value".into());
    if non_null.is_empty() {
        return Ok(Vec::new());
    }

    let counts_df = non_null.value_counts(true, false, "count".into(), false)?;
    let values = optional_string_values(counts_df.column("value")?.as_materialized_series())?;
    let counts = counts_df
        .column("count")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;

    let mut pairs: Vec<(String, usize)> = values
        .into_iter()
        .zip(counts.u64()?.into_iter())
        .filter_map(|(value, count)| Some((value?, count? as usize)))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(pairs)
}

/// Most frequent non-null value of a Series, compared as strings.
///
/// Ties resolve to the smallest value in sorted order.
pub fn string_mode(series: &Series) -> Option<String> {
    counts_by_value(series)
        .ok()?
        .into_iter()
        .next()
        .map(|(value, _)| value)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<Option<f64>> = optional_f64_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = optional_string_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or_else(|| fill_value.to_string())))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================
