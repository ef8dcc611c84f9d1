//! CSV loading.
//!
//! Titanic files carry quoted names with embedded commas
//! (`"Braund, Mr. Owen Harris"`), so the reader keeps `"` quoting on. The
//! schema is inferred from the whole file: `Age` holds integers in the first
//! rows and fractions like `0.42` much later.

use crate::error::{Result, ResultExt};
use crate::utils::{has_column, is_numeric_dtype};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Columns that must stay floating point through imputation.
pub const FLOAT_COLUMNS: [&str; 2] = ["Age", "Fare"];

/// Load a CSV file with a header row.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    info!("Loading dataset from: {}", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    let df = coerce_float_columns(df, &FLOAT_COLUMNS)?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    Ok(df)
}

/// Cast the listed numeric columns to `Float64`. Missing and non-numeric
/// columns are left alone.
pub fn coerce_float_columns(mut df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for &name in columns {
        if !has_column(&df, name) {
            continue;
        }

        let series = df.column(name)?.as_materialized_series().clone();
        if !is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Float64 {
            continue;
        }

        debug!("Casting '{}' from {} to f64", name, series.dtype());
        let cast = series.cast(&DataType::Float64)?;
        df.replace(name, cast)?;
    }

    Ok(df)
}
