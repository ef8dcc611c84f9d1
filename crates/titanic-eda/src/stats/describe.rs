//! Descriptive statistics for numeric columns.

use crate::error::Result;
use crate::utils::numeric_column_names;
use polars::prelude::*;
use serde::Serialize;

/// Row labels of the describe table, in display order.
pub const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary of one numeric column. Undefined values are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnDescription {
    /// Summarize the non-missing values of a numeric Series.
    ///
    /// `std` uses one delta degree of freedom and is NaN below two values.
    pub fn from_series(series: &Series) -> PolarsResult<Self> {
        let floats = series.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        let count = ca.len() - ca.null_count();

        let quantile = |q: f64| -> PolarsResult<f64> {
            Ok(ca.quantile(q, QuantileMethod::Linear)?.unwrap_or(f64::NAN))
        };
        let std = if count > 1 {
            ca.std(1).unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };

        Ok(Self {
            name: series.name().to_string(),
            count,
            mean: ca.mean().unwrap_or(f64::NAN),
            std,
            min: ca.min().unwrap_or(f64::NAN),
            q25: quantile(0.25)?,
            q50: quantile(0.50)?,
            q75: quantile(0.75)?,
            max: ca.max().unwrap_or(f64::NAN),
        })
    }

    /// Values in [`DESCRIBE_ROWS`] order.
    pub fn row_values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Describe table over every numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub columns: Vec<ColumnDescription>,
}

impl Describe {
    pub fn column(&self, name: &str) -> Option<&ColumnDescription> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Describe all numeric columns of a table.
pub fn describe(df: &DataFrame) -> Result<Describe> {
    let mut columns = Vec::new();

    for name in numeric_column_names(df) {
        let series = df.column(&name)?.as_materialized_series();
        columns.push(ColumnDescription::from_series(series)?);
    }

    Ok(Describe { columns })
}
