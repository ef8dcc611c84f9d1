//! Summary statistics over a cleaned table.
//!
//! - column overview (non-null counts and dtypes)
//! - per-column missing value counts
//! - value counts and group rates
//! - describe table and correlation matrix

mod correlation;
mod describe;

pub use correlation::{CorrelationMatrix, correlation_matrix, pearson};
pub use describe::{ColumnDescription, DESCRIBE_ROWS, Describe, describe};

use crate::error::{EdaError, Result};
use crate::utils::{counts_by_value, optional_f64_values, optional_string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Name, non-null count and dtype of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: String,
}

/// Missing values in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCount {
    pub column: String,
    pub nulls: usize,
}

/// Occurrences of one distinct value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Mean of the target within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRate {
    pub group: String,
    pub count: usize,
    pub rate: f64,
}

/// Column overview in table order.
pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            non_null: col.len() - col.null_count(),
            dtype: col.dtype().to_string(),
        })
        .collect()
}

/// Missing values per column in table order.
pub fn null_counts(df: &DataFrame) -> Vec<NullCount> {
    df.get_columns()
        .iter()
        .map(|col| NullCount {
            column: col.name().to_string(),
            nulls: col.null_count(),
        })
        .collect()
}

/// Total missing values across the table.
pub fn total_nulls(df: &DataFrame) -> usize {
    null_counts(df).iter().map(|c| c.nulls).sum()
}

/// Distinct non-null values of a column with their counts, most frequent
/// first. Equal counts are ordered by value.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<ValueCount>> {
    let series = column_series(df, column)?;

    Ok(counts_by_value(series)?
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect())
}

/// Mean of `target` per distinct value of `group`, groups in sorted order.
/// Rows missing either value are ignored.
pub fn group_rates(df: &DataFrame, group: &str, target: &str) -> Result<Vec<GroupRate>> {
    column_series(df, group)?;
    column_series(df, target)?;

    let rates = df
        .clone()
        .lazy()
        .filter(col(group).is_not_null())
        .group_by([col(group)])
        .agg([
            col(target).count().alias("count"),
            col(target).cast(DataType::Float64).mean().alias("rate"),
        ])
        .filter(col("count").gt(lit(0)))
        .sort_by_exprs([col(group)], SortMultipleOptions::default())
        .collect()?;

    let groups = optional_string_values(rates.column(group)?.as_materialized_series())?;
    let counts = optional_f64_values(rates.column("count")?.as_materialized_series())?;
    let means = optional_f64_values(rates.column("rate")?.as_materialized_series())?;

    Ok(groups
        .into_iter()
        .zip(counts)
        .zip(means)
        .filter_map(|((group, count), rate)| {
            Some(GroupRate {
                group: group?,
                count: count? as usize,
                rate: rate?,
            })
        })
        .collect())
}

fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "Survived" => [0i64, 1, 1, 1, 0, 0],
            "Pclass" => [3i64, 1, 3, 1, 3, 2],
            "Sex" => ["male", "female", "female", "female", "male", "male"],
            "Age" => [Some(22.0), Some(38.0), None, Some(35.0), Some(35.0), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_column_info() {
        let info = column_info(&sample());
        assert_eq!(info.len(), 4);
        assert_eq!(info[3].name, "Age");
        assert_eq!(info[3].non_null, 4);
        assert_eq!(info[0].dtype, "i64");
        assert_eq!(info[2].dtype, "str");
    }

    #[test]
    fn test_null_counts() {
        let counts = null_counts(&sample());
        let age = counts.iter().find(|c| c.column == "Age").unwrap();
        assert_eq!(age.nulls, 2);
        assert_eq!(total_nulls(&sample()), 2);
    }

    #[test]
    fn test_value_counts_sorted_by_count() {
        let counts = value_counts(&sample(), "Pclass").unwrap();
        assert_eq!(
            counts,
            vec![
                ValueCount { value: "3".to_string(), count: 3 },
                ValueCount { value: "1".to_string(), count: 2 },
                ValueCount { value: "2".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_value_counts_ties_ordered_by_value() {
        let counts = value_counts(&sample(), "Survived").unwrap();
        assert_eq!(counts[0].value, "0");
        assert_eq!(counts[1].value, "1");
    }

    #[test]
    fn test_value_counts_missing_column() {
        let err = value_counts(&sample(), "Nope").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_group_rates_by_sex() {
        let rates = group_rates(&sample(), "Sex", "Survived").unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].group, "female");
        assert_eq!(rates[0].rate, 1.0);
        assert_eq!(rates[1].group, "male");
        assert_eq!(rates[1].rate, 0.0);
        assert_eq!(rates[1].count, 3);
    }

    #[test]
    fn test_group_rates_skip_missing_groups_and_targets() {
        let df = df![
            "Embarked" => [Some("S"), None, Some("C"), Some("S"), Some("Q")],
            "Survived" => [Some(1i64), Some(1), Some(0), Some(0), None],
        ]
        .unwrap();

        let rates = group_rates(&df, "Embarked", "Survived").unwrap();
        let groups: Vec<(&str, usize)> = rates.iter().map(|r| (r.group.as_str(), r.count)).collect();
        assert_eq!(groups, vec![("C", 1), ("S", 2)]);
        assert_eq!(rates[1].rate, 0.5);
    }

    #[test]
    fn test_group_rates_missing_column() {
        let err = group_rates(&sample(), "Embarked", "Survived").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_group_rates_by_class() {
        let rates = group_rates(&sample(), "Pclass", "Survived").unwrap();
        let groups: Vec<&str> = rates.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["1", "2", "3"]);
        assert!((rates[2].rate - 1.0 / 3.0).abs() < 1e-12);
    }
}
