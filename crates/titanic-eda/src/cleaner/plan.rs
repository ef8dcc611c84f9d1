//! Fixed cleaning plans for the two Titanic tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two tables a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Labeled table (has `Survived`)
    Train,
    /// Unlabeled table
    Test,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a column's missing values are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationRule {
    /// Median of the column's own non-missing values
    Median,
    /// Most frequent value; ties go to the smallest value
    Mode,
}

/// One column and the rule used to fill it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPolicy {
    pub column: String,
    pub rule: ImputationRule,
}

impl ColumnPolicy {
    fn new(column: &str, rule: ImputationRule) -> Self {
        Self {
            column: column.to_string(),
            rule,
        }
    }
}

/// Columns to impute (in order) and columns to drop if present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub dataset: DatasetKind,
    pub impute: Vec<ColumnPolicy>,
    pub drop: Vec<String>,
}

impl CleaningPlan {
    /// The plan for a dataset. Train never imputes `Fare`; test never
    /// imputes `Embarked`.
    pub fn for_dataset(dataset: DatasetKind) -> Self {
        let impute = match dataset {
            DatasetKind::Train => vec![
                ColumnPolicy::new("Age", ImputationRule::Median),
                ColumnPolicy::new("Embarked", ImputationRule::Mode),
            ],
            DatasetKind::Test => vec![
                ColumnPolicy::new("Age", ImputationRule::Median),
                ColumnPolicy::new("Fare", ImputationRule::Median),
            ],
        };

        Self {
            dataset,
            impute,
            drop: vec!["Cabin".to_string()],
        }
    }
}
