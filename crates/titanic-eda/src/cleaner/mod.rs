//! Data cleaning for the Titanic tables.
//!
//! Each dataset gets a fixed [`CleaningPlan`]:
//!
//! | dataset | `Age`  | `Embarked` | `Fare` | `Cabin` |
//! |---------|--------|------------|--------|---------|
//! | train   | median | mode       | as-is  | dropped |
//! | test    | median | as-is      | median | dropped |
//!
//! Medians and modes are computed from the table being cleaned, never from
//! the other one. `Fare` in train and `Embarked` in test are deliberately
//! left alone.

mod plan;

pub use plan::{CleaningPlan, ColumnPolicy, DatasetKind, ImputationRule};

use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A value written into the missing cells of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputedColumn {
    pub column: String,
    pub rule: ImputationRule,
    /// Fill value as displayed (numbers keep full precision)
    pub value: String,
    pub filled: usize,
}

/// What cleaning did to one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub dataset: DatasetKind,
    pub imputed: Vec<ImputedColumn>,
    /// Columns that had no value to derive a fill from
    pub skipped: Vec<String>,
    pub dropped: Vec<String>,
    pub actions: Vec<String>,
}

impl CleaningReport {
    fn new(dataset: DatasetKind) -> Self {
        Self {
            dataset,
            imputed: Vec::new(),
            skipped: Vec::new(),
            dropped: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// Applies cleaning plans to loaded tables.
pub struct DatasetCleaner;

impl DatasetCleaner {
    /// Clean the labeled table.
    pub fn clean_train(df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        Self::clean(df, &CleaningPlan::for_dataset(DatasetKind::Train))
    }

    /// Clean the unlabeled table.
    pub fn clean_test(df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        Self::clean(df, &CleaningPlan::for_dataset(DatasetKind::Test))
    }

    /// Apply a plan: impute each listed column, then drop the listed columns
    /// that exist.
    pub fn clean(df: DataFrame, plan: &CleaningPlan) -> Result<(DataFrame, CleaningReport)> {
        let mut df = df;
        let mut report = CleaningReport::new(plan.dataset);

        info!("Cleaning {} dataset...", plan.dataset);

        for policy in &plan.impute {
            let column = policy.column.as_str();
            let context = format!("Cleaning {} dataset", plan.dataset);

            let imputed = match policy.rule {
                ImputationRule::Median => {
                    StatisticalImputer::apply_numeric_median(&mut df, column, &mut report.actions)
                        .context(context)?
                        .map(|imp| (imp.value.to_string(), imp.filled))
                }
                ImputationRule::Mode => {
                    StatisticalImputer::apply_mode_imputation(&mut df, column, &mut report.actions)
                        .context(context)?
                        .map(|imp| (imp.value, imp.filled))
                }
            };

            match imputed {
                Some((value, filled)) => report.imputed.push(ImputedColumn {
                    column: policy.column.clone(),
                    rule: policy.rule,
                    value,
                    filled,
                }),
                None => report.skipped.push(policy.column.clone()),
            }
        }

        for column in &plan.drop {
            if StatisticalImputer::drop_column_if_present(&mut df, column, &mut report.actions)? {
                report.dropped.push(column.clone());
            }
        }

        info!(
            "{} dataset cleaned: {} columns imputed, {} dropped",
            plan.dataset,
            report.imputed.len(),
            report.dropped.len()
        );

        Ok((df, report))
    }
}
