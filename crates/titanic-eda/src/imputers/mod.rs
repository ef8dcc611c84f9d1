//! Imputation module for handling missing values.
//!
//! Statistical imputation (median, mode) and column removal.

mod statistical;

pub use statistical::{Imputation, StatisticalImputer};
