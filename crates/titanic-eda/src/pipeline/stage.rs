//! Stages of an EDA session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of a session, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdaStage {
    /// Searching candidate directories for the input files
    Locating,
    /// Reading both CSV files
    Loading,
    /// Printing info, preview and missing counts of the raw train table
    Inspecting,
    /// Imputing and dropping columns in both tables
    Cleaning,
    /// Describe table, survival counts, group rates, correlation
    Summarizing,
    /// Writing the five charts
    Plotting,
    /// Insights and the closing banner
    Reporting,
    /// Session finished
    Complete,
    /// Session stopped with an error
    Failed,
}

impl EdaStage {
    /// Working stages, excluding the terminal ones.
    pub const SEQUENCE: [EdaStage; 7] = [
        Self::Locating,
        Self::Loading,
        Self::Inspecting,
        Self::Cleaning,
        Self::Summarizing,
        Self::Plotting,
        Self::Reporting,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Locating => "Locating Dataset Files",
            Self::Loading => "Loading Data",
            Self::Inspecting => "Inspecting Raw Data",
            Self::Cleaning => "Cleaning Data",
            Self::Summarizing => "Computing Statistics",
            Self::Plotting => "Rendering Plots",
            Self::Reporting => "Reporting Insights",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// 1-based position within [`EdaStage::SEQUENCE`]; `None` for terminal stages.
    pub fn step(&self) -> Option<usize> {
        Self::SEQUENCE.iter().position(|s| s == self).map(|i| i + 1)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for EdaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step() {
            Some(step) => write!(
                f,
                "Step {}/{}: {}",
                step,
                Self::SEQUENCE.len(),
                self.display_name()
            ),
            None => f.write_str(self.display_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_follow_sequence() {
        assert_eq!(EdaStage::Locating.step(), Some(1));
        assert_eq!(EdaStage::Reporting.step(), Some(7));
        assert_eq!(EdaStage::Complete.step(), None);
        assert!(EdaStage::Failed.is_terminal());
        assert!(!EdaStage::Cleaning.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(EdaStage::Cleaning.to_string(), "Step 4/7: Cleaning Data");
        assert_eq!(EdaStage::Complete.to_string(), "Complete");
        assert_eq!(
            serde_json::to_string(&EdaStage::Summarizing).unwrap(),
            "\"summarizing\""
        );
    }
}
