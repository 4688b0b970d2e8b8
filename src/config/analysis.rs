//! Analysis and computation configuration

use crate::error::ChartError;

/// The Master Analysis Configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    // Trailing window (in bars, inclusive of the current bar) for the
    // structural low/high trackers. Breaks are measured against the window
    // ending on the previous bar.
    pub structure_window: usize,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.structure_window == 0 {
            return Err(ChartError::InvalidConfig(
                "structure window must be at least 1 bar".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS.clone()
    }
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    structure_window: 15,
};
