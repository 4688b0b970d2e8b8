use std::fmt;

/// Errors surfaced to the user. Anything that reaches `main` terminates the run
/// before a chart is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The data source could not produce bars for this ticker/period.
    DataUnavailable { ticker: String, reason: String },
    /// A bar broke `low <= open, close <= high`, had a non-finite price,
    /// or arrived out of timestamp order.
    MalformedBar {
        index: usize,
        timestamp_ms: i64,
        reason: String,
    },
    /// A configuration value could not be parsed or is out of range.
    InvalidConfig(String),
    /// The interactive chart window failed to start.
    Display(String),
}

impl ChartError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        ChartError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::DataUnavailable { ticker, reason } => {
                write!(f, "No data available for {}: {}", ticker, reason)
            }
            ChartError::MalformedBar {
                index,
                timestamp_ms,
                reason,
            } => write!(
                f,
                "Malformed bar #{} (open time {} ms): {}",
                index, timestamp_ms, reason
            ),
            ChartError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ChartError::Display(msg) => write!(f, "Chart display failed: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}
