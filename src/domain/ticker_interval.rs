use crate::error::ChartError;
use crate::utils::TimeUtils;

/// The instrument and sampling interval a `BarSeries` was fetched for.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct TickerInterval {
    pub ticker: String,
    pub interval_ms: i64,
}

impl TickerInterval {
    pub fn new(ticker: &str, interval_ms: i64) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            interval_ms,
        }
    }

    /// Build from a ticker and an interval string such as `1d` or `4h`.
    pub fn parse(ticker: &str, interval: &str) -> Result<Self, ChartError> {
        if ticker.trim().is_empty() {
            return Err(ChartError::InvalidConfig("ticker must not be empty".into()));
        }
        let interval_ms = TimeUtils::interval_string_to_ms(interval).ok_or_else(|| {
            ChartError::InvalidConfig(format!("unsupported interval '{}'", interval))
        })?;
        Ok(Self::new(ticker, interval_ms))
    }

    pub fn name(&self) -> &str {
        &self.ticker
    }

    pub fn interval_label(&self) -> &'static str {
        TimeUtils::interval_ms_to_string(self.interval_ms)
    }

    /// Intervals of a day or longer are labelled with dates only.
    pub fn is_intraday(&self) -> bool {
        self.interval_ms < TimeUtils::MS_IN_D
    }
}

impl std::fmt::Display for TickerInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.ticker, self.interval_label())
    }
}
