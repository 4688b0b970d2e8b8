use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::FetchSettings;
use crate::domain::{Period, TickerInterval};
use crate::error::ChartError;
use crate::models::BarSeries;
use crate::ui::utils::format_price;
use crate::utils::time_utils;

/// What to fetch. `now` is carried explicitly so a request resolves the same
/// period window however late it is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticker_interval: TickerInterval,
    pub period: Period,
    pub now: DateTime<Utc>,
}

impl FetchRequest {
    pub fn new(ticker_interval: TickerInterval, period: Period, now: DateTime<Utc>) -> Self {
        Self {
            ticker_interval,
            period,
            now,
        }
    }

    pub fn from_settings(settings: &FetchSettings, now: DateTime<Utc>) -> Self {
        Self::new(settings.ticker_interval.clone(), settings.period, now)
    }

    /// Earliest open time to include, `None` for `max`.
    pub fn start_ms(&self) -> Option<i64> {
        self.period.start_ms(self.now)
    }

    pub fn now_ms(&self) -> i64 {
        self.now.timestamp_millis()
    }
}

#[async_trait]
pub trait FetchBarSeries {
    /// Fetch every bar of the requested period, oldest first.
    /// Unknown tickers and unreachable providers are `ChartError::DataUnavailable`.
    async fn fetch(&self, request: &FetchRequest) -> Result<BarSeries, ChartError>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Run one fetch and log what came back. No retries and no fallback source.
pub async fn load_bar_series(
    source: &dyn FetchBarSeries,
    request: &FetchRequest,
) -> Result<BarSeries, ChartError> {
    log::info!(
        "Fetching {} for {} from {}",
        request.ticker_interval,
        request.period,
        source.signature()
    );

    let series = source.fetch(request).await.inspect_err(|e| {
        log::error!("{} fetch failed: {}", source.signature(), e);
    })?;

    match (
        series.first_timestamp_ms(),
        series.last_timestamp_ms(),
        series.price_range(),
    ) {
        (Some(first), Some(last), Some((low, high))) => log::info!(
            "{}: {} bars from {} to {}, range {} - {}",
            request.ticker_interval,
            series.len(),
            time_utils::epoch_ms_to_utc(first),
            time_utils::epoch_ms_to_utc(last),
            format_price(low),
            format_price(high)
        ),
        _ => log::warn!(
            "{}: provider returned no bars for {}",
            request.ticker_interval,
            request.period
        ),
    }
    Ok(series)
}
