pub mod bn_kline;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::data::source::{FetchBarSeries, FetchRequest};
use crate::error::ChartError;
use crate::models::BarSeries;

/// Spot klines from the public Binance REST API.
pub struct BinanceSource;

#[async_trait]
impl FetchBarSeries for BinanceSource {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<BarSeries, ChartError> {
        let ticker_interval = &request.ticker_interval;
        bn_kline::try_interval_from_ms(ticker_interval.interval_ms)
            .map_err(ChartError::InvalidConfig)?;

        let start_time = Instant::now();
        let klines = bn_kline::load_klines(ticker_interval, request.start_ms())
            .await
            .map_err(|e| ChartError::data_unavailable(ticker_interval.name(), format!("{:#}", e)))?;
        log::info!(
            "{}: {} klines downloaded in {:?}",
            ticker_interval,
            klines.len(),
            start_time.elapsed()
        );

        let bars = bn_kline::klines_to_bars(&klines)?;
        BarSeries::from_bars(ticker_interval.clone(), bars)
    }
}
