//! Offline bar generator behind `--demo`. Deterministic for a given ticker and
//! request time, so charts and tests are reproducible without network access.

use async_trait::async_trait;

use crate::data::source::{FetchBarSeries, FetchRequest};
use crate::domain::Bar;
use crate::error::ChartError;
use crate::models::BarSeries;

/// Bars generated for an unbounded (`max`) period, and the cap for any period.
const MAX_SYNTHETIC_BARS: i64 = 1_500;
const BASE_PRICE: f64 = 100.0;

pub struct SyntheticSource;

#[async_trait]
impl FetchBarSeries for SyntheticSource {
    fn signature(&self) -> &'static str {
        "Synthetic"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<BarSeries, ChartError> {
        generate(request)
    }
}

/// Per-ticker phase so different symbols draw different shapes.
fn ticker_phase(ticker: &str) -> f64 {
    let sum: u32 = ticker.bytes().map(u32::from).sum();
    (sum % 360) as f64 * std::f64::consts::PI / 180.0
}

/// Bars aligned to the interval grid, ending at the last open time not after `now`.
pub fn generate(request: &FetchRequest) -> Result<BarSeries, ChartError> {
    let ticker_interval = &request.ticker_interval;
    let interval_ms = ticker_interval.interval_ms;
    if interval_ms <= 0 {
        return Err(ChartError::InvalidConfig(format!(
            "interval of {} ms cannot be generated",
            interval_ms
        )));
    }

    let now_ms = request.now_ms();
    let last_open_ms = now_ms - now_ms.rem_euclid(interval_ms);
    let wanted = match request.start_ms() {
        Some(start) if start <= last_open_ms => {
            // First grid point at or after `start`
            let first_open_ms = start + (interval_ms - start.rem_euclid(interval_ms)) % interval_ms;
            (last_open_ms - first_open_ms) / interval_ms + 1
        }
        Some(_) => 0,
        None => MAX_SYNTHETIC_BARS,
    };
    let count = wanted.clamp(0, MAX_SYNTHETIC_BARS);
    let first_open_ms = last_open_ms - (count - 1) * interval_ms;

    let phase = ticker_phase(ticker_interval.name());
    let mut previous_close = BASE_PRICE * (1.0 + 0.2 * phase.sin());

    let bars = (0..count)
        .map(|i| {
            // Absolute grid position keeps a bar's shape stable as the window slides
            let step = ((first_open_ms + i * interval_ms) / interval_ms) as f64;
            let swing = 0.18 * (step * 0.045 + phase).sin() + 0.06 * (step * 0.31 + 2.0 * phase).sin();
            let drift = 0.0004 * (step % 2_000.0);
            let close = BASE_PRICE * (1.0 + swing + drift);
            let open = previous_close;
            let wick = BASE_PRICE * (0.004 + 0.006 * (step * 1.7 + phase).sin().abs());
            previous_close = close;

            Bar::new(
                first_open_ms + i * interval_ms,
                open,
                open.max(close) + wick,
                open.min(close) - wick,
                close,
            )
            .with_volume(1_000.0 + 400.0 * (step * 0.9).cos())
        })
        .collect();

    BarSeries::from_bars(ticker_interval.clone(), bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Period, TickerInterval};
    use crate::utils::TimeUtils;
    use chrono::{TimeZone, Utc};

    fn request(ticker: &str, period: Period) -> FetchRequest {
        FetchRequest::new(
            TickerInterval::new(ticker, TimeUtils::MS_IN_D),
            period,
            Utc.with_ymd_and_hms(2024, 6, 15, 13, 30, 0).unwrap(),
        )
    }

    #[test]
    fn covers_period_on_interval_grid() {
        let series = generate(&request("DEMO", Period::Days(30))).unwrap();
        assert_eq!(series.len(), 30);
        let stamps = series.timestamps_ms();
        assert!(stamps.iter().all(|t| t % TimeUtils::MS_IN_D == 0));
        assert!(stamps.windows(2).all(|w| w[1] - w[0] == TimeUtils::MS_IN_D));
        assert!(stamps[0] >= request("DEMO", Period::Days(30)).start_ms().unwrap());
    }

    #[test]
    fn deterministic_per_ticker() {
        let a = generate(&request("AAA", Period::Months(6))).unwrap();
        let b = generate(&request("AAA", Period::Months(6))).unwrap();
        let c = generate(&request("ZZZ", Period::Months(6))).unwrap();
        assert_eq!(a.close_prices(), b.close_prices());
        assert_ne!(a.close_prices(), c.close_prices());
    }

    #[test]
    fn max_period_is_capped() {
        let series = generate(&request("DEMO", Period::Max)).unwrap();
        assert_eq!(series.len() as i64, MAX_SYNTHETIC_BARS);
    }

    #[tokio::test]
    async fn fetch_through_trait() {
        let series = SyntheticSource
            .fetch(&request("DEMO", Period::Weeks(2)))
            .await
            .unwrap();
        assert_eq!(series.len(), 14);
    }
}
