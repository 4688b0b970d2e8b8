use crate::domain::{Bar, TickerInterval};
use crate::error::ChartError;
use crate::utils::maths_utils;

// ============================================================================
// BarSeries: validated, read-only OHLC data for one instrument
// ============================================================================

/// Column-oriented bar storage. Only constructible through `from_bars`, which
/// enforces the OHLC invariant and strictly increasing timestamps, so every
/// consumer can rely on both.
#[derive(Debug, Clone)]
pub struct BarSeries {
    ticker_interval: TickerInterval,

    timestamps_ms: Vec<i64>,

    // Prices
    open_prices: Vec<f64>,
    high_prices: Vec<f64>,
    low_prices: Vec<f64>,
    close_prices: Vec<f64>,

    volumes: Vec<Option<f64>>,
}

impl BarSeries {
    /// Validate and store `bars`. Fails on the first malformed bar.
    pub fn from_bars(ticker_interval: TickerInterval, bars: Vec<Bar>) -> Result<Self, ChartError> {
        let mut series = Self::empty(ticker_interval);
        series.reserve(bars.len());

        for (index, bar) in bars.into_iter().enumerate() {
            bar.check_invariant()
                .map_err(|reason| ChartError::MalformedBar {
                    index,
                    timestamp_ms: bar.timestamp_ms,
                    reason,
                })?;

            if let Some(&previous) = series.timestamps_ms.last() {
                if bar.timestamp_ms <= previous {
                    return Err(ChartError::MalformedBar {
                        index,
                        timestamp_ms: bar.timestamp_ms,
                        reason: format!(
                            "timestamp not after previous bar ({} ms)",
                            previous
                        ),
                    });
                }
            }

            series.timestamps_ms.push(bar.timestamp_ms);
            series.open_prices.push(bar.open_price);
            series.high_prices.push(bar.high_price);
            series.low_prices.push(bar.low_price);
            series.close_prices.push(bar.close_price);
            series.volumes.push(bar.volume);
        }

        Ok(series)
    }

    pub fn empty(ticker_interval: TickerInterval) -> Self {
        Self {
            ticker_interval,
            timestamps_ms: Vec::new(),
            open_prices: Vec::new(),
            high_prices: Vec::new(),
            low_prices: Vec::new(),
            close_prices: Vec::new(),
            volumes: Vec::new(),
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.timestamps_ms.reserve(additional);
        self.open_prices.reserve(additional);
        self.high_prices.reserve(additional);
        self.low_prices.reserve(additional);
        self.close_prices.reserve(additional);
        self.volumes.reserve(additional);
    }

    pub fn ticker_interval(&self) -> &TickerInterval {
        &self.ticker_interval
    }

    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    pub fn get_bar(&self, idx: usize) -> Bar {
        Bar {
            timestamp_ms: self.timestamps_ms[idx],
            open_price: self.open_prices[idx],
            high_price: self.high_prices[idx],
            low_price: self.low_prices[idx],
            close_price: self.close_prices[idx],
            volume: self.volumes[idx],
        }
    }

    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).map(|idx| self.get_bar(idx))
    }

    pub fn timestamps_ms(&self) -> &[i64] {
        &self.timestamps_ms
    }

    pub fn open_prices(&self) -> &[f64] {
        &self.open_prices
    }

    pub fn high_prices(&self) -> &[f64] {
        &self.high_prices
    }

    pub fn low_prices(&self) -> &[f64] {
        &self.low_prices
    }

    pub fn close_prices(&self) -> &[f64] {
        &self.close_prices
    }

    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.first().copied()
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.last().copied()
    }

    /// Lowest low and highest high across the series.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let (lo, _) = maths_utils::get_min_max(&self.low_prices)?;
        let (_, hi) = maths_utils::get_min_max(&self.high_prices)?;
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn ti() -> TickerInterval {
        TickerInterval::new("TEST", TimeUtils::MS_IN_D)
    }

    #[test]
    fn stores_bars_column_wise() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0).with_volume(5.0),
            Bar::new(TimeUtils::MS_IN_D, 11.0, 13.0, 10.0, 12.5),
        ];
        let series = BarSeries::from_bars(ti(), bars.clone()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get_bar(0), bars[0]);
        assert_eq!(series.get_bar(1).volume, None);
        assert_eq!(series.close_prices(), &[11.0, 12.5]);
        assert_eq!(series.price_range(), Some((9.0, 13.0)));
        assert_eq!(series.bars().collect::<Vec<_>>(), bars);
    }

    #[test]
    fn rejects_malformed_bar_with_its_position() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0),
            Bar::new(TimeUtils::MS_IN_D, 11.0, 13.0, 10.0, 14.0),
        ];
        match BarSeries::from_bars(ti(), bars) {
            Err(ChartError::MalformedBar {
                index,
                timestamp_ms,
                ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(timestamp_ms, TimeUtils::MS_IN_D);
            }
            other => panic!("expected MalformedBar, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_increasing_timestamps() {
        let bars = vec![
            Bar::new(TimeUtils::MS_IN_D, 10.0, 12.0, 9.0, 11.0),
            Bar::new(TimeUtils::MS_IN_D, 11.0, 13.0, 10.0, 12.0),
        ];
        assert!(matches!(
            BarSeries::from_bars(ti(), bars),
            Err(ChartError::MalformedBar { index: 1, .. })
        ));
    }

    #[test]
    fn empty_series_has_no_range() {
        let series = BarSeries::from_bars(ti(), Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.price_range(), None);
        assert_eq!(series.first_timestamp_ms(), None);
    }
}
