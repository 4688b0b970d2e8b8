//! Order-block / break-of-structure detection.
//!
//! A single left-to-right pass. Each direction follows its own structural
//! pivot (the bar holding the rolling low or high). A close through the pivot
//! from the window ending on the previous bar is a break of structure; the most
//! extreme opposite-side bar between pivot and break becomes the order block.
//! Each pivot can be broken at most once.

use crate::analysis::structure::{Extreme, Pivot, rolling_pivots};
use crate::config::{AnalysisConfig, DEBUG_FLAGS};
use crate::domain::Direction;
use crate::models::{BarSeries, BosEvent, Detection, OrderBlock};
use crate::utils::maths_utils::{last_index_of_max, last_index_of_min};

/// Borrowed price columns the detector reads.
#[derive(Debug, Clone, Copy)]
pub struct PriceColumns<'a> {
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
}

impl<'a> From<&'a BarSeries> for PriceColumns<'a> {
    fn from(series: &'a BarSeries) -> Self {
        Self {
            high: series.high_prices(),
            low: series.low_prices(),
            close: series.close_prices(),
        }
    }
}

impl PriceColumns<'_> {
    fn len(&self) -> usize {
        self.close.len().min(self.high.len()).min(self.low.len())
    }
}

/// Active pivot for one direction.
#[derive(Debug, Clone, Copy, Default)]
struct PivotTrack {
    pivot: Option<Pivot>,
    broken: bool,
}

impl PivotTrack {
    /// Follow the tracker. A different pivot bar starts unbroken.
    fn advance(self, next: Option<Pivot>) -> Self {
        match (self.pivot, next) {
            (Some(current), Some(next)) if current.index == next.index => self,
            (_, next) => Self {
                pivot: next,
                broken: false,
            },
        }
    }

    /// The pivot, if `close` breaks it in `direction` and it is still intact.
    fn broken_by(&self, close: f64, direction: Direction) -> Option<Pivot> {
        let pivot = self.pivot.filter(|_| !self.broken)?;
        let breaks = match direction {
            Direction::Bearish => close < pivot.value,
            Direction::Bullish => close > pivot.value,
        };
        breaks.then_some(pivot)
    }
}

/// Accumulator threaded through the scan.
#[derive(Debug, Default)]
struct ScanState {
    low: PivotTrack,
    high: PivotTrack,
    detection: Detection,
}

impl ScanState {
    fn track(&mut self, direction: Direction) -> &mut PivotTrack {
        match direction {
            // A bearish break is measured against the structural low
            Direction::Bearish => &mut self.low,
            Direction::Bullish => &mut self.high,
        }
    }
}

/// Detect on a validated series with the configured window.
pub fn detect_order_blocks(series: &BarSeries, config: &AnalysisConfig) -> Detection {
    detect(PriceColumns::from(series), config.structure_window)
}

/// Detect on raw columns. Series shorter than `window` (or `window == 0`)
/// produce an empty `Detection`.
pub fn detect(prices: PriceColumns<'_>, window: usize) -> Detection {
    let n = prices.len();
    if window == 0 || n < window {
        return Detection::default();
    }

    let low_pivots = rolling_pivots(&prices.low[..n], window, Extreme::Low);
    let high_pivots = rolling_pivots(&prices.high[..n], window, Extreme::High);

    let state = (window - 1..n).fold(ScanState::default(), |mut state, i| {
        for direction in [Direction::Bearish, Direction::Bullish] {
            // Check against the pivot established through bar i - 1
            if let Some(pivot) = state.track(direction).broken_by(prices.close[i], direction) {
                state.track(direction).broken = true;
                record_break(&mut state.detection, &prices, pivot, i, direction);
            }
        }
        state.low = state.low.advance(low_pivots[i]);
        state.high = state.high.advance(high_pivots[i]);
        state
    });

    state.detection
}

fn record_break(
    detection: &mut Detection,
    prices: &PriceColumns<'_>,
    pivot: Pivot,
    index: usize,
    direction: Direction,
) {
    let event = BosEvent {
        index,
        pivot_index: pivot.index,
        price_level: pivot.value,
        direction,
    };

    // Origin: highest high before a bearish break, lowest low before a
    // bullish one. Most recent bar wins ties.
    let span = pivot.index..=index;
    let offset = match direction {
        Direction::Bearish => last_index_of_max(&prices.high[span]),
        Direction::Bullish => last_index_of_min(&prices.low[span]),
    };
    let origin = pivot.index + offset.unwrap_or(0);

    let block = OrderBlock {
        start_index: origin,
        end_index: index,
        top: prices.high[origin],
        bottom: prices.low[origin],
        direction,
    };

    if DEBUG_FLAGS.print_detector_events {
        log::info!(
            "{} BOS at bar {} through {:.4} (pivot bar {}); block {}..{} [{:.4}, {:.4}]",
            direction,
            index,
            event.price_level,
            event.pivot_index,
            block.start_index,
            block.end_index,
            block.bottom,
            block.top
        );
    }

    detection.bos_events.push(event);
    match direction {
        Direction::Bullish => detection.bullish_blocks.push(block),
        Direction::Bearish => detection.bearish_blocks.push(block),
    }
}
