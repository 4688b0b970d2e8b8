//! Previous-day high/low (PDH/PDL) per bar.

use crate::models::{BarSeries, ReferenceLevel};
use crate::utils::TimeUtils;

/// UTC calendar day number of an epoch-ms timestamp.
fn day_number(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(TimeUtils::MS_IN_D)
}

/// One entry per bar: the high/low of the last bar of the most recent earlier
/// UTC calendar day present in the series. Bars of the first day get `None`.
///
/// Gaps (weekends, holidays) fall back to the last day that has data, so a
/// Monday bar references Friday.
pub fn derive_reference_levels(series: &BarSeries) -> Vec<Option<ReferenceLevel>> {
    let mut levels = Vec::with_capacity(series.len());

    // Last bar seen of the day currently being walked
    let mut current: Option<(i64, ReferenceLevel)> = None;
    // Last bar of the day before that
    let mut previous: Option<ReferenceLevel> = None;

    let columns = series
        .timestamps_ms()
        .iter()
        .zip(series.high_prices())
        .zip(series.low_prices());

    for ((&timestamp_ms, &high), &low) in columns {
        let day = day_number(timestamp_ms);
        let bar_level = ReferenceLevel {
            previous_day_high: high,
            previous_day_low: low,
        };

        match current {
            Some((current_day, last_bar)) if current_day != day => {
                previous = Some(last_bar);
            }
            _ => {}
        }
        current = Some((day, bar_level));
        levels.push(previous);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, TickerInterval};

    const H: i64 = TimeUtils::MS_IN_H;
    const D: i64 = TimeUtils::MS_IN_D;

    fn series(bars: Vec<Bar>) -> BarSeries {
        BarSeries::from_bars(TickerInterval::new("TEST", H), bars).unwrap()
    }

    fn level(high: f64, low: f64) -> Option<ReferenceLevel> {
        Some(ReferenceLevel {
            previous_day_high: high,
            previous_day_low: low,
        })
    }

    #[test]
    fn first_day_has_no_level_and_later_days_use_last_bar_of_prior_day() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0),
            Bar::new(6 * H, 11.0, 15.0, 10.0, 14.0),
            Bar::new(D, 14.0, 16.0, 13.0, 15.0),
            Bar::new(D + 6 * H, 15.0, 17.0, 14.0, 16.0),
            Bar::new(2 * D, 16.0, 18.0, 15.0, 17.0),
        ];
        let levels = derive_reference_levels(&series(bars));
        assert_eq!(
            levels,
            vec![
                None,
                None,
                level(15.0, 10.0),
                level(15.0, 10.0),
                level(17.0, 14.0),
            ]
        );
    }

    #[test]
    fn missing_days_fall_back_to_last_day_with_data() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0),
            Bar::new(3 * D, 11.0, 13.0, 10.0, 12.0),
        ];
        let levels = derive_reference_levels(&series(bars));
        assert_eq!(levels, vec![None, level(12.0, 9.0)]);
    }

    #[test]
    fn never_uses_same_or_later_day() {
        // Several bars per day with distinct prices so a level can be traced
        // back to exactly one source bar.
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64;
                Bar::new(i as i64 * 5 * H, base, base + 0.5, base - 0.5, base + 0.25)
            })
            .collect();
        let series = series(bars);
        let levels = derive_reference_levels(&series);
        let days: Vec<i64> = series.timestamps_ms().iter().map(|&t| day_number(t)).collect();

        for (i, entry) in levels.iter().enumerate() {
            let Some(level) = entry else {
                assert_eq!(days[i], days[0]);
                continue;
            };
            let source = series
                .high_prices()
                .iter()
                .position(|&h| h == level.previous_day_high)
                .unwrap();
            assert!(days[source] < days[i]);
            assert_eq!(series.low_prices()[source], level.previous_day_low);
            // Source is the last bar of its day
            assert!(source + 1 == series.len() || days[source + 1] != days[source]);
        }
    }

    #[test]
    fn empty_series_yields_no_levels() {
        assert!(derive_reference_levels(&series(Vec::new())).is_empty());
    }
}
