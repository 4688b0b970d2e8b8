//! Rolling structural extremes: min of lows / max of highs over a trailing window.
//!
//! Both trackers run a monotonic deque, so a full pass is O(N) regardless of W.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Low,
    High,
}

impl Extreme {
    /// `true` when `candidate` is at least as extreme as `incumbent`.
    /// Equal values count, so the later bar wins a tie.
    fn dominates(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Extreme::Low => candidate <= incumbent,
            Extreme::High => candidate >= incumbent,
        }
    }
}

/// The bar attaining the window extreme, and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub index: usize,
    pub value: f64,
}

/// Entry `i` is the extreme over `values[i + 1 - window ..= i]`, or `None` for
/// the first `window - 1` entries. Ties go to the most recent bar.
pub fn rolling_pivots(values: &[f64], window: usize, extreme: Extreme) -> Vec<Option<Pivot>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut candidates: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut pivots = Vec::with_capacity(values.len());

    for (i, &value) in values.iter().enumerate() {
        while candidates
            .back()
            .is_some_and(|&back| extreme.dominates(value, values[back]))
        {
            candidates.pop_back();
        }
        candidates.push_back(i);

        // Drop the front once it slides out of the window
        while candidates.front().is_some_and(|&front| i - front >= window) {
            candidates.pop_front();
        }

        let pivot = if i + 1 >= window {
            candidates.front().map(|&index| Pivot {
                index,
                value: values[index],
            })
        } else {
            None
        };
        pivots.push(pivot);
    }
    pivots
}

/// Rolling minimum of `lows`, one entry per bar.
pub fn structural_lows(lows: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_pivots(lows, window, Extreme::Low)
        .into_iter()
        .map(|p| p.map(|p| p.value))
        .collect()
}

/// Rolling maximum of `highs`, one entry per bar.
pub fn structural_highs(highs: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_pivots(highs, window, Extreme::High)
        .into_iter()
        .map(|p| p.map(|p| p.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_values(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| ((i * 37 + 11) % 17) as f64 + (i as f64 * 0.7).sin())
            .collect()
    }

    #[test]
    fn matches_brute_force_window_minimum() {
        let lows = sample_values(120);
        for window in [1, 2, 3, 7, 15, 50] {
            let tracked = structural_lows(&lows, window);
            assert_eq!(tracked.len(), lows.len());
            for (i, value) in tracked.iter().enumerate() {
                if i + 1 < window {
                    assert_eq!(*value, None, "window {} index {}", window, i);
                } else {
                    let expected = lows[i + 1 - window..=i]
                        .iter()
                        .copied()
                        .fold(f64::INFINITY, f64::min);
                    assert_eq!(*value, Some(expected), "window {} index {}", window, i);
                }
            }
        }
    }

    #[test]
    fn matches_brute_force_window_maximum() {
        let highs = sample_values(80);
        let window = 9;
        let tracked = structural_highs(&highs, window);
        for i in window - 1..highs.len() {
            let expected = highs[i + 1 - window..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(tracked[i], Some(expected));
        }
    }

    #[test]
    fn ties_resolve_to_most_recent_bar() {
        let lows = [5.0, 3.0, 4.0, 3.0, 6.0];
        let pivots = rolling_pivots(&lows, 4, Extreme::Low);
        assert_eq!(pivots[3].map(|p| p.index), Some(3));
        assert_eq!(pivots[4].map(|p| p.index), Some(3));

        let highs = [7.0, 7.0, 1.0];
        let pivots = rolling_pivots(&highs, 3, Extreme::High);
        assert_eq!(pivots[2], Some(Pivot { index: 1, value: 7.0 }));
    }

    #[test]
    fn pivot_expires_when_it_leaves_the_window() {
        let lows = [1.0, 5.0, 4.0, 6.0];
        let pivots = rolling_pivots(&lows, 3, Extreme::Low);
        assert_eq!(pivots[2].map(|p| p.index), Some(0));
        assert_eq!(pivots[3].map(|p| p.index), Some(2));
    }

    #[test]
    fn short_or_empty_input_is_all_undefined() {
        assert!(structural_lows(&[], 3).is_empty());
        assert_eq!(structural_lows(&[1.0, 2.0], 3), vec![None, None]);
        assert_eq!(structural_highs(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn oversized_window_is_all_undefined() {
        assert_eq!(structural_lows(&[3.0, 2.0], usize::MAX), vec![None, None]);
        assert_eq!(structural_highs(&[3.0, 2.0, 1.0], usize::MAX / 2), vec![None, None, None]);
        assert_eq!(
            rolling_pivots(&[1.0, 2.0, 3.0], 1_000_000_000, Extreme::Low),
            vec![None, None, None]
        );
    }
}
