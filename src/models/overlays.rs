use crate::domain::Direction;

/// Previous-day high/low attached to one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLevel {
    pub previous_day_high: f64,
    pub previous_day_low: f64,
}

/// A supply (bearish) or demand (bullish) zone implicated in a structure break.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBlock {
    /// Origin bar of the zone.
    pub start_index: usize,
    /// Bar whose close broke structure and created the zone.
    pub end_index: usize,
    pub top: f64,
    pub bottom: f64,
    pub direction: Direction,
}

impl OrderBlock {
    /// First bar after creation whose close trades back through the zone:
    /// above `top` for a bearish block, below `bottom` for a bullish one.
    pub fn invalidated_at(&self, close_prices: &[f64]) -> Option<usize> {
        close_prices
            .iter()
            .enumerate()
            .skip(self.end_index + 1)
            .find(|&(_, &close)| match self.direction {
                Direction::Bearish => close > self.top,
                Direction::Bullish => close < self.bottom,
            })
            .map(|(idx, _)| idx)
    }
}

/// A close beyond the tracked structural extreme.
#[derive(Debug, Clone, PartialEq)]
pub struct BosEvent {
    /// Bar whose close broke structure.
    pub index: usize,
    /// Bar that set the structural extreme being broken.
    pub pivot_index: usize,
    /// The structural extreme (low for bearish, high for bullish).
    pub price_level: f64,
    pub direction: Direction,
}

/// Everything one detector pass produces, each list ordered by bar index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub bullish_blocks: Vec<OrderBlock>,
    pub bearish_blocks: Vec<OrderBlock>,
    pub bos_events: Vec<BosEvent>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.bullish_blocks.is_empty() && self.bearish_blocks.is_empty() && self.bos_events.is_empty()
    }

    pub fn blocks(&self, direction: Direction) -> &[OrderBlock] {
        match direction {
            Direction::Bullish => &self.bullish_blocks,
            Direction::Bearish => &self.bearish_blocks,
        }
    }

    pub fn bos_events(&self, direction: Direction) -> impl Iterator<Item = &BosEvent> {
        self.bos_events
            .iter()
            .filter(move |event| event.direction == direction)
    }
}
