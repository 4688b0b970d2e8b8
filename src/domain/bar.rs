// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLC sample. Immutable once it is part of a `BarSeries`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub timestamp_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: Option<f64>,
}

impl Bar {
    // A constructor for convenience
    pub fn new(
        timestamp_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
    ) -> Self {
        Bar {
            timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close_price >= self.open_price {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open_price, self.close_price),
            CandleType::Bearish => (self.close_price, self.open_price),
        }
    }

    /// Checks the OHLC invariant. The error string names the broken rule.
    pub fn check_invariant(&self) -> Result<(), String> {
        let prices = [
            self.open_price,
            self.high_price,
            self.low_price,
            self.close_price,
        ];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price".to_string());
        }
        if self.low_price > self.high_price {
            return Err(format!(
                "low {} above high {}",
                self.low_price, self.high_price
            ));
        }
        let (body_low, body_high) = self.body_range();
        if body_low < self.low_price || body_high > self.high_price {
            return Err(format!(
                "open {} / close {} outside [{}, {}]",
                self.open_price, self.close_price, self.low_price, self.high_price
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_type_follows_close_vs_open() {
        assert_eq!(Bar::new(0, 10.0, 12.0, 9.0, 11.0).get_type(), CandleType::Bullish);
        assert_eq!(Bar::new(0, 11.0, 12.0, 9.0, 10.0).get_type(), CandleType::Bearish);
        // Doji counts as bullish
        assert_eq!(Bar::new(0, 10.0, 12.0, 9.0, 10.0).get_type(), CandleType::Bullish);
    }

    #[test]
    fn invariant_rejects_body_outside_range() {
        assert!(Bar::new(0, 10.0, 12.0, 9.0, 11.0).check_invariant().is_ok());
        assert!(Bar::new(0, 10.0, 12.0, 9.0, 13.0).check_invariant().is_err());
        assert!(Bar::new(0, 8.0, 12.0, 9.0, 11.0).check_invariant().is_err());
        assert!(Bar::new(0, 10.0, 9.0, 12.0, 10.0).check_invariant().is_err());
        assert!(Bar::new(0, f64::NAN, 12.0, 9.0, 11.0).check_invariant().is_err());
    }
}
