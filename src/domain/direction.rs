use std::fmt;

/// Which side of the market a structure break or order block belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum_macros::EnumIter)]
pub enum Direction {
    /// Close broke above a structural high; zone is demand.
    Bullish,
    /// Close broke below a structural low; zone is supply.
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "Bullish"),
            Direction::Bearish => write!(f, "Bearish"),
        }
    }
}
