// Domain types and value objects
pub mod bar;
pub mod direction;
pub mod period;
pub mod ticker_interval;

// Re-export commonly used types
pub use bar::{Bar, CandleType};
pub use direction::Direction;
pub use period::Period;
pub use ticker_interval::TickerInterval;
