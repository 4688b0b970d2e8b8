// Analysis algorithms: reference levels, structure tracking, order blocks
pub mod order_blocks;
pub mod reference_levels;
pub mod structure;

// Re-export commonly used types
pub use order_blocks::{PriceColumns, detect, detect_order_blocks};
pub use reference_levels::derive_reference_levels;
pub use structure::{Extreme, Pivot, rolling_pivots, structural_highs, structural_lows};
