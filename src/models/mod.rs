// Domain models for order-block analysis
// These modules contain pure data independent of UI/visualization

pub mod bar_series;
pub mod overlays;

// Re-export key types for convenience
pub use bar_series::BarSeries;
pub use overlays::{BosEvent, Detection, OrderBlock, ReferenceLevel};
