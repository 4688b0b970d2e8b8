//! Configuration module for the block-sniper application.

pub mod analysis;
pub mod binance;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod fetch;
pub mod plot;
pub mod settings;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use binance::BINANCE;
pub use fetch::FETCH_DEFAULTS;
pub use plot::{PLOT_CONFIG, PlotConfig, parse_color};
pub use settings::{ChartSettings, FetchSettings, SettingsFile};
