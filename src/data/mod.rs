// Bar series providers
pub mod binance;
pub mod source;
pub mod synthetic;

// Re-export commonly used types
pub use binance::BinanceSource;
pub use source::{FetchBarSeries, FetchRequest, load_bar_series};
pub use synthetic::SyntheticSource;

use crate::config::FetchSettings;

/// The provider the settings ask for.
pub fn source_for(settings: &FetchSettings) -> Box<dyn FetchBarSeries> {
    if settings.use_demo_data {
        Box::new(SyntheticSource)
    } else {
        Box::new(BinanceSource)
    }
}
