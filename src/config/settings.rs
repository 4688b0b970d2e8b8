//! Runtime settings: compile-time defaults, overlaid by an optional JSON file,
//! overlaid by CLI flags. Resolved once at startup and passed down explicitly.

use std::path::Path;

use serde::Deserialize;

use crate::Cli;
use crate::config::analysis::AnalysisConfig;
use crate::config::fetch::FETCH_DEFAULTS;
use crate::config::plot::{PlotConfig, parse_color};
use crate::domain::{Period, TickerInterval};
use crate::error::ChartError;

/// Optional overrides read from `--config <file.json>`. Every field may be omitted.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
    pub structure_window: Option<usize>,
    pub bullish_color: Option<String>,
    pub bearish_color: Option<String>,
    pub bullish_bos_color: Option<String>,
    pub bearish_bos_color: Option<String>,
    pub candle_width: Option<f64>,
    pub show_reference_levels: Option<bool>,
    pub show_bullish_order_blocks: Option<bool>,
    pub show_bearish_order_blocks: Option<bool>,
    pub show_bullish_bos: Option<bool>,
    pub show_bearish_bos: Option<bool>,
    pub cap_invalidated_blocks: Option<bool>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChartError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        serde_json::from_str(text)
            .map_err(|e| ChartError::InvalidConfig(format!("settings file: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub ticker_interval: TickerInterval,
    pub period: Period,
    pub use_demo_data: bool,
}

/// The full configuration value object handed to each pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub fetch: FetchSettings,
    pub analysis: AnalysisConfig,
    pub plot: PlotConfig,
}

impl ChartSettings {
    pub fn resolve(cli: &Cli) -> Result<Self, ChartError> {
        let file = match &cli.config {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        Self::from_layers(&file, cli)
    }

    /// CLI wins over file, file wins over defaults.
    pub fn from_layers(file: &SettingsFile, cli: &Cli) -> Result<Self, ChartError> {
        let ticker = pick(&cli.ticker, &file.ticker, FETCH_DEFAULTS.ticker);
        let interval = pick(&cli.interval, &file.interval, FETCH_DEFAULTS.interval);
        let period = pick(&cli.period, &file.period, FETCH_DEFAULTS.period);

        let fetch = FetchSettings {
            ticker_interval: TickerInterval::parse(ticker, interval)?,
            period: period.parse()?,
            use_demo_data: cli.demo,
        };

        let mut analysis = AnalysisConfig::default();
        if let Some(window) = cli.window.or(file.structure_window) {
            analysis.structure_window = window;
        }
        analysis.validate()?;

        let mut plot = PlotConfig::default();
        if let Some(color) = cli.bullish_color.as_ref().or(file.bullish_color.as_ref()) {
            plot.bullish_block_color = parse_color(color)?;
        }
        if let Some(color) = cli.bearish_color.as_ref().or(file.bearish_color.as_ref()) {
            plot.bearish_block_color = parse_color(color)?;
        }
        if let Some(color) = &file.bullish_bos_color {
            plot.bullish_bos_color = parse_color(color)?;
        }
        if let Some(color) = &file.bearish_bos_color {
            plot.bearish_bos_color = parse_color(color)?;
        }
        if let Some(width) = file.candle_width {
            if !(width > 0.0 && width <= 1.0) {
                return Err(ChartError::InvalidConfig(format!(
                    "candle_width {} must be in (0, 1]",
                    width
                )));
            }
            plot.candle_width = width;
        }

        plot.show_reference_levels = file
            .show_reference_levels
            .unwrap_or(plot.show_reference_levels);
        plot.show_bullish_order_blocks = file
            .show_bullish_order_blocks
            .unwrap_or(plot.show_bullish_order_blocks);
        plot.show_bearish_order_blocks = file
            .show_bearish_order_blocks
            .unwrap_or(plot.show_bearish_order_blocks);
        plot.show_bullish_bos = file.show_bullish_bos.unwrap_or(plot.show_bullish_bos);
        plot.show_bearish_bos = file.show_bearish_bos.unwrap_or(plot.show_bearish_bos);
        plot.cap_invalidated_blocks = file
            .cap_invalidated_blocks
            .unwrap_or(plot.cap_invalidated_blocks);

        // Flags only ever switch things off
        if cli.hide_reference_levels {
            plot.show_reference_levels = false;
            plot.show_reference_labels = false;
        }
        if cli.hide_order_blocks {
            plot.show_bullish_order_blocks = false;
            plot.show_bearish_order_blocks = false;
        }
        if cli.hide_bos {
            plot.show_bullish_bos = false;
            plot.show_bearish_bos = false;
        }
        if cli.uncapped_blocks {
            plot.cap_invalidated_blocks = false;
        }

        Ok(Self {
            fetch,
            analysis,
            plot,
        })
    }

    /// Chart title, e.g. "BTCUSDT Price for 2y".
    pub fn chart_title(&self) -> String {
        format!(
            "{} Price for {}",
            self.fetch.ticker_interval.name(),
            self.fetch.period
        )
    }
}

fn pick<'a>(cli: &'a Option<String>, file: &'a Option<String>, default: &'a str) -> &'a str {
    cli.as_deref().or(file.as_deref()).unwrap_or(default)
}
