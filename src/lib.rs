#![allow(clippy::collapsible_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod ui;
pub mod utils;

use std::path::PathBuf;

use chrono::Utc;

// Re-export commonly used types
pub use config::ChartSettings;
pub use domain::{Bar, Direction, Period, TickerInterval};
pub use error::ChartError;
pub use models::{BarSeries, BosEvent, Detection, OrderBlock, ReferenceLevel};
pub use ui::{ChartScene, ChartSurface, EguiChart, RenderSummary};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Instrument symbol, e.g. BTCUSDT
    #[arg(long)]
    pub ticker: Option<String>,

    /// How far back to fetch: 5d, 2wk, 6mo, 2y, ytd or max
    #[arg(long)]
    pub period: Option<String>,

    /// Bar interval: 1h, 4h, 1d, 1w, ...
    #[arg(long)]
    pub interval: Option<String>,

    /// Structural low/high window length, in bars
    #[arg(long)]
    pub window: Option<usize>,

    /// JSON settings file; command-line flags take precedence over it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chart generated data instead of calling the Binance API
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Bullish order-block fill, any CSS color (e.g. "rgba(0,255,0,0.35)")
    #[arg(long)]
    pub bullish_color: Option<String>,

    /// Bearish order-block fill, any CSS color
    #[arg(long)]
    pub bearish_color: Option<String>,

    #[arg(long, default_value_t = false)]
    pub hide_reference_levels: bool,

    #[arg(long, default_value_t = false)]
    pub hide_order_blocks: bool,

    #[arg(long, default_value_t = false)]
    pub hide_bos: bool,

    /// Run order blocks to the right edge even after price closes back through them
    #[arg(long, default_value_t = false)]
    pub uncapped_blocks: bool,
}

/// Logger for the binary. `directives` is the raw `RUST_LOG` value; without it
/// everything logs at info.
pub fn logger_builder(directives: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(directives.unwrap_or("info"));
    builder
}

/// Everything derived from one series, plus what was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOverlays {
    pub reference_levels: Vec<Option<ReferenceLevel>>,
    pub detection: Detection,
    pub render: RenderSummary,
}

/// Fetch the configured series with the configured source.
pub async fn fetch_series(settings: &ChartSettings) -> Result<BarSeries, ChartError> {
    let source = data::source_for(&settings.fetch);
    let request = data::FetchRequest::from_settings(&settings.fetch, Utc::now());
    data::load_bar_series(source.as_ref(), &request).await
}

/// Derive, detect and draw. Fewer bars than the structure window is not an
/// error: the order-block and BOS overlays are simply empty.
pub fn run_pipeline<S: ChartSurface + ?Sized>(
    series: &BarSeries,
    settings: &ChartSettings,
    surface: &mut S,
) -> ChartOverlays {
    let window = settings.analysis.structure_window;
    if !series.is_empty() && series.len() < window {
        log::warn!(
            "{}: only {} bars, fewer than the {}-bar structure window; no order blocks or BOS",
            series.ticker_interval(),
            series.len(),
            window
        );
    }

    let reference_levels = analysis::derive_reference_levels(series);
    let detection = analysis::detect_order_blocks(series, &settings.analysis);
    let render = ui::render_chart(
        surface,
        &settings.chart_title(),
        series,
        &reference_levels,
        &detection,
        &settings.plot,
    );

    log_run_summary(series, &detection);
    ChartOverlays {
        reference_levels,
        detection,
        render,
    }
}

fn log_run_summary(series: &BarSeries, detection: &Detection) {
    let last_bos = detection
        .bos_events
        .last()
        .map(|event| {
            format!(
                "{} at bar {} ({})",
                event.direction,
                event.index,
                ui::utils::format_price(event.price_level)
            )
        })
        .unwrap_or_else(|| "none".to_string());
    log::info!(
        "{}: {} bars, {} bullish / {} bearish order blocks, {} BOS events, latest BOS: {}",
        series.ticker_interval(),
        series.len(),
        detection.bullish_blocks.len(),
        detection.bearish_blocks.len(),
        detection.bos_events.len(),
        last_bos
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsFile;
    use crate::data::{FetchRequest, synthetic};
    use crate::ui::OverlayKind;
    use chrono::TimeZone;

    fn settings(cli: Cli) -> ChartSettings {
        ChartSettings::from_layers(&SettingsFile::default(), &cli).unwrap()
    }

    #[test]
    fn pipeline_draws_detector_output() {
        let settings = settings(Cli {
            ticker: Some("DEMO".into()),
            period: Some("1y".into()),
            ..Default::default()
        });
        let request = FetchRequest::from_settings(
            &settings.fetch,
            Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap(),
        );
        let series = synthetic::generate(&request).unwrap();

        let mut scene = ChartScene::new();
        let overlays = run_pipeline(&series, &settings, &mut scene);

        assert_eq!(scene.title, "DEMO Price for 1y");
        assert_eq!(overlays.reference_levels.len(), series.len());
        assert!(!overlays.detection.is_empty());
        assert_eq!(
            scene.count(OverlayKind::OrderBlock(Direction::Bearish)),
            overlays.detection.bearish_blocks.len()
        );
        assert_eq!(
            overlays.render.bos_lines,
            overlays.detection.bos_events.len()
        );
    }

    #[test]
    fn rust_log_overrides_the_info_default() {
        use log::LevelFilter;
        assert_eq!(logger_builder(None).build().filter(), LevelFilter::Info);
        assert_eq!(logger_builder(Some("debug")).build().filter(), LevelFilter::Debug);
        assert_eq!(
            logger_builder(Some("warn,block_sniper=trace")).build().filter(),
            LevelFilter::Trace
        );
    }

    #[test]
    fn empty_series_renders_bare_chart() {
        let settings = settings(Cli::default());
        let series = BarSeries::empty(settings.fetch.ticker_interval.clone());
        let mut scene = ChartScene::new();
        let overlays = run_pipeline(&series, &settings, &mut scene);

        assert!(overlays.reference_levels.is_empty());
        assert!(overlays.detection.is_empty());
        assert!(scene.shapes.is_empty());
        assert!(scene.candles.is_some());
    }

    #[test]
    fn short_series_has_no_structure_overlays() {
        let settings = settings(Cli {
            window: Some(50),
            ..Default::default()
        });
        let bars = (0..10)
            .map(|i| {
                let p = 100.0 + i as f64;
                Bar::new(i * utils::TimeUtils::MS_IN_D, p, p + 2.0, p - 2.0, p + 1.0)
            })
            .collect();
        let series = BarSeries::from_bars(settings.fetch.ticker_interval.clone(), bars).unwrap();
        let mut scene = ChartScene::new();
        let overlays = run_pipeline(&series, &settings, &mut scene);

        assert!(overlays.detection.is_empty());
        // Reference levels do not depend on the window
        assert!(overlays.render.reference_segments > 0);
    }
}
