use eframe::egui::{self, Color32};
use eframe::{Frame, NativeOptions};
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot};

use crate::config::PlotConfig;
use crate::error::ChartError;
use crate::models::BarSeries;
use crate::ui::chart_surface::{ChartScene, ChartSurface, LineStyle, OverlayKind};
use crate::ui::plot_layers::{CandleLayer, LabelLayer, LayerContext, PlotLayer, SegmentLayer, ZoneLayer};
use crate::ui::utils::{format_bar_time, format_price, setup_custom_visuals};

/// Interactive chart window. Shapes are collected into a `ChartScene` and
/// replayed every frame once `show` opens the window.
pub struct EguiChart {
    scene: ChartScene,
    plot: PlotConfig,
}

impl EguiChart {
    pub fn new(plot: PlotConfig) -> Self {
        Self {
            scene: ChartScene::new(),
            plot,
        }
    }

    pub fn scene(&self) -> &ChartScene {
        &self.scene
    }
}

impl ChartSurface for EguiChart {
    fn add_candlesticks(&mut self, series: &BarSeries) {
        self.scene.add_candlesticks(series);
    }

    fn add_line_segment(
        &mut self,
        kind: OverlayKind,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        style: &LineStyle,
    ) {
        self.scene.add_line_segment(kind, x0, y0, x1, y1, style);
    }

    fn add_rectangle(&mut self, kind: OverlayKind, x0: f64, y0: f64, x1: f64, y1: f64, fill: Color32) {
        self.scene.add_rectangle(kind, x0, y0, x1, y1, fill);
    }

    fn add_label(&mut self, kind: OverlayKind, x: f64, y: f64, text: &str, color: Color32) {
        self.scene.add_label(kind, x, y, text, color);
    }

    fn set_title(&mut self, title: &str) {
        self.scene.set_title(title);
    }

    /// Blocks until the window is closed.
    fn show(&mut self) -> Result<(), ChartError> {
        let app = ChartApp {
            scene: std::mem::take(&mut self.scene),
            plot: self.plot,
        };
        let title = if app.scene.title.is_empty() {
            "Block Sniper".to_string()
        } else {
            app.scene.title.clone()
        };

        eframe::run_native(
            &title,
            NativeOptions::default(),
            Box::new(move |cc| {
                setup_custom_visuals(&cc.egui_ctx);
                Ok(Box::new(app))
            }),
        )
        .map_err(|e| ChartError::Display(e.to_string()))
    }
}

struct ChartApp {
    scene: ChartScene,
    plot: PlotConfig,
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.scene.title);

            Plot::new("block_sniper_chart")
                .legend(Legend::default().position(Corner::LeftTop))
                .custom_x_axes(vec![create_x_axis(&self.scene)])
                .custom_y_axes(vec![create_y_axis(&self.scene)])
                .x_grid_spacer(bar_grid_spacer(self.plot.plot_axis_divisions))
                .label_formatter(|_, point| format_price(point.y))
                .show(ui, |plot_ui| {
                    let ctx = LayerContext {
                        scene: &self.scene,
                        plot: &self.plot,
                    };

                    // Back to front
                    let layers: Vec<Box<dyn PlotLayer>> = vec![
                        Box::new(ZoneLayer),
                        Box::new(CandleLayer),
                        Box::new(SegmentLayer),
                        Box::new(LabelLayer),
                    ];

                    for layer in layers {
                        layer.render(plot_ui, &ctx);
                    }
                });
        });
    }
}

fn create_x_axis(scene: &ChartScene) -> AxisHints<'static> {
    let (timestamps, intraday) = match &scene.candles {
        Some(series) => (
            series.timestamps_ms().to_vec(),
            series.ticker_interval().is_intraday(),
        ),
        None => (Vec::new(), false),
    };
    AxisHints::new_x()
        .label("Date (UTC)")
        .formatter(move |grid_mark, _range| format_bar_time(&timestamps, grid_mark.value, intraday))
}

/// Grid marks on whole bar indices, about `divisions` across the visible range.
fn bar_grid_spacer(divisions: u32) -> impl Fn(egui_plot::GridInput) -> Vec<egui_plot::GridMark> {
    move |input| {
        let (min, max) = input.bounds;
        let step = ((max - min) / divisions.max(1) as f64).ceil().max(1.0);
        let start = (min / step).ceil() as i64;
        let end = (max / step).floor() as i64;
        (start..=end)
            .map(|i| egui_plot::GridMark {
                value: i as f64 * step,
                step_size: step,
            })
            .collect()
    }
}

fn create_y_axis(scene: &ChartScene) -> AxisHints<'static> {
    let label = scene
        .candles
        .as_ref()
        .map(|series| format!("{} Price", series.ticker_interval().name()))
        .unwrap_or_else(|| "Price".to_string());
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLOT_CONFIG;
    use crate::domain::Direction;

    #[test]
    fn drawing_is_collected_until_shown() {
        let mut chart = EguiChart::new(PLOT_CONFIG);
        chart.set_title("BTCUSDT Price for 6mo");
        chart.add_rectangle(
            OverlayKind::OrderBlock(Direction::Bullish),
            1.0,
            9.0,
            4.0,
            11.0,
            PLOT_CONFIG.bullish_block_color,
        );
        assert_eq!(chart.scene().title, "BTCUSDT Price for 6mo");
        assert_eq!(chart.scene().count(OverlayKind::OrderBlock(Direction::Bullish)), 1);
    }
}
