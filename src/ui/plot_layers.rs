use eframe::egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Line, PlotPoint, PlotPoints, PlotUi, Polygon, Text};

use crate::config::PlotConfig;
use crate::domain::CandleType;
use crate::ui::chart_surface::{ChartScene, Shape};

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub scene: &'a ChartScene,
    pub plot: &'a PlotConfig,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. ZONE LAYER (Order-block rectangles, behind the candles)
// ============================================================================
pub struct ZoneLayer;

impl PlotLayer for ZoneLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for shape in &ctx.scene.shapes {
            let Shape::Rectangle {
                kind,
                min,
                max,
                fill,
            } = shape
            else {
                continue;
            };

            let points = PlotPoints::new(vec![
                [min[0], min[1]],
                [max[0], min[1]],
                [max[0], max[1]],
                [min[0], max[1]],
            ]);

            // Name passed here enables Legend grouping
            plot_ui.polygon(
                Polygon::new(kind.legend_name(), points)
                    .fill_color(*fill)
                    .stroke(Stroke::NONE),
            );
        }
    }
}

// ============================================================================
// 2. CANDLE LAYER
// ============================================================================
pub struct CandleLayer;

impl PlotLayer for CandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(series) = &ctx.scene.candles else {
            return;
        };

        let elems: Vec<BoxElem> = series
            .bars()
            .enumerate()
            .map(|(i, bar)| {
                let color = match bar.get_type() {
                    CandleType::Bullish => ctx.plot.candle_up_color,
                    CandleType::Bearish => ctx.plot.candle_down_color,
                };
                let (body_low, body_high) = bar.body_range();
                BoxElem::new(
                    i as f64,
                    BoxSpread::new(
                        bar.low_price,
                        body_low,
                        (body_low + body_high) / 2.0,
                        body_high,
                        bar.high_price,
                    ),
                )
                .box_width(ctx.plot.candle_width)
                .whisker_width(0.0)
                .fill(color)
                .stroke(Stroke::new(1.0, color))
            })
            .collect();

        plot_ui.box_plot(BoxPlot::new(series.ticker_interval().name(), elems));
    }
}

// ============================================================================
// 3. SEGMENT LAYER (PDH/PDL runs and BOS lines)
// ============================================================================
pub struct SegmentLayer;

impl PlotLayer for SegmentLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for shape in &ctx.scene.shapes {
            let Shape::Segment {
                kind,
                from,
                to,
                style,
            } = shape
            else {
                continue;
            };

            let mut line = Line::new(kind.legend_name(), PlotPoints::new(vec![*from, *to]))
                .color(style.color)
                .width(style.width);
            if style.dashed {
                line = line.style(egui_plot::LineStyle::dashed_loose());
            }
            plot_ui.line(line);
        }
    }
}

// ============================================================================
// 4. LABEL LAYER
// ============================================================================
pub struct LabelLayer;

impl PlotLayer for LabelLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for shape in &ctx.scene.shapes {
            if let Shape::Label {
                kind,
                at,
                text,
                color,
            } = shape
            {
                let text = RichText::new(text.as_str())
                    .color(label_color(*color, ctx.plot))
                    .strong();
                plot_ui.text(
                    Text::new(kind.legend_name(), PlotPoint::new(at[0], at[1]), text)
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        }
    }
}

/// Fully transparent overlay colors would hide the label; fall back to the text color.
fn label_color(color: Color32, plot: &PlotConfig) -> Color32 {
    if color.a() == 0 {
        plot.label_text_color
    } else {
        color
    }
}
