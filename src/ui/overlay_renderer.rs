//! Draws the derived overlays onto any `ChartSurface`.

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::config::{DEBUG_FLAGS, PlotConfig};
use crate::domain::Direction;
use crate::models::{BarSeries, Detection, ReferenceLevel};
use crate::ui::chart_surface::{ChartSurface, LineStyle, OverlayKind};

/// Shapes drawn per category, for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub reference_segments: usize,
    pub bullish_blocks: usize,
    pub bearish_blocks: usize,
    pub bos_lines: usize,
    pub labels: usize,
}

/// A run of consecutive bars sharing one reference value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LevelRun {
    first: usize,
    last: usize,
    value: f64,
}

/// Contiguous runs of equal, defined values. Undefined entries split runs.
fn level_runs(values: impl Iterator<Item = Option<f64>>) -> Vec<LevelRun> {
    let chunks = values
        .enumerate()
        .chunk_by(|(_, value)| value.map(f64::to_bits));

    chunks
        .into_iter()
        .filter_map(|(key, mut chunk)| {
            let value = f64::from_bits(key?);
            let (first, _) = chunk.next()?;
            let last = chunk.last().map_or(first, |(i, _)| i);
            Some(LevelRun { first, last, value })
        })
        .collect()
}

/// Title, candles and every enabled overlay.
pub fn render_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    title: &str,
    series: &BarSeries,
    levels: &[Option<ReferenceLevel>],
    detection: &Detection,
    plot: &PlotConfig,
) -> RenderSummary {
    surface.set_title(title);
    surface.add_candlesticks(series);
    let summary = render_overlays(surface, series, levels, detection, plot);

    if DEBUG_FLAGS.print_render_summary {
        log::info!(
            "Drew {} reference segments, {} bullish / {} bearish blocks, {} BOS lines, {} labels",
            summary.reference_segments,
            summary.bullish_blocks,
            summary.bearish_blocks,
            summary.bos_lines,
            summary.labels
        );
    }
    summary
}

/// Overlays only. Disabled categories draw nothing.
pub fn render_overlays<S: ChartSurface + ?Sized>(
    surface: &mut S,
    series: &BarSeries,
    levels: &[Option<ReferenceLevel>],
    detection: &Detection,
    plot: &PlotConfig,
) -> RenderSummary {
    let mut summary = RenderSummary::default();
    if series.is_empty() {
        return summary;
    }

    if plot.show_reference_levels {
        draw_reference_levels(surface, levels, plot, &mut summary);
    }

    let last_index = series.len() - 1;
    for direction in Direction::iter() {
        if plot.shows_blocks(direction) {
            let kind = OverlayKind::OrderBlock(direction);
            let fill = plot.block_color(direction);
            for block in detection.blocks(direction) {
                let stop = if plot.cap_invalidated_blocks {
                    block
                        .invalidated_at(series.close_prices())
                        .unwrap_or(last_index)
                } else {
                    last_index
                };
                surface.add_rectangle(
                    kind,
                    block.start_index as f64,
                    block.bottom,
                    stop as f64,
                    block.top,
                    fill,
                );
                match direction {
                    Direction::Bullish => summary.bullish_blocks += 1,
                    Direction::Bearish => summary.bearish_blocks += 1,
                }
            }
        }

        if plot.shows_bos(direction) {
            let kind = OverlayKind::BreakOfStructure(direction);
            let style = LineStyle::dashed(plot.bos_color(direction), plot.bos_line_width);
            for event in detection.bos_events(direction) {
                surface.add_line_segment(
                    kind,
                    event.pivot_index as f64,
                    event.price_level,
                    event.index as f64,
                    event.price_level,
                    &style,
                );
                summary.bos_lines += 1;
            }
        }
    }

    summary
}

fn draw_reference_levels<S: ChartSurface + ?Sized>(
    surface: &mut S,
    levels: &[Option<ReferenceLevel>],
    plot: &PlotConfig,
    summary: &mut RenderSummary,
) {
    let sides = [
        (
            OverlayKind::PreviousDayHigh,
            plot.pdh_color,
            level_runs(levels.iter().map(|l| l.map(|l| l.previous_day_high))),
        ),
        (
            OverlayKind::PreviousDayLow,
            plot.pdl_color,
            level_runs(levels.iter().map(|l| l.map(|l| l.previous_day_low))),
        ),
    ];

    for (kind, color, runs) in sides {
        let style = LineStyle::solid(color, plot.reference_line_width);
        for run in &runs {
            surface.add_line_segment(
                kind,
                run.first as f64 - 0.5,
                run.value,
                run.last as f64 + 0.5,
                run.value,
                &style,
            );
            summary.reference_segments += 1;
        }

        if plot.show_reference_labels {
            if let Some(latest) = runs.last() {
                surface.add_label(
                    kind,
                    latest.last as f64 + 0.5,
                    latest.value,
                    kind.legend_name(),
                    color,
                );
                summary.labels += 1;
            }
        }
    }
}
