//! Plot visualization configuration

use eframe::egui::Color32;

use crate::domain::Direction;
use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotConfig {
    pub bullish_block_color: Color32,
    pub bearish_block_color: Color32,
    pub bullish_bos_color: Color32,
    pub bearish_bos_color: Color32,
    pub pdh_color: Color32,
    pub pdl_color: Color32,
    pub candle_up_color: Color32,
    pub candle_down_color: Color32,
    pub label_text_color: Color32,
    /// Candle body width as a fraction of one bar slot
    pub candle_width: f64,
    pub reference_line_width: f32,
    pub bos_line_width: f32,
    // Overlay visibility
    // `false` values won't appear at all in the plot
    // `true` values appear by default (but can be hidden later in the legend)
    pub show_reference_levels: bool,
    pub show_reference_labels: bool,
    pub show_bullish_order_blocks: bool,
    pub show_bearish_order_blocks: bool,
    pub show_bullish_bos: bool,
    pub show_bearish_bos: bool,
    /// Stop order-block rectangles at the first close back through the zone
    /// instead of running them to the right edge.
    pub cap_invalidated_blocks: bool,
    /// Plot x axis divisions (split axis into n equal parts)
    pub plot_axis_divisions: u32,
}

impl PlotConfig {
    pub fn block_color(&self, direction: Direction) -> Color32 {
        match direction {
            Direction::Bullish => self.bullish_block_color,
            Direction::Bearish => self.bearish_block_color,
        }
    }

    pub fn bos_color(&self, direction: Direction) -> Color32 {
        match direction {
            Direction::Bullish => self.bullish_bos_color,
            Direction::Bearish => self.bearish_bos_color,
        }
    }

    pub fn shows_blocks(&self, direction: Direction) -> bool {
        match direction {
            Direction::Bullish => self.show_bullish_order_blocks,
            Direction::Bearish => self.show_bearish_order_blocks,
        }
    }

    pub fn shows_bos(&self, direction: Direction) -> bool {
        match direction {
            Direction::Bullish => self.show_bullish_bos,
            Direction::Bearish => self.show_bearish_bos,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PLOT_CONFIG
    }
}

/// Parse a CSS color (`#00ff00`, `rgba(0,255,0,0.35)`, `teal`, ...).
pub fn parse_color(text: &str) -> Result<Color32, ChartError> {
    let color = colorgrad::Color::from_html(text.trim())
        .map_err(|e| ChartError::InvalidConfig(format!("bad color '{}': {}", text, e)))?;
    let [r, g, b, a] = color.to_rgba8();
    Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    // rgba(0,255,0,0.35) / rgba(255,0,0,0.35), premultiplied
    bullish_block_color: Color32::from_rgba_premultiplied(0, 89, 0, 89),
    bearish_block_color: Color32::from_rgba_premultiplied(89, 0, 0, 89),
    bullish_bos_color: Color32::from_rgb(0, 200, 0), // Green
    bearish_bos_color: Color32::from_rgb(200, 0, 0), // Red
    pdh_color: Color32::from_rgb(65, 105, 225),      // Royal blue
    pdl_color: Color32::from_rgb(220, 20, 60),       // Crimson
    candle_up_color: Color32::from_rgb(38, 166, 91),
    candle_down_color: Color32::from_rgb(214, 48, 49),
    label_text_color: Color32::WHITE,
    candle_width: 0.5,
    reference_line_width: 1.0,
    bos_line_width: 1.5,
    show_reference_levels: true,
    show_reference_labels: true,
    show_bullish_order_blocks: true,
    show_bearish_order_blocks: true,
    show_bullish_bos: true,
    show_bearish_bos: true,
    cap_invalidated_blocks: true,
    plot_axis_divisions: 10,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_rgba_colors() {
        assert_eq!(parse_color("#00ff00").unwrap(), Color32::from_rgb(0, 255, 0));
        let translucent = parse_color("rgba(255,0,0,0.5)").unwrap();
        assert!((127..=128).contains(&translucent.a()));
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn direction_keyed_lookups() {
        let cfg = PLOT_CONFIG;
        assert_eq!(cfg.block_color(Direction::Bullish), cfg.bullish_block_color);
        assert_eq!(cfg.bos_color(Direction::Bearish), cfg.bearish_bos_color);
        let hidden = PlotConfig {
            show_bearish_bos: false,
            ..PLOT_CONFIG
        };
        assert!(!hidden.shows_bos(Direction::Bearish));
        assert!(hidden.shows_bos(Direction::Bullish));
    }
}
