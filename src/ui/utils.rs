use eframe::egui::{Context, Visuals};

use crate::utils::time_utils;

/// Dark theme for the chart window
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.widgets.noninteractive.fg_stroke.color = eframe::egui::Color32::GRAY;
    ctx.set_visuals(visuals);
}

/// Formats a price with "Trader Precision".
/// - Large (>1000): 2 decimals ($95,123.50)
/// - Medium (1-1000): 4 decimals ($12.4829)
/// - Small (<1): 5-8 decimals ($0.00000231)
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "$0.00".to_string();
    }

    let abs_price = price.abs();

    if abs_price >= 1000.0 {
        format!("${:.2}", price)
    } else if abs_price >= 1.0 {
        format!("${:.4}", price)
    } else if abs_price >= 0.01 {
        format!("${:.5}", price)
    } else {
        // Sub-penny: 8 decimals needed to see movement
        format!("${:.8}", price)
    }
}

/// Axis text for a fractional bar position: the open time of the nearest bar,
/// or nothing outside the series.
pub fn format_bar_time(timestamps_ms: &[i64], position: f64, intraday: bool) -> String {
    let rounded = position.round();
    if rounded < 0.0 || (position - rounded).abs() > 0.25 {
        return String::new();
    }
    match timestamps_ms.get(rounded as usize) {
        Some(&ts) if intraday => time_utils::epoch_ms_to_utc_intraday(ts),
        Some(&ts) => time_utils::epoch_ms_to_utc(ts),
        None => String::new(),
    }
}
