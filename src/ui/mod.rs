// Chart surfaces and overlay drawing
pub mod chart_surface;
pub mod egui_chart;
pub mod overlay_renderer;
pub mod plot_layers;
pub mod utils;

// Re-export commonly used types
pub use chart_surface::{ChartScene, ChartSurface, LineStyle, OverlayKind, Shape};
pub use egui_chart::EguiChart;
pub use overlay_renderer::{RenderSummary, render_chart, render_overlays};
