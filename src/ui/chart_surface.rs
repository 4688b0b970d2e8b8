use eframe::egui::Color32;

use crate::domain::Direction;
use crate::error::ChartError;
use crate::models::BarSeries;

/// Stroke for a line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
    pub dashed: bool,
}

impl LineStyle {
    pub fn solid(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

/// Which overlay a shape belongs to. Also its legend entry, so each category
/// can be hidden from the plot legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    PreviousDayHigh,
    PreviousDayLow,
    OrderBlock(Direction),
    BreakOfStructure(Direction),
}

impl OverlayKind {
    pub fn legend_name(&self) -> &'static str {
        match self {
            OverlayKind::PreviousDayHigh => "PDH",
            OverlayKind::PreviousDayLow => "PDL",
            OverlayKind::OrderBlock(Direction::Bullish) => "Bullish Order Block",
            OverlayKind::OrderBlock(Direction::Bearish) => "Bearish Order Block",
            OverlayKind::BreakOfStructure(Direction::Bullish) => "Bullish BOS",
            OverlayKind::BreakOfStructure(Direction::Bearish) => "Bearish BOS",
        }
    }
}

/// Drawing primitives the overlay renderer needs. x is the bar index, y is price.
pub trait ChartSurface {
    fn add_candlesticks(&mut self, series: &BarSeries);
    fn add_line_segment(
        &mut self,
        kind: OverlayKind,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        style: &LineStyle,
    );
    fn add_rectangle(&mut self, kind: OverlayKind, x0: f64, y0: f64, x1: f64, y1: f64, fill: Color32);
    fn add_label(&mut self, kind: OverlayKind, x: f64, y: f64, text: &str, color: Color32);
    fn set_title(&mut self, title: &str);
    /// Present the chart. Blocks until the user closes it for interactive surfaces.
    fn show(&mut self) -> Result<(), ChartError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Segment {
        kind: OverlayKind,
        from: [f64; 2],
        to: [f64; 2],
        style: LineStyle,
    },
    /// Corners normalised so `min <= max` on both axes.
    Rectangle {
        kind: OverlayKind,
        min: [f64; 2],
        max: [f64; 2],
        fill: Color32,
    },
    Label {
        kind: OverlayKind,
        at: [f64; 2],
        text: String,
        color: Color32,
    },
}

impl Shape {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Shape::Segment { kind, .. } | Shape::Rectangle { kind, .. } | Shape::Label { kind, .. } => {
                *kind
            }
        }
    }
}

/// In-memory surface: records everything drawn, in order. The egui chart
/// replays a scene every frame; tests inspect it directly.
#[derive(Debug, Clone, Default)]
pub struct ChartScene {
    pub title: String,
    pub candles: Option<BarSeries>,
    pub shapes: Vec<Shape>,
}

impl ChartScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes_of(&self, kind: OverlayKind) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |shape| shape.kind() == kind)
    }

    pub fn count(&self, kind: OverlayKind) -> usize {
        self.shapes_of(kind).count()
    }
}

impl ChartSurface for ChartScene {
    fn add_candlesticks(&mut self, series: &BarSeries) {
        self.candles = Some(series.clone());
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
        self.shapes.push(Shape::Segment {
            kind,
            from: [x0, y0],
            to: [x1, y1],
            style: *style,
        });
    }

    fn add_rectangle(&mut self, kind: OverlayKind, x0: f64, y0: f64, x1: f64, y1: f64, fill: Color32) {
        self.shapes.push(Shape::Rectangle {
            kind,
            min: [x0.min(x1), y0.min(y1)],
            max: [x0.max(x1), y0.max(y1)],
            fill,
        });
    }

    fn add_label(&mut self, kind: OverlayKind, x: f64, y: f64, text: &str, color: Color32) {
        self.shapes.push(Shape::Label {
            kind,
            at: [x, y],
            text: text.to_string(),
            color,
        });
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn show(&mut self) -> Result<(), ChartError> {
        Ok(())
    }
}
