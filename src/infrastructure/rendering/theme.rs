//! Look of the canvas line chart.

/// Default series colours, cycled by dataset index.
pub const PALETTE: [&str; 7] = [
    "rgb(54, 162, 235)",
    "rgb(255, 99, 132)",
    "rgb(255, 159, 64)",
    "rgb(255, 205, 86)",
    "rgb(75, 192, 192)",
    "rgb(153, 102, 255)",
    "rgb(201, 203, 207)",
];

pub const BACKGROUND: &str = "#ffffff";
pub const TEXT_COLOR: &str = "#666666";
pub const GRID_COLOR: &str = "rgba(0, 0, 0, 0.1)";
pub const AXIS_COLOR: &str = "rgba(0, 0, 0, 0.25)";

pub const TITLE_FONT: &str = "bold 16px sans-serif";
pub const LABEL_FONT: &str = "12px sans-serif";

pub const PADDING: f64 = 10.0;
pub const TITLE_HEIGHT: f64 = 28.0;
pub const LEGEND_HEIGHT: f64 = 24.0;
pub const LEGEND_SWATCH: f64 = 12.0;
pub const LEGEND_GAP: f64 = 6.0;
pub const LEGEND_SPACING: f64 = 16.0;
pub const TICK_LABEL_HEIGHT: f64 = 20.0;
pub const AXIS_TITLE_HEIGHT: f64 = 20.0;
pub const TICK_GAP: f64 = 8.0;
/// Rough glyph advance for 12px sans-serif, used before a context exists.
pub const CHAR_WIDTH: f64 = 7.0;

pub const MAX_Y_TICKS: usize = 6;
pub const LINE_WIDTH: f64 = 3.0;
pub const POINT_RADIUS: f64 = 3.0;
pub const FILL_ALPHA: f64 = 0.25;

/// Width / height used for responsive sizing of line charts.
pub const ASPECT_RATIO: f64 = 2.0;

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
