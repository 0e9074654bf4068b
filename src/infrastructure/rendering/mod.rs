pub mod canvas_renderer;
pub mod layout;
pub mod theme;

pub use canvas_renderer::{CanvasChartBackend, CanvasLineChart};
