use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::layout::{self, ChartLayout, curve_controls, segments};
use super::theme::{
    ASPECT_RATIO, AXIS_COLOR, AXIS_TITLE_HEIGHT, BACKGROUND, FILL_ALPHA, GRID_COLOR, LABEL_FONT,
    LEGEND_GAP, LEGEND_SWATCH, LINE_WIDTH, PADDING, POINT_RADIUS, TEXT_COLOR, TICK_GAP,
    TICK_LABEL_HEIGHT, TITLE_FONT,
};
use crate::application::{ChartBackend, ChartInstance};
use crate::domain::{
    chart::{ChartConfig, Dataset},
    errors::{ChartError, ChartResult},
    logging::LogComponent,
};
use crate::event_utils::{EventOptions, WindowEventListenerHandle, window_event_listener_with_options};
use crate::{log_debug, log_warn};

/// Canvas 2D implementation of the charting library seam.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasChartBackend;

impl CanvasChartBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ChartBackend for CanvasChartBackend {
    type Canvas = HtmlCanvasElement;
    type Instance = CanvasLineChart;

    fn construct(&mut self, canvas: HtmlCanvasElement, config: ChartConfig) -> ChartResult<CanvasLineChart> {
        CanvasLineChart::new(canvas, config)
    }
}

/// Canvas plus the config it paints.
struct ChartSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    config: ChartConfig,
}

/// A line chart painted on one canvas. Redraws itself on window resize when
/// the options ask for responsive sizing.
pub struct CanvasLineChart {
    surface: Rc<ChartSurface>,
    resize_listener: Option<WindowEventListenerHandle>,
}

impl CanvasLineChart {
    pub fn new(canvas: HtmlCanvasElement, config: ChartConfig) -> ChartResult<Self> {
        let context = context_2d(&canvas)?;
        let surface = Rc::new(ChartSurface { canvas, context, config });

        surface.fit_to_container();
        surface
            .draw()
            .map_err(|e| ChartError::Rendering(format!("{:?}", e)))?;

        let resize_listener = surface.config.options.responsive.then(|| {
            let surface = Rc::clone(&surface);
            window_event_listener_with_options(leptos::ev::resize, &EventOptions::default(), move |_| {
                surface.fit_to_container();
                if let Err(e) = surface.draw() {
                    log_warn!(LogComponent::Infrastructure("CanvasLineChart"), "redraw after resize failed: {:?}", e);
                }
            })
        });

        Ok(Self { surface, resize_listener })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.surface.canvas
    }

    pub fn is_listening_for_resize(&self) -> bool {
        self.resize_listener.is_some()
    }
}

impl ChartInstance for CanvasLineChart {
    fn config(&self) -> &ChartConfig {
        &self.surface.config
    }

    fn destroy(mut self) {
        if let Some(listener) = self.resize_listener.take() {
            listener.remove();
        }
        self.surface.clear();
        log_debug!(LogComponent::Infrastructure("CanvasLineChart"), "chart destroyed");
    }
}

impl Drop for CanvasLineChart {
    fn drop(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            listener.remove();
        }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> ChartResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|_| ChartError::Rendering("Failed to get 2D context".to_string()))?
        .ok_or_else(|| ChartError::Rendering("Canvas has no 2D context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ChartError::Rendering("Failed to cast to 2D context".to_string()))
}

impl ChartSurface {
    /// Match the parent's width and keep the line-chart aspect ratio.
    fn fit_to_container(&self) {
        if !self.config.options.responsive {
            return;
        }
        let Some(parent) = self.canvas.parent_element() else {
            return;
        };
        let width = parent.client_width();
        if width <= 0 {
            return;
        }
        let height = (width as f64 / ASPECT_RATIO).round() as u32;
        if self.canvas.width() != width as u32 || self.canvas.height() != height {
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height);
        }
    }

    fn clear(&self) {
        self.context
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn draw(&self) -> Result<(), JsValue> {
        let started = now_ms();
        let ctx = &self.context;
        let layout = ChartLayout::compute(
            self.canvas.width() as f64,
            self.canvas.height() as f64,
            &self.config,
        );

        self.clear();
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, layout.width, layout.height);

        self.draw_title(&layout)?;
        self.draw_legend(&layout)?;
        self.draw_y_axis(&layout)?;
        self.draw_x_axis(&layout)?;
        for (index, dataset) in self.config.data.visible_datasets() {
            self.draw_series(&layout, dataset, index);
        }

        log_debug!(
            LogComponent::Infrastructure("CanvasLineChart"),
            "drew {} datasets on {}x{} in {:.1}ms",
            self.config.data.datasets.len(),
            layout.width,
            layout.height,
            now_ms() - started
        );
        Ok(())
    }

    fn draw_title(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let Some(y) = layout.title_y else {
            return Ok(());
        };
        let ctx = &self.context;
        ctx.set_font(TITLE_FONT);
        ctx.set_fill_style_str(TEXT_COLOR);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(&self.config.options.plugins.title.text, layout.width / 2.0, y)
    }

    fn draw_legend(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("left");
        ctx.set_text_baseline("middle");

        for item in &layout.legend {
            ctx.set_fill_style_str(&item.color);
            ctx.fill_rect(item.x, item.y - LEGEND_SWATCH / 2.0, LEGEND_SWATCH, LEGEND_SWATCH);

            let text_x = item.x + LEGEND_SWATCH + LEGEND_GAP;
            ctx.set_fill_style_str(TEXT_COLOR);
            ctx.fill_text(&item.label, text_x, item.y)?;

            if item.hidden {
                let text_width = ctx.measure_text(&item.label)?.width();
                ctx.set_stroke_style_str(TEXT_COLOR);
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(text_x, item.y);
                ctx.line_to(text_x + text_width, item.y);
                ctx.stroke();
            }
        }
        Ok(())
    }

    fn draw_y_axis(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let ctx = &self.context;
        let plot = layout.plot;

        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("right");
        ctx.set_text_baseline("middle");
        ctx.set_line_width(1.0);

        for tick in layout.y_scale.ticks() {
            let y = layout.y_for_value(tick);
            ctx.set_stroke_style_str(GRID_COLOR);
            ctx.begin_path();
            ctx.move_to(plot.x, y);
            ctx.line_to(plot.right(), y);
            ctx.stroke();

            ctx.set_fill_style_str(TEXT_COLOR);
            ctx.fill_text(&layout.y_scale.format_tick(tick), plot.x - TICK_GAP, y)?;
        }

        ctx.set_stroke_style_str(AXIS_COLOR);
        ctx.begin_path();
        ctx.move_to(plot.x, plot.y);
        ctx.line_to(plot.x, plot.bottom());
        ctx.stroke();

        if layout.show_y_title {
            ctx.save();
            ctx.translate(PADDING + AXIS_TITLE_HEIGHT / 2.0, plot.center().1)?;
            ctx.rotate(-PI / 2.0)?;
            ctx.set_text_align("center");
            ctx.set_fill_style_str(TEXT_COLOR);
            ctx.fill_text(&self.config.options.scales.y.title.text, 0.0, 0.0)?;
            ctx.restore();
        }
        Ok(())
    }

    fn draw_x_axis(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let ctx = &self.context;
        let plot = layout.plot;

        ctx.set_stroke_style_str(AXIS_COLOR);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(plot.x, plot.bottom());
        ctx.line_to(plot.right(), plot.bottom());
        ctx.stroke();

        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str(TEXT_COLOR);

        let label_y = plot.bottom() + TICK_LABEL_HEIGHT / 2.0;
        for (index, label) in layout
            .categories
            .iter()
            .enumerate()
            .step_by(layout.x_label_stride())
        {
            ctx.fill_text(label, layout.x_for_index(index), label_y)?;
        }

        if layout.show_x_title {
            let title_y = layout.height - PADDING - AXIS_TITLE_HEIGHT / 2.0;
            ctx.fill_text(&self.config.options.scales.x.title.text, plot.center().0, title_y)?;
        }
        Ok(())
    }

    fn draw_series(&self, layout: &ChartLayout, dataset: &Dataset, index: usize) {
        let ctx = &self.context;
        let color = layout::dataset_color(dataset, index);
        let tension = dataset.tension.unwrap_or(0.0);
        let runs = segments(&layout.project(dataset));

        if dataset.is_filled() {
            let fill = dataset.background_color.as_deref().unwrap_or(&color);
            ctx.save();
            if dataset.background_color.is_none() {
                ctx.set_global_alpha(FILL_ALPHA);
            }
            ctx.set_fill_style_str(fill);
            for run in &runs {
                self.trace_run(run, tension);
                if let (Some(first), Some(last)) = (run.first(), run.last()) {
                    ctx.line_to(last.0, layout.plot.bottom());
                    ctx.line_to(first.0, layout.plot.bottom());
                }
                ctx.close_path();
                ctx.fill();
            }
            ctx.restore();
        }

        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(dataset.border_width.unwrap_or(LINE_WIDTH));
        for run in &runs {
            self.trace_run(run, tension);
            ctx.stroke();
        }

        let radius = dataset.point_radius.unwrap_or(POINT_RADIUS);
        if radius > 0.0 {
            ctx.set_fill_style_str(&color);
            for &(x, y) in runs.iter().flatten() {
                ctx.begin_path();
                if ctx.arc(x, y, radius, 0.0, 2.0 * PI).is_ok() {
                    ctx.fill();
                }
            }
        }
    }

    /// Begin a path along one run, curved when `tension > 0`.
    fn trace_run(&self, run: &[layout::Point], tension: f64) {
        let ctx = &self.context;
        ctx.begin_path();
        let Some(&(x0, y0)) = run.first() else {
            return;
        };
        ctx.move_to(x0, y0);
        if tension > 0.0 {
            for (&(x, y), (cp1, cp2)) in run[1..].iter().zip(curve_controls(run, tension)) {
                ctx.bezier_curve_to(cp1.0, cp1.1, cp2.0, cp2.1, x, y);
            }
        } else {
            for &(x, y) in &run[1..] {
                ctx.line_to(x, y);
            }
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
