//! Pure geometry for the line chart: bands, scales and point projection.
//! Nothing here touches the DOM, so it runs in native tests.

use std::collections::{HashMap, HashSet};

use super::theme::{
    self, AXIS_TITLE_HEIGHT, CHAR_WIDTH, LEGEND_GAP, LEGEND_HEIGHT, LEGEND_SPACING,
    LEGEND_SWATCH, MAX_Y_TICKS, PADDING, TICK_GAP, TICK_LABEL_HEIGHT, TITLE_HEIGHT,
};
use crate::domain::chart::{ChartConfig, ChartSpecification, Dataset};

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Ceiling on tick marks, whatever the step rounding produces.
const MAX_TICK_COUNT: usize = MAX_Y_TICKS * 4;

/// Linear value axis snapped to round tick steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueScale {
    /// Widens a flat range by one unit each way (or 5% of its magnitude when
    /// that is larger), then rounds outward to whole steps. A bound that
    /// would overflow keeps the raw data extent.
    pub fn from_range(min: f64, max: f64, max_ticks: usize) -> Self {
        let (mut min, mut max) = if min.is_finite() && max.is_finite() && min <= max {
            (min, max)
        } else {
            (0.0, 1.0)
        };
        if half_extent(min, max) <= f64::MIN_POSITIVE {
            let offset = 1.0f64.max(max.abs() * 0.05);
            min = (min - offset).max(f64::MIN);
            max = (max + offset).min(f64::MAX);
        }

        let intervals = (max_ticks.max(2) - 1) as f64;
        let raw_step = half_extent(min, max) / intervals * 2.0;
        let step = nice_number(if raw_step.is_finite() { raw_step } else { f64::MAX });
        let snapped_min = (min / step).floor() * step;
        let snapped_max = (max / step).ceil() * step;
        Self {
            min: if snapped_min.is_finite() { snapped_min } else { min },
            max: if snapped_max.is_finite() { snapped_max } else { max },
            step,
        }
    }

    /// Where `value` sits between `min` (0.0) and `max` (1.0).
    pub fn fraction(&self, value: f64) -> f64 {
        let fraction = (value / 2.0 - self.min / 2.0) / half_extent(self.min, self.max);
        if fraction.is_finite() { fraction } else { 0.5 }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let steps = (half_extent(self.min, self.max) / (self.step / 2.0) + 1e-6).floor();
        let count = if steps.is_finite() {
            (steps as usize).min(MAX_TICK_COUNT)
        } else {
            0
        };
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .take_while(|t| t.is_finite())
            .collect()
    }

    pub fn format_tick(&self, value: f64) -> String {
        let value = if value.abs() < self.step * 1e-9 { 0.0 } else { value };
        if value != 0.0 && (value.abs() >= 1e15 || self.step < 1e-6) {
            return format!("{:.2e}", value);
        }
        let decimals = if self.step >= 1.0 {
            0
        } else {
            (-self.step.log10().floor()).max(0.0) as usize
        };
        format!("{:.*}", decimals, value)
    }
}

/// Half the distance between two bounds; finite for any finite pair.
fn half_extent(min: f64, max: f64) -> f64 {
    max / 2.0 - min / 2.0
}

/// Round `value` to 1, 2, 5 or 10 times a power of ten.
fn nice_number(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let exponent = value.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let nice = match value / magnitude {
        f if f < 1.5 => 1.0,
        f if f < 3.0 => 2.0,
        f if f < 7.0 => 5.0,
        _ => 10.0,
    } * magnitude;
    if nice.is_finite() && nice > 0.0 { nice } else { value }
}

/// Min and max of every non-null `y` across visible datasets.
pub fn value_range(spec: &ChartSpecification) -> Option<(f64, f64)> {
    spec.visible_datasets()
        .flat_map(|(_, ds)| ds.data.iter().filter_map(|p| p.y()))
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}

/// X-axis categories: explicit labels, else distinct `x` values in the order
/// first seen, else positional indices.
pub fn categories(spec: &ChartSpecification) -> Vec<String> {
    if let Some(labels) = spec.labels.as_ref().filter(|l| !l.is_empty()) {
        return labels.iter().map(ToString::to_string).collect();
    }

    let mut seen = Vec::new();
    let mut known = HashSet::new();
    for point in spec.datasets.iter().flat_map(|ds| ds.data.iter()) {
        if let Some(x) = point.x() {
            let key = x.to_string();
            if known.insert(key.clone()) {
                seen.push(key);
            }
        }
    }
    if !seen.is_empty() {
        return seen;
    }

    let longest = spec.datasets.iter().map(|ds| ds.data.len()).max().unwrap_or(0);
    (0..longest).map(|i| i.to_string()).collect()
}

pub fn dataset_color(dataset: &Dataset, index: usize) -> String {
    dataset
        .border_color
        .clone()
        .unwrap_or_else(|| theme::series_color(index).to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
    pub hidden: bool,
    /// Left edge of the swatch.
    pub x: f64,
    /// Vertical centre of the legend row.
    pub y: f64,
}

fn legend_items(spec: &ChartSpecification, width: f64, center_y: f64) -> Vec<LegendItem> {
    let labels: Vec<String> = spec
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| ds.label_or_default(i))
        .collect();
    let item_width = |label: &str| LEGEND_SWATCH + LEGEND_GAP + label.chars().count() as f64 * CHAR_WIDTH;
    let total: f64 = labels.iter().map(|l| item_width(l.as_str())).sum::<f64>()
        + LEGEND_SPACING * labels.len().saturating_sub(1) as f64;

    let mut x = ((width - total) / 2.0).max(PADDING);
    spec.datasets
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (ds, label))| {
            let item = LegendItem {
                color: dataset_color(ds, i),
                hidden: ds.hidden,
                x,
                y: center_y,
                label,
            };
            x += item_width(item.label.as_str()) + LEGEND_SPACING;
            item
        })
        .collect()
}

/// Positions of every chart element for one canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub title_y: Option<f64>,
    pub legend: Vec<LegendItem>,
    pub plot: Rect,
    pub categories: Vec<String>,
    pub y_scale: ValueScale,
    pub show_x_title: bool,
    pub show_y_title: bool,
    category_index: HashMap<String, usize>,
}

impl ChartLayout {
    pub fn compute(width: f64, height: f64, config: &ChartConfig) -> Self {
        let options = &config.options;
        let spec = &config.data;
        let mut top = PADDING;

        let title_y = options.plugins.title.display.then(|| {
            let y = top + TITLE_HEIGHT / 2.0;
            top += TITLE_HEIGHT;
            y
        });

        let legend = if options.plugins.legend.display && !spec.datasets.is_empty() {
            let items = legend_items(spec, width, top + LEGEND_HEIGHT / 2.0);
            top += LEGEND_HEIGHT;
            items
        } else {
            Vec::new()
        };

        let (lo, hi) = value_range(spec).unwrap_or((0.0, 1.0));
        let y_scale = ValueScale::from_range(lo, hi, MAX_Y_TICKS);
        let label_chars = y_scale
            .ticks()
            .iter()
            .map(|t| y_scale.format_tick(*t).chars().count())
            .max()
            .unwrap_or(1);

        let show_x_title = options.scales.x.title.display;
        let show_y_title = options.scales.y.title.display;
        let y_title_band = if show_y_title { AXIS_TITLE_HEIGHT } else { 0.0 };
        let x_title_band = if show_x_title { AXIS_TITLE_HEIGHT } else { 0.0 };

        let left = PADDING + y_title_band + label_chars as f64 * CHAR_WIDTH + TICK_GAP;
        let bottom = height - PADDING - x_title_band - TICK_LABEL_HEIGHT;
        let plot = Rect {
            x: left,
            y: top,
            width: (width - PADDING - left).max(0.0),
            height: (bottom - top).max(0.0),
        };

        let categories = categories(spec);
        let category_index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Self {
            width,
            height,
            title_y,
            legend,
            plot,
            categories,
            y_scale,
            show_x_title,
            show_y_title,
            category_index,
        }
    }

    pub fn x_for_index(&self, index: usize) -> f64 {
        let n = self.categories.len();
        if n <= 1 {
            return self.plot.center().0;
        }
        self.plot.x + self.plot.width * index as f64 / (n - 1) as f64
    }

    pub fn y_for_value(&self, value: f64) -> f64 {
        self.plot.y + self.plot.height * (1.0 - self.y_scale.fraction(value))
    }

    /// Screen position for each sample; `None` where the line breaks.
    pub fn project(&self, dataset: &Dataset) -> Vec<Option<Point>> {
        dataset
            .data
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let index = match point.x() {
                    Some(x) => *self.category_index.get(&x.to_string())?,
                    None => i,
                };
                if index >= self.categories.len() {
                    return None;
                }
                let y = point.y()?;
                Some((self.x_for_index(index), self.y_for_value(y)))
            })
            .collect()
    }

    /// Show every n-th x label so neighbours don't overlap.
    pub fn x_label_stride(&self) -> usize {
        let n = self.categories.len();
        if n == 0 {
            return 1;
        }
        let widest = self
            .categories
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(1) as f64
            * CHAR_WIDTH
            + TICK_GAP;
        let fits = (self.plot.width / widest).floor().max(1.0) as usize;
        n.div_ceil(fits).max(1)
    }
}

/// Split a projected series into runs of consecutive points.
pub fn segments(points: &[Option<Point>]) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point {
            Some(p) => current.push(*p),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Bezier control points `(cp1, cp2)` for each edge of a run, one fewer
/// than the number of points. Zero tension yields straight edges.
pub fn curve_controls(run: &[Point], tension: f64) -> Vec<(Point, Point)> {
    let n = run.len();
    if n < 2 {
        return Vec::new();
    }

    let spline = |prev: Point, cur: Point, next: Point| -> (Point, Point) {
        let d01 = ((cur.0 - prev.0).powi(2) + (cur.1 - prev.1).powi(2)).sqrt();
        let d12 = ((next.0 - cur.0).powi(2) + (next.1 - cur.1).powi(2)).sqrt();
        let total = d01 + d12;
        let (s01, s12) = if total > 0.0 { (d01 / total, d12 / total) } else { (0.0, 0.0) };
        let (fa, fb) = (tension * s01, tension * s12);
        let (dx, dy) = (next.0 - prev.0, next.1 - prev.1);
        ((cur.0 - fa * dx, cur.1 - fa * dy), (cur.0 + fb * dx, cur.1 + fb * dy))
    };

    let handles: Vec<(Point, Point)> = (0..n)
        .map(|i| {
            let prev = run[i.saturating_sub(1)];
            let next = run[(i + 1).min(n - 1)];
            spline(prev, run[i], next)
        })
        .collect();

    (0..n - 1).map(|i| (handles[i].1, handles[i + 1].0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(raw: &str) -> ChartConfig {
        ChartConfig::line(ChartSpecification::decode(raw).unwrap())
    }

    #[test]
    fn nice_scale_for_balance_example() {
        let scale = ValueScale::from_range(100.0, 150.0, 6);
        assert_eq!(scale, ValueScale { min: 100.0, max: 150.0, step: 10.0 });
        assert_eq!(scale.ticks().len(), 6);
        assert_eq!(scale.format_tick(120.0), "120");
    }

    #[test]
    fn flat_series_is_widened() {
        let scale = ValueScale::from_range(5.0, 5.0, 6);
        assert!(scale.min <= 4.0 && scale.max >= 6.0);
        assert_eq!(scale.format_tick(4.5), "4.5");
    }

    #[test]
    fn extreme_magnitudes_keep_a_finite_scale() {
        for raw in [
            r#"{"datasets":[{"data":[0,1.7e308]}]}"#,
            r#"{"datasets":[{"data":[-1e308,1e308]}]}"#,
            r#"{"datasets":[{"data":[1.7976931348623157e308,1.7976931348623157e308]}]}"#,
            r#"{"datasets":[{"data":[1e-300,2e-300]}]}"#,
        ] {
            let cfg = config(raw);
            let layout = ChartLayout::compute(400.0, 200.0, &cfg);
            let ticks = layout.y_scale.ticks();
            assert!(!ticks.is_empty() && ticks.len() <= MAX_TICK_COUNT + 1, "{raw}");
            assert!(ticks.iter().all(|t| t.is_finite()), "{raw}");
            assert!(layout.plot.width > 0.0, "{raw}");

            let projected = layout.project(&cfg.data.datasets[0]);
            assert_eq!(projected.iter().flatten().count(), 2, "{raw}");
            for (_, y) in projected.into_iter().flatten() {
                assert!(y >= layout.plot.y - 1e-6 && y <= layout.plot.bottom() + 1e-6, "{raw}: {y}");
            }
        }
    }

    #[test]
    fn huge_ticks_use_exponent_labels() {
        let scale = ValueScale::from_range(0.0, 1.7e308, 6);
        assert!(scale.format_tick(5e307).contains('e'));
        assert_eq!(scale.format_tick(0.0), "0");
    }

    #[test]
    fn explicit_labels_win_over_x_values() {
        let cfg = config(r#"{"labels":["Mon","Tue"],"datasets":[{"data":[{"x":"Tue","y":1}]}]}"#);
        assert_eq!(categories(&cfg.data), vec!["Mon", "Tue"]);
        let layout = ChartLayout::compute(400.0, 200.0, &cfg);
        let projected = layout.project(&cfg.data.datasets[0]);
        assert_eq!(projected[0].map(|p| p.0), Some(layout.plot.right()));
    }

    #[test]
    fn derived_categories_keep_first_seen_order() {
        let cfg = config(
            r#"{"datasets":[
                {"data":[{"x":"2024-01-02","y":1},{"x":"2024-01-03","y":2}]},
                {"data":[{"x":"2024-01-01","y":3},{"x":"2024-01-02","y":4}]}
            ]}"#,
        );
        assert_eq!(categories(&cfg.data), vec!["2024-01-02", "2024-01-03", "2024-01-01"]);
    }

    #[test]
    fn positional_data_uses_indices() {
        let cfg = config(r#"{"datasets":[{"data":[1,2,3]},{"data":[4]}]}"#);
        assert_eq!(categories(&cfg.data), vec!["0", "1", "2"]);
    }

    #[test]
    fn nulls_break_the_line() {
        let cfg = config(r#"{"datasets":[{"data":[1,null,3,4]}]}"#);
        let layout = ChartLayout::compute(600.0, 300.0, &cfg);
        let projected = layout.project(&cfg.data.datasets[0]);
        assert!(projected[1].is_none());
        let runs = segments(&projected);
        assert_eq!(runs.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn projected_points_stay_inside_plot() {
        let cfg = config(r#"{"datasets":[{"data":[-20,0,35.5,12]}]}"#);
        let layout = ChartLayout::compute(640.0, 320.0, &cfg);
        for (x, y) in layout.project(&cfg.data.datasets[0]).into_iter().flatten() {
            assert!(x >= layout.plot.x - 1e-9 && x <= layout.plot.right() + 1e-9);
            assert!(y >= layout.plot.y - 1e-9 && y <= layout.plot.bottom() + 1e-9);
        }
    }

    #[test]
    fn empty_chart_still_has_bands() {
        let cfg = config(r#"{"datasets":[]}"#);
        let layout = ChartLayout::compute(400.0, 200.0, &cfg);
        assert!(layout.title_y.is_some());
        assert!(layout.legend.is_empty());
        assert!(layout.categories.is_empty());
        assert_eq!(layout.y_scale.min, 0.0);
        assert!(layout.plot.width > 0.0 && layout.plot.height > 0.0);
        assert_eq!(layout.x_label_stride(), 1);
    }

    #[test]
    fn legend_lists_every_dataset_with_colors() {
        let cfg = config(
            r#"{"datasets":[{"label":"Credits","borderColor":"green"},{"label":"Debits","hidden":true}]}"#,
        );
        let layout = ChartLayout::compute(500.0, 250.0, &cfg);
        assert_eq!(layout.legend.len(), 2);
        assert_eq!(layout.legend[0].color, "green");
        assert_eq!(layout.legend[1].color, theme::series_color(1));
        assert!(layout.legend[1].hidden);
        assert!(layout.legend[0].x < layout.legend[1].x);
    }

    #[test]
    fn dense_labels_are_thinned() {
        let data: Vec<String> = (0..200).map(|i| i.to_string()).collect();
        let raw = format!(r#"{{"datasets":[{{"data":[{}]}}]}}"#, data.join(","));
        let cfg = config(&raw);
        let layout = ChartLayout::compute(300.0, 150.0, &cfg);
        assert!(layout.x_label_stride() > 1);
    }

    #[test]
    fn zero_tension_controls_sit_on_endpoints() {
        let run = [(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)];
        let controls = curve_controls(&run, 0.0);
        assert_eq!(controls, vec![((0.0, 0.0), (10.0, 5.0)), ((10.0, 5.0), (20.0, 0.0))]);
        assert!(curve_controls(&run[..1], 0.4).is_empty());
    }
}
