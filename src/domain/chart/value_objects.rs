use derive_more::Display;
use serde::Serialize;
use strum::{AsRefStr, EnumIter, EnumString};

pub const CHART_TITLE: &str = "Credits & Debits Over Time";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Amount";

/// Value Object - Chart type. Only line charts are drawn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, AsRefStr, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    Line,
}

/// Value Object - display options, fixed regardless of input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub plugins: PluginOptions,
    pub scales: ScaleOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    pub legend: LegendOptions,
    pub title: TitleOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendOptions {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleOptions {
    pub display: bool,
    pub text: String,
}

impl TitleOptions {
    fn shown(text: &str) -> Self {
        Self { display: true, text: text.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleOptions {
    pub x: AxisOptions,
    pub y: AxisOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOptions {
    pub title: TitleOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            plugins: PluginOptions {
                legend: LegendOptions { display: true },
                title: TitleOptions::shown(CHART_TITLE),
            },
            scales: ScaleOptions {
                x: AxisOptions { title: TitleOptions::shown(X_AXIS_TITLE) },
                y: AxisOptions { title: TitleOptions::shown(Y_AXIS_TITLE) },
            },
        }
    }
}
