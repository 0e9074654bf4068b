use serde::Serialize;

use super::specification::ChartSpecification;
use super::value_objects::{ChartOptions, ChartType};
use crate::domain::errors::{ChartError, ChartResult};

/// Everything a backend needs to build one chart: type, data and options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartSpecification,
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Line chart with the fixed credits/debits options; `data` is passed through.
    pub fn line(data: ChartSpecification) -> Self {
        Self {
            chart_type: ChartType::Line,
            data,
            options: ChartOptions::default(),
        }
    }

    /// The config in the charting library's JSON shape.
    pub fn to_json(&self) -> ChartResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ChartError::Rendering(e.to_string()))
    }
}
