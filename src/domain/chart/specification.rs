use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::errors::{ChartError, ChartResult};

/// Series data handed over by the host, decoded only as far as its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecification {
    pub datasets: Vec<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<AxisValue>>,
}

impl ChartSpecification {
    /// Decode the JSON carried by the host element.
    pub fn decode(raw: &str) -> ChartResult<Self> {
        if raw.trim().is_empty() {
            return Err(ChartError::Decode("empty chart specification".to_string()));
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn point_count(&self) -> usize {
        self.datasets.iter().map(|d| d.data.len()).sum()
    }

    pub fn visible_datasets(&self) -> impl Iterator<Item = (usize, &Dataset)> {
        self.datasets.iter().enumerate().filter(|(_, d)| !d.hidden)
    }
}

/// One series plus its styling. Unknown keys ride along untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    pub fn label_or_default(&self, index: usize) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Dataset {}", index + 1))
    }

    /// Area fill is on for `true` or any non-`false` string target.
    pub fn is_filled(&self) -> bool {
        match &self.fill {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s != "false",
            _ => false,
        }
    }
}

/// A single sample: `{x, y}`, a bare positional value, or whatever else the
/// host sent, kept verbatim. `null` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    Xy {
        x: AxisValue,
        #[serde(default)]
        y: Option<Amount>,
    },
    Value(Option<Amount>),
    Raw(Value),
}

impl DataPoint {
    pub fn x(&self) -> Option<&AxisValue> {
        match self {
            DataPoint::Xy { x, .. } => Some(x),
            DataPoint::Value(_) | DataPoint::Raw(_) => None,
        }
    }

    /// Drawable `y`; `None` breaks the line.
    pub fn y(&self) -> Option<f64> {
        match self {
            DataPoint::Xy { y, .. } | DataPoint::Value(y) => y.as_ref().and_then(Amount::value),
            DataPoint::Raw(raw) => raw.get("y").and_then(numeric),
        }
    }
}

/// A `y` as sent: a JSON number or a numeric string such as a serialized
/// decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Finite value, if the amount parses as one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => Amount::Text(s.clone()).value(),
        _ => None,
    }
}

/// Category label or x value; dates arrive as plain strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
    /// Multi-line labels, `null` and any other JSON, re-encoded unchanged.
    Other(Value),
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            AxisValue::Number(n) => write!(f, "{}", n),
            AxisValue::Text(s) => f.write_str(s),
            AxisValue::Other(Value::Null) => Ok(()),
            AxisValue::Other(Value::Array(lines)) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match line {
                        Value::String(s) => f.write_str(s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
            AxisValue::Other(other) => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_xy_points() {
        let spec = ChartSpecification::decode(
            r#"{"datasets":[{"label":"Balance","data":[{"x":"2024-01-01","y":100},{"x":"2024-01-02","y":150}]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.datasets.len(), 1);
        assert_eq!(spec.datasets[0].label.as_deref(), Some("Balance"));
        assert_eq!(spec.point_count(), 2);
        assert_eq!(
            spec.datasets[0].data[1],
            DataPoint::Xy {
                x: AxisValue::Text("2024-01-02".to_string()),
                y: Some(Amount::Number(150.0))
            }
        );
        assert!(spec.labels.is_none());
    }

    #[test]
    fn decodes_positional_values_with_gaps() {
        let spec = ChartSpecification::decode(
            r#"{"labels":["Jan",2],"datasets":[{"data":[1.5,null,3]}]}"#,
        )
        .unwrap();
        let ys: Vec<_> = spec.datasets[0].data.iter().map(DataPoint::y).collect();
        assert_eq!(ys, vec![Some(1.5), None, Some(3.0)]);
        let labels: Vec<_> = spec
            .labels
            .unwrap()
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(labels, vec!["Jan", "2"]);
    }

    #[test]
    fn styling_and_unknown_keys_are_kept() {
        let spec = ChartSpecification::decode(
            r##"{"datasets":[{"label":"Debits","data":[],"borderColor":"#ff6384","fill":true,"stepped":true}]}"##,
        )
        .unwrap();
        let ds = &spec.datasets[0];
        assert_eq!(ds.border_color.as_deref(), Some("#ff6384"));
        assert!(ds.is_filled());
        assert_eq!(ds.extra.get("stepped"), Some(&Value::Bool(true)));
    }

    #[test]
    fn numeric_strings_and_odd_labels_decode() {
        let spec = ChartSpecification::decode(
            r#"{"labels":[["Jan","2024"],null,"Mar"],"datasets":[{"label":"Credits","data":[
                {"x":"2024-01-01","y":"100.50"},"42",{"y":7},true,{"x":"2024-01-03","y":"n/a"}
            ]}]}"#,
        )
        .unwrap();

        let data = &spec.datasets[0].data;
        assert_eq!(
            data[0],
            DataPoint::Xy {
                x: AxisValue::Text("2024-01-01".to_string()),
                y: Some(Amount::Text("100.50".to_string()))
            }
        );
        let ys: Vec<_> = data.iter().map(DataPoint::y).collect();
        assert_eq!(ys, vec![Some(100.5), Some(42.0), Some(7.0), None, None]);

        let labels: Vec<_> = spec
            .labels
            .as_ref()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["Jan 2024", "", "Mar"]);
    }

    #[test]
    fn re_encoding_keeps_host_values() {
        let raw = r#"{"labels":[["Jan","2024"],null],"datasets":[{"data":[{"x":"a","y":"100.50"},true]}]}"#;
        let spec = ChartSpecification::decode(raw).unwrap();
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["labels"], serde_json::json!([["Jan", "2024"], null]));
        assert_eq!(value["datasets"][0]["data"][0]["y"], "100.50");
        assert_eq!(value["datasets"][0]["data"][1], true);
    }

    #[test]
    fn rejects_malformed_and_misshapen_input() {
        for raw in ["", "   ", "{", "not json", "[]", r#"{"labels":[]}"#, r#"{"datasets":{}}"#] {
            assert!(
                matches!(ChartSpecification::decode(raw), Err(ChartError::Decode(_))),
                "{raw:?} should not decode"
            );
        }
    }

    #[test]
    fn hidden_datasets_are_skipped() {
        let spec = ChartSpecification::decode(
            r#"{"datasets":[{"label":"a","hidden":true},{"label":"b"}]}"#,
        )
        .unwrap();
        let visible: Vec<_> = spec.visible_datasets().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![1]);
        assert_eq!(spec.datasets[0].label_or_default(0), "a");
        assert_eq!(Dataset::default().label_or_default(2), "Dataset 3");
    }
}
