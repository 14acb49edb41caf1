use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// Raw dataset as it arrives in a request: series name -> ordered values.
///
/// Insertion order is significant — under the generic convention the first
/// key is the x-axis domain — so this is an [`IndexMap`], not a `HashMap`.
pub type Dataset = IndexMap<String, Vec<serde_json::Value>>;

/// The closed set of supported curve families.
///
/// Adding a family means adding one variant here and one strategy arm in
/// [`crate::curves::model`]; nothing else branches on the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFamily {
    Line,
    Bar,
    Pie,
    Area,
    StackedArea,
    Streamgraph,
    Step,
    Spline,
    Bezier,
    Lowess,
    MovingAverage,
    Polynomial,
    Exponential,
    Sigmoid,
    Gompertz,
}

impl CurveFamily {
    /// Every supported family, in request-vocabulary order.
    pub const ALL: [CurveFamily; 15] = [
        CurveFamily::Line,
        CurveFamily::Bar,
        CurveFamily::Pie,
        CurveFamily::Area,
        CurveFamily::Spline,
        CurveFamily::Bezier,
        CurveFamily::Lowess,
        CurveFamily::MovingAverage,
        CurveFamily::Polynomial,
        CurveFamily::Exponential,
        CurveFamily::Sigmoid,
        CurveFamily::Gompertz,
        CurveFamily::StackedArea,
        CurveFamily::Streamgraph,
        CurveFamily::Step,
    ];

    /// The wire name, as accepted in `curve_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveFamily::Line => "line",
            CurveFamily::Bar => "bar",
            CurveFamily::Pie => "pie",
            CurveFamily::Area => "area",
            CurveFamily::StackedArea => "stacked_area",
            CurveFamily::Streamgraph => "streamgraph",
            CurveFamily::Step => "step",
            CurveFamily::Spline => "spline",
            CurveFamily::Bezier => "bezier",
            CurveFamily::Lowess => "lowess",
            CurveFamily::MovingAverage => "moving_average",
            CurveFamily::Polynomial => "polynomial",
            CurveFamily::Exponential => "exponential",
            CurveFamily::Sigmoid => "sigmoid",
            CurveFamily::Gompertz => "gompertz",
        }
    }

    /// Families whose y ticks get thousands separators (count-like data).
    pub fn count_like(&self) -> bool {
        matches!(
            self,
            CurveFamily::Line | CurveFamily::Bar | CurveFamily::Area
        )
    }
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveFamily {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveFamily::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ChartError::UnsupportedFamily(s.to_string()))
    }
}

/// A declarative chart request, one per render.
///
/// Field defaults match the wire contract: omitted fields deserialize to
/// `"Generated Chart"`, empty axis labels, the `neon` style pair, and both
/// axes shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub curve_type: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub x_axis_label: String,
    #[serde(default)]
    pub y_axis_label: String,
    #[serde(default)]
    pub data: Dataset,
    #[serde(default = "default_style_id")]
    pub color_scheme: String,
    #[serde(default = "default_style_id")]
    pub grid_style: String,
    #[serde(default = "default_true")]
    pub show_x_axis: bool,
    #[serde(default = "default_true")]
    pub show_y_axis: bool,
}

fn default_title() -> String {
    "Generated Chart".to_string()
}

fn default_style_id() -> String {
    "neon".to_string()
}

fn default_true() -> bool {
    true
}

impl ChartRequest {
    /// Parse `curve_type` into the closed family set.
    pub fn family(&self) -> Result<CurveFamily, ChartError> {
        self.curve_type.parse()
    }
}

/// Response body for the chart-generation contract. Either a complete image
/// or an error — never a partial payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartResponse {
    pub fn ok(chart_url: String, chart_data: serde_json::Value) -> Self {
        Self {
            success: true,
            chart_url: Some(chart_url),
            chart_data: Some(chart_data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            chart_url: None,
            chart_data: None,
            error: Some(message.into()),
        }
    }
}

/// Response body for the health-check contract. Always succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_round_trips_wire_names() {
        for f in CurveFamily::ALL {
            assert_eq!(f.as_str().parse::<CurveFamily>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_family_is_rejected() {
        let err = "radar".parse::<CurveFamily>().unwrap_err();
        assert!(err.to_string().contains("radar"));
    }

    #[test]
    fn request_defaults_apply() {
        let req: ChartRequest = serde_json::from_str(r#"{"curve_type": "line"}"#).unwrap();
        assert_eq!(req.title, "Generated Chart");
        assert_eq!(req.color_scheme, "neon");
        assert_eq!(req.grid_style, "neon");
        assert!(req.show_x_axis);
        assert!(req.show_y_axis);
        assert!(req.data.is_empty());
    }

    #[test]
    fn dataset_preserves_insertion_order() {
        let req: ChartRequest = serde_json::from_str(
            r#"{"curve_type": "line", "data": {"x": [1], "b": [2], "a": [3]}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = req.data.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "b", "a"]);
    }
}
