//! Dataset normalization: turn the loosely-typed request dataset into one
//! consistent x/series representation.
//!
//! Interpretation is a single tagged parse, not per-family membership
//! checks. Named conventions are recognized first, in a fixed priority
//! order; the generic convention (first key = domain, remaining keys =
//! series) is the universal fallback.

use serde_json::Value;

use crate::error::ChartError;
use crate::models::Dataset;

/// Which dataset convention matched, tagged at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    /// `years` + `sales` [+ `profit`] — sales/profit line shape.
    YearsSales { profit: bool },
    /// `categories` + `revenue` [+ `costs`] — revenue/costs bar shape.
    CategoriesRevenue { costs: bool },
    /// `labels` + `values` — pie shape.
    LabelsValues,
    /// `months` + `users` [+ `premium`] — users/premium area shape.
    MonthsUsers { premium: bool },
    /// First inserted key is the domain, every other key one series.
    Generic,
    /// No keys at all: nothing to draw (not an error).
    Empty,
}

/// The x-axis domain: either truly numeric, or ordered category labels
/// plotted at their integer positions.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Domain {
    pub fn len(&self) -> usize {
        match self {
            Domain::Numeric(v) => v.len(),
            Domain::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric projection used for plotting and for every numeric
    /// algorithm: the values themselves, or positions `0..n` for
    /// categorical domains.
    pub fn positions(&self) -> Vec<f64> {
        match self {
            Domain::Numeric(v) => v.clone(),
            Domain::Categorical(v) => (0..v.len()).map(|i| i as f64).collect(),
        }
    }

    /// Tick table for categorical domains: (position, label) pairs.
    /// Numeric domains use the renderer's default tick labeling.
    pub fn tick_table(&self) -> Option<Vec<(f64, String)>> {
        match self {
            Domain::Numeric(_) => None,
            Domain::Categorical(v) => Some(
                v.iter()
                    .enumerate()
                    .map(|(i, s)| (i as f64, s.clone()))
                    .collect(),
            ),
        }
    }
}

/// Uniform ordered-series representation; the only input curve strategies
/// consume. Every series has the same length as the domain.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    pub shape: DatasetShape,
    pub domain: Domain,
    /// (name, values) in dataset insertion order (domain key excluded).
    pub series: Vec<(String, Vec<f64>)>,
}

impl NormalizedSeries {
    /// The first series, for families that smooth or fit a single curve.
    pub fn primary(&self) -> Option<&(String, Vec<f64>)> {
        self.series.first()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty() || self.series.is_empty()
    }
}

/// Normalize a request dataset.
///
/// An empty dataset yields an empty domain and no series — downstream
/// strategies treat that as "nothing to draw". Mismatched series lengths
/// and non-numeric series values are caller errors.
pub fn normalize(data: &Dataset) -> Result<NormalizedSeries, ChartError> {
    if data.is_empty() {
        return Ok(NormalizedSeries {
            shape: DatasetShape::Empty,
            domain: Domain::Numeric(Vec::new()),
            series: Vec::new(),
        });
    }

    let shape = detect_shape(data);
    let (domain_key, series_keys): (&str, Vec<&str>) = match shape {
        DatasetShape::YearsSales { profit } => {
            let mut keys = vec!["sales"];
            if profit {
                keys.push("profit");
            }
            ("years", keys)
        }
        DatasetShape::CategoriesRevenue { costs } => {
            let mut keys = vec!["revenue"];
            if costs {
                keys.push("costs");
            }
            ("categories", keys)
        }
        DatasetShape::LabelsValues => ("labels", vec!["values"]),
        DatasetShape::MonthsUsers { premium } => {
            let mut keys = vec!["users"];
            if premium {
                keys.push("premium");
            }
            ("months", keys)
        }
        DatasetShape::Generic => {
            let mut it = data.keys();
            let first = it.next().map(|k| k.as_str()).unwrap_or_default();
            (first, it.map(|k| k.as_str()).collect())
        }
        DatasetShape::Empty => unreachable!("empty handled above"),
    };

    let domain = parse_domain(&data[domain_key]);
    let mut series = Vec::with_capacity(series_keys.len());
    for key in series_keys {
        let values = parse_numeric_series(key, &data[key])?;
        if values.len() != domain.len() {
            return Err(ChartError::dataset(format!(
                "series '{}' has {} values but the domain '{}' has {}",
                key,
                values.len(),
                domain_key,
                domain.len()
            )));
        }
        series.push((key.to_string(), values));
    }

    Ok(NormalizedSeries {
        shape,
        domain,
        series,
    })
}

/// Fixed-priority convention detection; documented order, generic last.
fn detect_shape(data: &Dataset) -> DatasetShape {
    let has = |k: &str| data.contains_key(k);
    if has("years") && has("sales") {
        DatasetShape::YearsSales {
            profit: has("profit"),
        }
    } else if has("categories") && has("revenue") {
        DatasetShape::CategoriesRevenue { costs: has("costs") }
    } else if has("labels") && has("values") {
        DatasetShape::LabelsValues
    } else if has("months") && has("users") {
        DatasetShape::MonthsUsers {
            premium: has("premium"),
        }
    } else {
        DatasetShape::Generic
    }
}

/// The domain may be numeric (years) or categorical (month names). All
/// values numeric -> numeric domain; anything else becomes a category
/// label via display rendering.
fn parse_domain(values: &[Value]) -> Domain {
    let numeric: Option<Vec<f64>> = values.iter().map(as_number).collect();
    match numeric {
        Some(v) => Domain::Numeric(v),
        None => Domain::Categorical(values.iter().map(display_value).collect()),
    }
}

/// Series values must be numeric; coercion is the caller's responsibility.
fn parse_numeric_series(key: &str, values: &[Value]) -> Result<Vec<f64>, ChartError> {
    values
        .iter()
        .map(|v| {
            as_number(v).ok_or_else(|| {
                ChartError::dataset(format!("series '{key}' contains a non-numeric value: {v}"))
            })
        })
        .collect()
}

fn as_number(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite())
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
