//! Curve model library: one strategy per curve family, all consuming the
//! same [`NormalizedSeries`] representation and producing plottable
//! [`Geometry`].
//!
//! Dispatch is a single fixed registry ([`model`]); adding a family means
//! adding one strategy function and one arm, nothing else.

pub mod fit;
pub mod interp;
pub mod smooth;
pub mod types;

use num_format::{Locale, ToFormattedString};

use crate::error::ChartError;
use crate::models::CurveFamily;
use crate::normalize::{DatasetShape, Domain, NormalizedSeries};
use crate::style::PALETTE_SIZE;
pub use types::{Band, Bar, BarSeries, Geometry, GeometryKind, SeriesPath, Wedge};

/// Sample counts recovered from the reference behavior.
const SPLINE_SAMPLES: usize = 300;
const BEZIER_STEPS_PER_SEGMENT: usize = 100;
const FIT_SAMPLES: usize = 100;
const FIXED_CURVE_SAMPLES: usize = 100;
/// Moving-average windows, each skipped when the series is shorter.
const MA_WINDOWS: [usize; 2] = [3, 5];
/// Noise fraction injected by the lowess approximation.
const LOWESS_NOISE_FRAC: f64 = 0.1;

/// Fixed strategy registry: curve family -> geometry.
pub fn model(family: CurveFamily, ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    match family {
        CurveFamily::Line => line(ns),
        CurveFamily::Bar => bar(ns),
        CurveFamily::Pie => pie(ns),
        CurveFamily::Area => area(ns),
        CurveFamily::StackedArea => stacked_area(ns),
        CurveFamily::Streamgraph => streamgraph(ns),
        CurveFamily::Step => step(ns),
        CurveFamily::Spline => spline(ns),
        CurveFamily::Bezier => bezier(ns),
        CurveFamily::Lowess => lowess(ns),
        CurveFamily::MovingAverage => moving_average(ns),
        CurveFamily::Polynomial => polynomial(ns),
        CurveFamily::Exponential => exponential(ns),
        CurveFamily::Sigmoid => Ok(sigmoid()),
        CurveFamily::Gompertz => Ok(gompertz()),
    }
}

/// Thousands-separated integer rendering used for bar annotations, pie
/// labels, and count-like axis ticks.
pub fn format_count(v: f64) -> String {
    (v as i64).to_formatted_string(&Locale::en)
}

/// Pie wedge value rendering: integers get separators, fractions stay as-is.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        format_count(v)
    } else {
        format!("{v}")
    }
}

fn zip_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().copied().zip(ys.iter().copied()).collect()
}

/// Named sales/profit shape labels; every other shape legends by key name.
fn series_label(ns: &NormalizedSeries, idx: usize, name: &str) -> String {
    match ns.shape {
        DatasetShape::YearsSales { .. } => match idx {
            0 => "Sales".to_string(),
            1 => "Profit".to_string(),
            _ => name.to_string(),
        },
        _ => name.to_string(),
    }
}

/// The series a single-curve family (fits and smoothers) operates on.
fn primary_series<'a>(
    ns: &'a NormalizedSeries,
    family: &str,
    min_points: usize,
) -> Result<Option<(&'a str, &'a [f64], Vec<f64>)>, ChartError> {
    let Some((name, values)) = ns.primary() else {
        return Ok(None); // nothing to draw
    };
    if values.len() < min_points {
        return Err(ChartError::dataset(format!(
            "{family} requires at least {min_points} points, got {}",
            values.len()
        )));
    }
    Ok(Some((name.as_str(), values.as_slice(), ns.domain.positions())))
}

fn line(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let paths = ns
        .series
        .iter()
        .enumerate()
        .map(|(i, (name, values))| {
            let pts = zip_points(&xs, values);
            SeriesPath::line(series_label(ns, i, name), pts.clone(), i).with_markers(pts)
        })
        .collect();
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

fn step(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let paths = ns
        .series
        .iter()
        .enumerate()
        .map(|(i, (name, values))| {
            // Right-continuous: hold each value until the next domain point.
            let mut pts = Vec::with_capacity(values.len() * 2);
            for (k, (&x, &y)) in xs.iter().zip(values.iter()).enumerate() {
                pts.push((x, y));
                if k + 1 < xs.len() {
                    pts.push((xs[k + 1], y));
                }
            }
            let label = match ns.shape {
                DatasetShape::YearsSales { .. } if i == 0 => "Step Function".to_string(),
                _ => series_label(ns, i, name),
            };
            SeriesPath::line(label, pts, i).with_markers(zip_points(&xs, values))
        })
        .collect();
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

fn spline(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let mut paths = Vec::with_capacity(ns.series.len());
    for (i, (name, values)) in ns.series.iter().enumerate() {
        let curve = interp::cubic_spline_sample(&xs, values, SPLINE_SAMPLES)?;
        let label = match ns.shape {
            DatasetShape::YearsSales { .. } if i == 0 => "Spline".to_string(),
            _ => format!("{name} (Spline)"),
        };
        paths.push(SeriesPath::line(label, curve, i).with_markers(zip_points(&xs, values)));
    }
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

fn bezier(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let Some((_, values, xs)) = primary_series(ns, "bezier", 2)? else {
        return Ok(Geometry::new(GeometryKind::Paths(Vec::new())));
    };
    let anchors = zip_points(&xs, values);
    let curve = interp::quadratic_bezier_path(&anchors, BEZIER_STEPS_PER_SEGMENT);
    let path = SeriesPath::line("Bezier", curve, 0).with_markers(anchors);
    Ok(Geometry::new(GeometryKind::Paths(vec![path])).with_x_ticks(ns.domain.tick_table()))
}

/// Approximate LOWESS: synthetic Gaussian noise over the series, then a
/// 3-point moving average of the noisy values. Not true locally-weighted
/// regression; preserved as a documented approximation.
fn lowess(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let Some((_, values, xs)) = primary_series(ns, "lowess", 3)? else {
        return Ok(Geometry::new(GeometryKind::Paths(Vec::new())));
    };
    let noisy = smooth::add_gaussian_noise(values, LOWESS_NOISE_FRAC);
    let smoothed = smooth::moving_average(&noisy, 3);
    let scatter = SeriesPath::scatter("Original Data", zip_points(&xs, &noisy), 0);
    let line = SeriesPath::line("LOWESS Smoothed", zip_points(&xs[2..], &smoothed), 1);
    Ok(Geometry::new(GeometryKind::Paths(vec![scatter, line]))
        .with_x_ticks(ns.domain.tick_table()))
}

fn moving_average(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let Some((_, values, xs)) = primary_series(ns, "moving average", 1)? else {
        return Ok(Geometry::new(GeometryKind::Paths(Vec::new())));
    };
    let mut paths = Vec::new();
    for (i, &w) in MA_WINDOWS.iter().enumerate() {
        let ma = smooth::moving_average(values, w);
        if ma.is_empty() {
            continue;
        }
        paths.push(SeriesPath::line(
            format!("{w}-period MA"),
            zip_points(&xs[w - 1..], &ma),
            i,
        ));
    }
    paths.push(
        SeriesPath::line("Original Data", zip_points(&xs, values), PALETTE_SIZE - 1)
            .with_markers(zip_points(&xs, values))
            .with_stroke(2),
    );
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

fn polynomial(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let Some((_, values, xs)) = primary_series(ns, "polynomial fit", 3)? else {
        return Ok(Geometry::new(GeometryKind::Paths(Vec::new())));
    };
    let coeffs = fit::polyfit_quadratic(&xs, values)?;
    let (lo, hi) = span(&xs);
    let curve: Vec<(f64, f64)> = interp::linspace(lo, hi, FIT_SAMPLES)
        .into_iter()
        .map(|x| (x, fit::poly_eval(&coeffs, x)))
        .collect();
    let paths = vec![
        SeriesPath::line("Polynomial Fit", curve, 0),
        SeriesPath::scatter("Data Points", zip_points(&xs, values), 1),
    ];
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

fn exponential(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let Some((name, values, xs)) = primary_series(ns, "exponential fit", 3)? else {
        return Ok(Geometry::new(GeometryKind::Paths(Vec::new())));
    };
    let paths = match fit::fit_exponential(&xs, values) {
        Some(f) => {
            let (lo, hi) = span(&xs);
            let curve: Vec<(f64, f64)> = interp::linspace(lo, hi, FIT_SAMPLES)
                .into_iter()
                .map(|x| (x, f.eval(x)))
                .collect();
            vec![
                SeriesPath::line("Exponential Fit", curve, 0),
                SeriesPath::scatter("Data Points", zip_points(&xs, values), 1),
            ]
        }
        None => {
            // Recoverable degradation: plot the raw series without a fit
            // curve (and without a legend entry), never fail the request.
            log::warn!("exponential fit did not converge for series '{name}', plotting raw data");
            vec![SeriesPath::line("", zip_points(&xs, values), 0)
                .with_markers(zip_points(&xs, values))]
        }
    };
    Ok(Geometry::new(GeometryKind::Paths(paths)).with_x_ticks(ns.domain.tick_table()))
}

/// Fixed logistic curve over [-5, 5]; the supplied dataset is accepted but
/// unused, matching the reference behavior exactly.
fn sigmoid() -> Geometry {
    let pts: Vec<(f64, f64)> = interp::linspace(-5.0, 5.0, FIXED_CURVE_SAMPLES)
        .into_iter()
        .map(|x| (x, 1.0 / (1.0 + (-x).exp())))
        .collect();
    Geometry::new(GeometryKind::Paths(vec![SeriesPath::line(
        "Sigmoid Function",
        pts,
        0,
    )]))
    .with_axis_labels("Input", "Output")
}

/// Fixed Gompertz growth curve over [0, 10]; dataset-independent like
/// [`sigmoid`].
fn gompertz() -> Geometry {
    let pts: Vec<(f64, f64)> = interp::linspace(0.0, 10.0, FIXED_CURVE_SAMPLES)
        .into_iter()
        .map(|x| (x, (-(-x + 5.0).exp()).exp()))
        .collect();
    Geometry::new(GeometryKind::Paths(vec![SeriesPath::line(
        "Gompertz Function",
        pts,
        0,
    )]))
    .with_axis_labels("Time", "Growth")
}

fn area(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let named = matches!(ns.shape, DatasetShape::MonthsUsers { .. });
    let bands = ns
        .series
        .iter()
        .enumerate()
        .map(|(i, (name, values))| {
            let upper = zip_points(&xs, values);
            Band {
                label: name.clone(),
                lower: xs.iter().map(|&x| (x, 0.0)).collect(),
                upper: upper.clone(),
                color_index: i,
                fill_alpha: 0.6,
                outline: true,
                markers: if named { upper } else { Vec::new() },
            }
        })
        .collect();
    Ok(Geometry::new(GeometryKind::Bands(bands)).with_x_ticks(ns.domain.tick_table()))
}

fn stacked_area(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let mut running = vec![0.0f64; xs.len()];
    let mut bands = Vec::with_capacity(ns.series.len());
    for (i, (name, values)) in ns.series.iter().enumerate() {
        let lower = zip_points(&xs, &running);
        for (acc, v) in running.iter_mut().zip(values) {
            *acc += v;
        }
        bands.push(Band {
            label: name.clone(),
            lower,
            upper: zip_points(&xs, &running),
            color_index: i,
            fill_alpha: 0.7,
            outline: false,
            markers: Vec::new(),
        });
    }
    Ok(Geometry::new(GeometryKind::Bands(bands)).with_x_ticks(ns.domain.tick_table()))
}

/// Stacked bands re-centered per series by half of that series' own total,
/// producing the wiggling baseline.
fn streamgraph(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let xs = ns.domain.positions();
    let mut running = vec![0.0f64; xs.len()];
    let mut bands = Vec::with_capacity(ns.series.len());
    for (i, (name, values)) in ns.series.iter().enumerate() {
        let center = values.iter().sum::<f64>() / 2.0;
        let lower: Vec<(f64, f64)> = xs
            .iter()
            .zip(running.iter())
            .map(|(&x, &b)| (x, b - center))
            .collect();
        for (acc, v) in running.iter_mut().zip(values) {
            *acc += v;
        }
        bands.push(Band {
            label: name.clone(),
            lower,
            upper: xs
                .iter()
                .zip(running.iter())
                .map(|(&x, &b)| (x, b - center))
                .collect(),
            color_index: i,
            fill_alpha: 0.7,
            outline: false,
            markers: Vec::new(),
        });
    }
    Ok(Geometry::new(GeometryKind::Bands(bands)).with_x_ticks(ns.domain.tick_table()))
}

fn bar(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    match ns.shape {
        DatasetShape::CategoriesRevenue { .. } => bar_named(ns),
        _ => bar_generic(ns),
    }
}

/// `categories` + `revenue` [+ `costs`]: single bars, or a two-layer stack
/// with the value annotations kept on the revenue layer.
fn bar_named(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let n = ns.domain.len();
    let positions: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let mut series = Vec::with_capacity(ns.series.len());
    let mut base = vec![0.0f64; n];
    for (i, (name, values)) in ns.series.iter().enumerate() {
        let bars = positions
            .iter()
            .zip(values.iter())
            .zip(base.iter())
            .map(|((&p, &v), &b)| Bar {
                x0: p - 0.4,
                x1: p + 0.4,
                y0: b,
                y1: b + v,
                annotation: (i == 0).then(|| format_count(v)),
            })
            .collect();
        for (acc, v) in base.iter_mut().zip(values) {
            *acc += v;
        }
        series.push(BarSeries {
            label: name.clone(),
            color_index: i,
            bars,
        });
    }
    let ticks = categorical_labels(&ns.domain)
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s))
        .collect();
    Ok(Geometry::new(GeometryKind::Bars(series)).with_x_ticks(Some(ticks)))
}

/// Generic convention: grouped bars at integer positions. Numeric domains
/// use the 0.13-unit group layout (first series offset one slot, ticks at
/// the 2.5-slot mark); categorical fallbacks use 0.2-unit slots.
fn bar_generic(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    let n = ns.domain.len();
    let positions: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let numeric = matches!(ns.domain, Domain::Numeric(_));
    let (width, first_offset, tick_shift) = if numeric {
        (0.13, 1, 2.5 * 0.13)
    } else {
        (0.2, 0, 0.1)
    };

    let mut series = Vec::with_capacity(ns.series.len());
    for (i, (name, values)) in ns.series.iter().enumerate() {
        let offset = (i + first_offset) as f64 * width;
        let bars = positions
            .iter()
            .zip(values.iter())
            .map(|(&p, &v)| Bar {
                x0: p + offset - width / 2.0,
                x1: p + offset + width / 2.0,
                y0: 0.0,
                y1: v,
                annotation: Some(format_count(v)),
            })
            .collect();
        series.push(BarSeries {
            label: name.clone(),
            color_index: i,
            bars,
        });
    }
    let ticks = categorical_labels(&ns.domain)
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i as f64 + tick_shift, s))
        .collect();
    Ok(Geometry::new(GeometryKind::Bars(series)).with_x_ticks(Some(ticks)))
}

fn categorical_labels(domain: &Domain) -> Vec<String> {
    match domain {
        Domain::Categorical(v) => v.clone(),
        Domain::Numeric(v) => v
            .iter()
            .map(|x| {
                if x.fract() == 0.0 {
                    format!("{}", *x as i64)
                } else {
                    format!("{x}")
                }
            })
            .collect(),
    }
}

fn pie(ns: &NormalizedSeries) -> Result<Geometry, ChartError> {
    // `labels` + `values` is the real pie shape. The generic degenerate
    // form (first key's numbers as values, remaining key names as labels)
    // is preserved from the reference behavior.
    let (labels, values): (Vec<String>, Vec<f64>) = match ns.shape {
        DatasetShape::LabelsValues => {
            let values = ns
                .series
                .first()
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            (categorical_labels(&ns.domain), values)
        }
        _ => {
            let values = match &ns.domain {
                Domain::Numeric(v) => v.clone(),
                Domain::Categorical(_) => {
                    return Err(ChartError::dataset(
                        "pie requires numeric values in the first dataset key",
                    ))
                }
            };
            let labels: Vec<String> = ns.series.iter().map(|(n, _)| n.clone()).collect();
            (labels, values)
        }
    };

    let count = labels.len().min(values.len());
    if count == 0 {
        return Ok(Geometry::new(GeometryKind::Wedges(Vec::new())));
    }
    let total: f64 = values[..count].iter().sum();
    if total <= 0.0 {
        return Err(ChartError::dataset(
            "pie requires a positive value total",
        ));
    }

    let wedges = labels
        .iter()
        .zip(values.iter())
        .take(count)
        .map(|(name, &v)| Wedge {
            name: name.clone(),
            value: v,
            label: format!("{} ({})", name, format_value(v)),
            percent: v / total * 100.0,
        })
        .collect();
    Ok(Geometry::new(GeometryKind::Wedges(wedges)))
}

fn span(xs: &[f64]) -> (f64, f64) {
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}
