//! Model-layer properties: the geometry each curve strategy produces,
//! checked through the public normalize + model path.

use curvemaker::curves::{self, Geometry, GeometryKind};
use curvemaker::models::{CurveFamily, Dataset};
use curvemaker::normalize::normalize;
use serde_json::json;

fn modeled(family: CurveFamily, data: serde_json::Value) -> Geometry {
    let dataset: Dataset = serde_json::from_value(data).unwrap();
    let ns = normalize(&dataset).unwrap();
    curves::model(family, &ns).unwrap()
}

fn paths(g: &Geometry) -> &[curves::SeriesPath] {
    match &g.kind {
        GeometryKind::Paths(p) => p,
        other => panic!("expected paths, got {other:?}"),
    }
}

#[test]
fn spline_reproduces_original_values_at_the_knots() {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let ys = [10.0, 13.0, 9.0, 15.0, 12.0, 17.0];
    let g = modeled(
        CurveFamily::Spline,
        json!({"years": xs.to_vec(), "sales": ys.to_vec()}),
    );
    let curve = &paths(&g)[0].points;
    assert_eq!(curve.len(), 300);
    for (x, y) in xs.iter().zip(ys.iter()) {
        let nearest = curve
            .iter()
            .min_by(|a, b| (a.0 - x).abs().partial_cmp(&(b.0 - x).abs()).unwrap())
            .unwrap();
        // 300 samples over a 5-unit span: the nearest sample sits within
        // ~0.008 of the knot, so the interpolant is essentially exact.
        assert!(
            (nearest.1 - y).abs() < 0.2,
            "spline at x={x}: {} vs {y}",
            nearest.1
        );
    }
    // Original points come back as discrete markers.
    assert_eq!(paths(&g)[0].markers.len(), xs.len());
}

#[test]
fn polynomial_fit_of_quadratic_data_is_near_exact() {
    let xs: Vec<f64> = (0..6).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|&x| 3.0 * x * x - 2.0 * x + 7.0).collect();
    let g = modeled(
        CurveFamily::Polynomial,
        json!({"years": xs, "sales": ys}),
    );
    let fit = &paths(&g)[0];
    assert_eq!(fit.label, "Polynomial Fit");
    assert_eq!(fit.points.len(), 100);
    for &(x, y) in &fit.points {
        let expected = 3.0 * x * x - 2.0 * x + 7.0;
        assert!(
            (y - expected).abs() < 1e-6,
            "fit at x={x}: {y} vs {expected}"
        );
    }
}

#[test]
fn exponential_fit_of_clean_data_tracks_the_curve() {
    let xs: Vec<f64> = (0..7).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|&x| 2.0 * (0.5 * x).exp() + 1.0).collect();
    let g = modeled(
        CurveFamily::Exponential,
        json!({"years": xs, "sales": ys}),
    );
    let fit = &paths(&g)[0];
    assert_eq!(fit.label, "Exponential Fit");
    for &(x, y) in &fit.points {
        let expected = 2.0 * (0.5 * x).exp() + 1.0;
        assert!(
            (y - expected).abs() < 1e-2,
            "fit at x={x}: {y} vs {expected}"
        );
    }
}

#[test]
fn stacked_area_band_bounds_match_the_running_total() {
    let g = modeled(
        CurveFamily::StackedArea,
        json!({"years": [1, 2, 3], "a": [1, 2, 3], "b": [4, 5, 6]}),
    );
    let GeometryKind::Bands(bands) = &g.kind else {
        panic!("expected bands");
    };
    // B's lower bound equals A at every domain point, upper equals A + B.
    assert_eq!(bands[1].lower, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    assert_eq!(bands[1].upper, vec![(1.0, 5.0), (2.0, 7.0), (3.0, 9.0)]);
}

#[test]
fn streamgraph_wiggles_around_per_series_centers() {
    let g = modeled(
        CurveFamily::Streamgraph,
        json!({"years": [1, 2, 3], "a": [1, 2, 3], "b": [4, 5, 6]}),
    );
    let GeometryKind::Bands(bands) = &g.kind else {
        panic!("expected bands");
    };
    // a: total 6, center 3 -> lower at -3.
    assert_eq!(bands[0].lower[0], (1.0, -3.0));
    // b: running total (a) minus its own center 7.5.
    assert_eq!(bands[1].lower, vec![(1.0, -6.5), (2.0, -5.5), (3.0, -4.5)]);
    assert_eq!(bands[1].upper, vec![(1.0, -2.5), (2.0, -0.5), (3.0, 1.5)]);
}

#[test]
fn moving_average_window_three_aligns_to_trailing_points() {
    let g = modeled(
        CurveFamily::MovingAverage,
        json!({"years": [1, 2, 3, 4, 5], "sales": [1, 2, 3, 4, 5]}),
    );
    let ma3 = &paths(&g)[0];
    assert_eq!(ma3.label, "3-period MA");
    assert_eq!(ma3.points, vec![(3.0, 2.0), (4.0, 3.0), (5.0, 4.0)]);
}

#[test]
fn pie_percentages_sum_to_one_hundred() {
    let g = modeled(
        CurveFamily::Pie,
        json!({"labels": ["a", "b", "c"], "values": [1, 1, 2]}),
    );
    let GeometryKind::Wedges(wedges) = &g.kind else {
        panic!("expected wedges");
    };
    let pct: Vec<f64> = wedges.iter().map(|w| w.percent).collect();
    assert!((pct[0] - 25.0).abs() < 1e-9);
    assert!((pct[1] - 25.0).abs() < 1e-9);
    assert!((pct[2] - 50.0).abs() < 1e-9);
    assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    assert_eq!(wedges[2].label, "c (2)");
}

#[test]
fn lowess_returns_scatter_plus_smoothed_line() {
    let g = modeled(
        CurveFamily::Lowess,
        json!({"years": [1, 2, 3, 4, 5], "sales": [10, 12, 11, 14, 13]}),
    );
    let p = paths(&g);
    assert_eq!(p[0].label, "Original Data");
    assert!(p[0].points.is_empty(), "noisy data is scatter only");
    assert_eq!(p[0].markers.len(), 5);
    assert_eq!(p[1].label, "LOWESS Smoothed");
    // Valid-mode window of 3 over 5 points, trailing alignment.
    assert_eq!(p[1].points.len(), 3);
    assert_eq!(p[1].points[0].0, 3.0);
}

#[test]
fn bezier_concatenates_one_segment_per_pair() {
    let g = modeled(
        CurveFamily::Bezier,
        json!({"years": [1, 2, 3], "sales": [5, 8, 6]}),
    );
    let path = &paths(&g)[0];
    assert_eq!(path.label, "Bezier");
    assert_eq!(path.points.len(), 200);
    assert_eq!(path.markers.len(), 3);
}

#[test]
fn generic_line_uses_key_names_for_legends() {
    let g = modeled(
        CurveFamily::Line,
        json!({"quarter": [1, 2], "visits": [10, 20], "signups": [1, 2]}),
    );
    let labels: Vec<&str> = paths(&g).iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["visits", "signups"]);
}
