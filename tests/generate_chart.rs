//! End-to-end pipeline tests: request in, inline PNG reference out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use curvemaker::{generate_chart, handle_request, ChartRequest};
use serde_json::json;

const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

fn request(curve_type: &str, data: serde_json::Value) -> ChartRequest {
    serde_json::from_value(json!({
        "curve_type": curve_type,
        "title": "Test Chart",
        "x_axis_label": "X",
        "y_axis_label": "Y",
        "data": data,
    }))
    .unwrap()
}

fn decode_data_uri(uri: &str) -> Vec<u8> {
    let payload = uri
        .strip_prefix("data:image/png;base64,")
        .expect("data URI prefix");
    assert!(!payload.is_empty(), "non-empty base64 payload");
    STANDARD.decode(payload).expect("valid base64")
}

/// A minimal valid dataset for each family (spline needs 4 points, fits 3).
fn minimal_data(curve_type: &str) -> serde_json::Value {
    match curve_type {
        "pie" => json!({"labels": ["a", "b", "c"], "values": [1, 1, 2]}),
        "bar" => json!({"categories": ["a", "b"], "revenue": [10, 20], "costs": [3, 4]}),
        "area" => json!({"months": ["Jan", "Feb", "Mar"], "users": [5, 9, 7], "premium": [1, 2, 3]}),
        "exponential" => json!({"years": [0, 1, 2, 3, 4], "sales": [2, 3, 6, 12, 25]}),
        _ => json!({"years": [1, 2, 3, 4, 5], "sales": [10, 14, 12, 18, 16]}),
    }
}

#[test]
fn every_family_renders_a_wellformed_png_data_uri() {
    for family in curvemaker::CurveFamily::ALL {
        let req = request(family.as_str(), minimal_data(family.as_str()));
        let uri = generate_chart(&req)
            .unwrap_or_else(|e| panic!("{family} failed: {e}"));
        let bytes = decode_data_uri(&uri);
        assert_eq!(&bytes[..4], &PNG_MAGIC, "{family} payload is a PNG");
    }
}

#[test]
fn sigmoid_output_is_dataset_independent() {
    let a = generate_chart(&request(
        "sigmoid",
        json!({"years": [1, 2, 3], "sales": [4, 5, 6]}),
    ))
    .unwrap();
    let b = generate_chart(&request(
        "sigmoid",
        json!({"months": ["Jan", "Feb"], "users": [100, 200]}),
    ))
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn gompertz_output_is_dataset_independent() {
    let a = generate_chart(&request("gompertz", json!({"x": [1], "y": [2]}))).unwrap();
    let b = generate_chart(&request("gompertz", json!({"q": [9, 8], "r": [7, 6]}))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_curve_type_yields_error_response_not_panic() {
    let resp = handle_request(
        r#"{"curve_type": "radar", "data": {"years": [1], "sales": [2]}}"#,
    );
    assert!(!resp.success);
    assert!(resp.chart_url.is_none());
    assert!(resp.error.unwrap().contains("radar"));
}

#[test]
fn successful_response_echoes_the_request() {
    let body = r#"{"curve_type": "line", "data": {"years": [1, 2], "sales": [3, 4]}}"#;
    let resp = handle_request(body);
    assert!(resp.success, "error: {:?}", resp.error);
    let uri = resp.chart_url.unwrap();
    assert_eq!(&decode_data_uri(&uri)[..4], &PNG_MAGIC);
    let echo = resp.chart_data.unwrap();
    assert_eq!(echo["curve_type"], "line");
    assert_eq!(echo["data"]["sales"][1], 4);
}

#[test]
fn exponential_fit_failure_degrades_to_a_plain_plot() {
    // Year-scale x values overflow the fixed initial guess, so the fit
    // cannot converge; the request must still produce an image.
    let req = request(
        "exponential",
        json!({"years": [2019, 2020, 2021, 2022], "sales": [10, 20, 30, 40]}),
    );
    let uri = generate_chart(&req).unwrap();
    assert_eq!(&decode_data_uri(&uri)[..4], &PNG_MAGIC);
}

#[test]
fn unknown_style_identifiers_fall_back_instead_of_failing() {
    let mut req = request("line", json!({"years": [1, 2], "sales": [3, 4]}));
    req.color_scheme = "nonexistent".to_string();
    req.grid_style = "nonexistent".to_string();
    assert!(generate_chart(&req).is_ok());
}

#[test]
fn hidden_axes_still_render() {
    let mut req = request("line", json!({"years": [1, 2], "sales": [3, 4]}));
    req.show_x_axis = false;
    req.show_y_axis = false;
    let uri = generate_chart(&req).unwrap();
    assert_eq!(&decode_data_uri(&uri)[..4], &PNG_MAGIC);
}

#[test]
fn empty_dataset_renders_an_empty_chart() {
    let req = request("line", json!({}));
    let uri = generate_chart(&req).unwrap();
    assert_eq!(&decode_data_uri(&uri)[..4], &PNG_MAGIC);
}

#[test]
fn mismatched_series_lengths_are_rejected() {
    let req = request("line", json!({"years": [1, 2, 3], "sales": [1, 2]}));
    let err = generate_chart(&req).unwrap_err();
    assert!(matches!(err, curvemaker::ChartError::MalformedDataset(_)));
}

#[test]
fn zero_sum_pie_is_rejected() {
    let req = request("pie", json!({"labels": ["a", "b"], "values": [0, 0]}));
    assert!(generate_chart(&req).is_err());
}

#[test]
fn all_color_schemes_and_grids_render() {
    for scheme in ["neon", "ocean", "sunset", "forest", "monochrome"] {
        for grid in ["neon", "subtle", "none"] {
            let mut req = request("area", minimal_data("area"));
            req.color_scheme = scheme.to_string();
            req.grid_style = grid.to_string();
            let uri = generate_chart(&req)
                .unwrap_or_else(|e| panic!("{scheme}/{grid} failed: {e}"));
            assert_eq!(&decode_data_uri(&uri)[..4], &PNG_MAGIC);
        }
    }
}
