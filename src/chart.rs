//! The per-request pipeline (normalize → model → render → encode) and the
//! call contract consumed by an external web layer.
//!
//! Everything here is a pure, bounded-time transform: entities are built
//! fresh per request and discarded with the response, and no state is
//! shared between requests beyond the read-only style tables.

use crate::encode;
use crate::error::ChartError;
use crate::models::{ChartRequest, ChartResponse, HealthResponse};
use crate::normalize;
use crate::render::{self, RasterImage, Scene};
use crate::{curves, style};

/// Run the full pipeline and return the inline image reference.
pub fn generate_chart(req: &ChartRequest) -> Result<String, ChartError> {
    let raster = generate_raster(req)?;
    encode::png_data_uri(&raster)
}

/// Run the pipeline up to the raster, for callers that want raw PNG bytes
/// (e.g. the CLI writing a file).
pub fn generate_chart_png(req: &ChartRequest) -> Result<Vec<u8>, ChartError> {
    let raster = generate_raster(req)?;
    encode::png_bytes(&raster)
}

fn generate_raster(req: &ChartRequest) -> Result<RasterImage, ChartError> {
    let family = req.family()?;
    let normalized = normalize::normalize(&req.data)?;
    log::debug!(
        "request for {family}: {} series over {} domain points ({:?})",
        normalized.series.len(),
        normalized.domain.len(),
        normalized.shape
    );
    let geometry = curves::model(family, &normalized)?;
    let style = style::resolve(&req.color_scheme, &req.grid_style);
    let scene = Scene {
        geometry: &geometry,
        style: &style,
        family,
        title: &req.title,
        x_label: &req.x_axis_label,
        y_label: &req.y_axis_label,
        show_x_axis: req.show_x_axis,
        show_y_axis: req.show_y_axis,
    };
    render::render(&scene)
}

/// Boundary handler for the `POST /api/generate-chart` contract: parse the
/// JSON body, run the pipeline, and fold every failure into a
/// `{success: false, error}` response. Nothing here panics the process, and
/// there is no partial success — either a complete image or an error.
pub fn handle_request(body: &str) -> ChartResponse {
    let echo: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return ChartResponse::err(format!("invalid request body: {e}")),
    };
    let req: ChartRequest = match serde_json::from_value(echo.clone()) {
        Ok(r) => r,
        Err(e) => return ChartResponse::err(format!("invalid request body: {e}")),
    };
    match generate_chart(&req) {
        Ok(chart_url) => ChartResponse::ok(chart_url, echo),
        Err(e) => {
            log::warn!("chart generation failed: {e}");
            ChartResponse::err(e.to_string())
        }
    }
}

/// Boundary handler for the `GET /api/health` contract; always succeeds.
pub fn health() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        message: "CurveMaker API is running".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_is_static() {
        let h = health();
        assert_eq!(h.status, "healthy");
        assert!(h.message.contains("running"));
    }

    #[test]
    fn unknown_family_becomes_error_response() {
        let resp = handle_request(r#"{"curve_type": "radar", "data": {}}"#);
        assert!(!resp.success);
        assert!(resp.chart_url.is_none());
        assert!(resp.error.unwrap().contains("radar"));
    }

    #[test]
    fn garbage_body_becomes_error_response() {
        let resp = handle_request("not json");
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("invalid request body"));
    }
}
