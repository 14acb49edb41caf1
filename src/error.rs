//! Error taxonomy for the chart pipeline.
//!
//! Only failures that must reach the caller live here. Fit non-convergence
//! (exponential family) and unknown style identifiers are recovered locally
//! and never surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// `curve_type` is not one of the fixed supported families.
    #[error("unsupported curve type: {0}")]
    UnsupportedFamily(String),

    /// The dataset cannot be normalized or is too small for the requested
    /// family: missing keys, mismatched lengths, non-numeric values, or too
    /// few points for an interpolation/fit order.
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    /// The drawing backend failed while producing the raster.
    #[error("render failed: {0}")]
    Render(String),

    /// The raster could not be serialized to a PNG payload.
    #[error("image encoding failed: {0}")]
    Encode(String),
}

impl ChartError {
    /// Shorthand used when mapping plotters backend errors, which are not
    /// `std::error::Error` for every backend and get formatted instead.
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        ChartError::Render(format!("{e:?}"))
    }

    pub(crate) fn dataset(msg: impl Into<String>) -> Self {
        ChartError::MalformedDataset(msg.into())
    }
}
