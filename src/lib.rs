//! curvemaker
//!
//! A lightweight Rust library that turns declarative chart requests — a
//! curve family, a loosely-typed dataset, and style options — into rendered
//! PNG images delivered as inline data URIs. Pairs with the `curvemaker`
//! CLI.
//!
//! ### Features
//! - 15 curve families: direct plots (line, bar, pie, area, step), band
//!   stacks (stacked_area, streamgraph), interpolation (spline, bezier),
//!   smoothing (lowess, moving_average), and fits (polynomial, exponential,
//!   plus the fixed sigmoid/gompertz reference curves)
//! - Named dataset conventions (`years`/`sales`, `categories`/`revenue`,
//!   `labels`/`values`, `months`/`users`) with a generic first-key-is-domain
//!   fallback
//! - Five color schemes and configurable grid styles with safe defaults
//! - Renders in memory and encodes to a `data:image/png;base64,...` URI
//!
//! ### Example
//! ```no_run
//! use curvemaker::ChartRequest;
//!
//! let req: ChartRequest = serde_json::from_str(
//!     r#"{
//!         "curve_type": "line",
//!         "title": "Annual Sales",
//!         "data": {"years": [2020, 2021, 2022], "sales": [120, 180, 160]}
//!     }"#,
//! )?;
//! let data_uri = curvemaker::generate_chart(&req)?;
//! assert!(data_uri.starts_with("data:image/png;base64,"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod chart;
pub mod curves;
pub mod encode;
pub mod error;
pub mod models;
pub mod normalize;
pub mod render;
pub mod style;

pub use chart::{generate_chart, generate_chart_png, handle_request, health};
pub use error::ChartError;
pub use models::{ChartRequest, ChartResponse, CurveFamily, Dataset, HealthResponse};
