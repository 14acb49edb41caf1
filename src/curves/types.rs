//! Plottable geometry produced by the curve strategies and consumed by the
//! renderer. Colors are palette indices here; the renderer resolves them
//! against the active [`crate::style::StyleSpec`].

/// A polyline and/or marker set for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    /// Legend label; an empty label keeps the series out of the legend.
    pub label: String,
    /// Polyline vertices in plot coordinates; fewer than two points means
    /// no line is drawn.
    pub points: Vec<(f64, f64)>,
    /// Discrete markers (scatter points, original samples under a fit).
    pub markers: Vec<(f64, f64)>,
    pub color_index: usize,
    pub stroke_width: u32,
}

impl SeriesPath {
    pub fn line(label: impl Into<String>, points: Vec<(f64, f64)>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            points,
            markers: Vec::new(),
            color_index,
            stroke_width: 3,
        }
    }

    pub fn scatter(label: impl Into<String>, markers: Vec<(f64, f64)>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
            markers,
            color_index,
            stroke_width: 3,
        }
    }

    pub fn with_markers(mut self, markers: Vec<(f64, f64)>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_stroke(mut self, width: u32) -> Self {
        self.stroke_width = width;
        self
    }
}

/// A filled region between two bound curves (area/stacked/streamgraph).
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub label: String,
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
    pub color_index: usize,
    pub fill_alpha: f64,
    /// Draw a border line along the upper bound.
    pub outline: bool,
    /// Markers on the upper bound (named area shape decorates its points).
    pub markers: Vec<(f64, f64)>,
}

/// One rectangle of a bar chart, with an optional value annotation placed
/// above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub annotation: Option<String>,
}

/// All bars of one series, sharing color and legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub color_index: usize,
    pub bars: Vec<Bar>,
}

/// One pie wedge. `percent` is value / total * 100.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub name: String,
    pub value: f64,
    /// Display label, `"{name} ({value})"`.
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    Paths(Vec<SeriesPath>),
    Bands(Vec<Band>),
    Bars(Vec<BarSeries>),
    Wedges(Vec<Wedge>),
}

/// Geometry plus the axis metadata a strategy controls: categorical tick
/// tables and the axis-label overrides the fixed-curve families force.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    /// (position, label) pairs replacing numeric x tick labels.
    pub x_ticks: Option<Vec<(f64, String)>>,
    pub x_label_override: Option<String>,
    pub y_label_override: Option<String>,
}

impl Geometry {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            x_ticks: None,
            x_label_override: None,
            y_label_override: None,
        }
    }

    pub fn with_x_ticks(mut self, ticks: Option<Vec<(f64, String)>>) -> Self {
        self.x_ticks = ticks;
        self
    }

    pub fn with_axis_labels(mut self, x: &str, y: &str) -> Self {
        self.x_label_override = Some(x.to_string());
        self.y_label_override = Some(y.to_string());
        self
    }

    /// True when there is nothing to draw (empty dataset path).
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            GeometryKind::Paths(p) => p.is_empty(),
            GeometryKind::Bands(b) => b.is_empty(),
            GeometryKind::Bars(b) => b.is_empty(),
            GeometryKind::Wedges(w) => w.is_empty(),
        }
    }
}
