//! Rendering: draw resolved geometry and style onto an in-memory RGB
//! canvas.
//!
//! The backing buffer is allocated per call and owned by the returned
//! [`RasterImage`]; the plotters drawing area borrows it inside a scope and
//! is released on every exit path, so concurrent requests each get an
//! isolated drawing context and nothing leaks under sustained load.

pub mod legend;
pub mod text;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use std::sync::Once;

use crate::curves::{format_count, Geometry, GeometryKind, Wedge};
use crate::error::ChartError;
use crate::models::CurveFamily;
use crate::style::StyleSpec;
use legend::draw_legend_panel;

/// Fixed output resolution, sized for high-fidelity export.
pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

/// One-time registration of the embedded fallback font for the `ab_glyph`
/// text path, which does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// A rendered RGB raster (3 bytes per pixel, row-major).
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub geometry: &'a Geometry,
    pub style: &'a StyleSpec,
    pub family: CurveFamily,
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
}

/// Render a scene to a fresh raster. Each call allocates and fully releases
/// its own drawing surface.
pub fn render(scene: &Scene) -> Result<RasterImage, ChartError> {
    ensure_fonts_registered();
    log::debug!(
        "rendering {} chart at {}x{}",
        scene.family,
        CHART_WIDTH,
        CHART_HEIGHT
    );

    let mut buffer = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().map_err(ChartError::render)?;
    }
    Ok(RasterImage {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        pixels: buffer,
    })
}

fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(ChartError::render)?;
    match &scene.geometry.kind {
        GeometryKind::Wedges(wedges) => draw_pie(root, wedges, scene),
        _ => draw_cartesian(root, scene),
    }
}

fn draw_cartesian<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
) -> Result<(), ChartError> {
    let ((x_min, x_max), (y_min, y_max)) = plot_bounds(scene.geometry);

    let left_area = if scene.show_y_axis { 80 } else { 0 };
    let bottom_area = if scene.show_x_axis { 56 } else { 0 };

    let mut chart = ChartBuilder::on(root)
        .margin(16_u32)
        .caption(scene.title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left_area)
        .set_label_area_size(LabelAreaPosition::Bottom, bottom_area)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(ChartError::render)?;

    // Tick label formatters. Categorical tick tables replace numeric x
    // labels; count-like families get thousands separators on y.
    let x_ticks = scene.geometry.x_ticks.clone();
    let x_fmt = |x: &f64| -> String {
        match &x_ticks {
            Some(table) => table
                .iter()
                .min_by(|a, b| (a.0 - x).abs().total_cmp(&(b.0 - x).abs()))
                .filter(|(pos, _)| (pos - x).abs() < 0.45)
                .map(|(_, label)| label.clone())
                .unwrap_or_default(),
            None => {
                if (x - x.round()).abs() < 1e-6 {
                    format!("{}", x.round() as i64)
                } else {
                    format!("{x:.1}")
                }
            }
        }
    };
    let count_like = scene.family.count_like();
    let y_fmt = |v: &f64| -> String {
        if count_like {
            format_count(*v)
        } else {
            let a = v.abs();
            let prec = if a >= 100.0 {
                0
            } else if a >= 10.0 {
                1
            } else {
                2
            };
            format!("{:.*}", prec, *v)
        }
    };

    let x_label_count = match &scene.geometry.x_ticks {
        Some(t) => t.len().clamp(1, 24),
        None => 10,
    };

    {
        let mut mesh = chart.configure_mesh();
        match scene.style.grid {
            Some(g) => {
                let grid_style = g.color.mix(g.alpha).stroke_width(g.stroke_width);
                mesh.light_line_style(grid_style).bold_line_style(grid_style);
            }
            None => {
                mesh.disable_mesh();
            }
        }
        mesh.x_labels(if scene.show_x_axis { x_label_count } else { 0 })
            .y_labels(if scene.show_y_axis { 10 } else { 0 })
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 16));

        let x_desc = scene
            .geometry
            .x_label_override
            .as_deref()
            .unwrap_or(scene.x_label);
        let y_desc = scene
            .geometry
            .y_label_override
            .as_deref()
            .unwrap_or(scene.y_label);
        if scene.show_x_axis && !x_desc.is_empty() {
            mesh.x_desc(x_desc);
        }
        if scene.show_y_axis && !y_desc.is_empty() {
            mesh.y_desc(y_desc);
        }
        mesh.draw().map_err(ChartError::render)?;
    }

    let mut has_legend_entries = false;
    let y_range = y_max - y_min;

    match &scene.geometry.kind {
        GeometryKind::Paths(paths) => {
            for path in paths {
                let color = scene.style.color(path.color_index);
                if path.points.len() > 1 {
                    let series = chart
                        .draw_series(LineSeries::new(
                            path.points.iter().copied(),
                            color.stroke_width(path.stroke_width),
                        ))
                        .map_err(ChartError::render)?;
                    if !path.label.is_empty() {
                        has_legend_entries = true;
                        let legend_color = color;
                        series.label(path.label.as_str()).legend(move |(x, y)| {
                            Circle::new((x + 8, y), 4, legend_color.filled())
                        });
                    }
                }
                if !path.markers.is_empty() {
                    let series = chart
                        .draw_series(
                            path.markers
                                .iter()
                                .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
                        )
                        .map_err(ChartError::render)?;
                    // Marker-only series carry the legend entry themselves.
                    if path.points.len() <= 1 && !path.label.is_empty() {
                        has_legend_entries = true;
                        let legend_color = color;
                        series.label(path.label.as_str()).legend(move |(x, y)| {
                            Circle::new((x + 8, y), 4, legend_color.filled())
                        });
                    }
                }
            }
        }
        GeometryKind::Bands(bands) => {
            for band in bands {
                let color = scene.style.color(band.color_index);
                let mut poly: Vec<(f64, f64)> =
                    Vec::with_capacity(band.lower.len() + band.upper.len());
                poly.extend(band.lower.iter().copied());
                poly.extend(band.upper.iter().rev().copied());
                let series = chart
                    .draw_series(std::iter::once(Polygon::new(
                        poly,
                        color.mix(band.fill_alpha).filled(),
                    )))
                    .map_err(ChartError::render)?;
                if !band.label.is_empty() {
                    has_legend_entries = true;
                    let legend_color = color;
                    series.label(band.label.as_str()).legend(move |(x, y)| {
                        Circle::new((x + 8, y), 4, legend_color.filled())
                    });
                }
                if band.outline {
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            band.upper.clone(),
                            color.stroke_width(2),
                        )))
                        .map_err(ChartError::render)?;
                }
                if !band.markers.is_empty() {
                    chart
                        .draw_series(
                            band.markers
                                .iter()
                                .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
                        )
                        .map_err(ChartError::render)?;
                }
            }
        }
        GeometryKind::Bars(series_list) => {
            let annotation_font_px: u32 = 12;
            let annotation_style = TextStyle::from((FontFamily::SansSerif, annotation_font_px))
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            for bar_series in series_list {
                let color = scene.style.color(bar_series.color_index);
                let series = chart
                    .draw_series(bar_series.bars.iter().map(|b| {
                        Rectangle::new(
                            [(b.x0, b.y0), (b.x1, b.y1)],
                            color.mix(0.8).filled(),
                        )
                    }))
                    .map_err(ChartError::render)?;
                if !bar_series.label.is_empty() {
                    has_legend_entries = true;
                    let legend_color = color;
                    series.label(bar_series.label.as_str()).legend(move |(x, y)| {
                        Rectangle::new(
                            [(x + 2, y - 5), (x + 12, y + 5)],
                            legend_color.filled(),
                        )
                    });
                }
                chart
                    .draw_series(bar_series.bars.iter().filter_map(|b| {
                        b.annotation.as_ref().map(|txt| {
                            Text::new(
                                txt.clone(),
                                ((b.x0 + b.x1) / 2.0, b.y1 + y_range * 0.01),
                                annotation_style.clone(),
                            )
                        })
                    }))
                    .map_err(ChartError::render)?;
            }
        }
        GeometryKind::Wedges(_) => unreachable!("pie handled before cartesian setup"),
    }

    if has_legend_entries {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(ChartError::render)?;
    }

    Ok(())
}

/// Pie charts bypass the cartesian chart context entirely: title and wedge
/// fan are drawn directly on the root area, with a legend panel at right.
fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    wedges: &[Wedge],
    scene: &Scene,
) -> Result<(), ChartError> {
    let (w, h) = root.dim_in_pixel();

    let title_font_px: u32 = 24;
    let title_style = TextStyle::from((FontFamily::SansSerif, title_font_px))
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(scene.title, (w as i32 / 2, 16), title_style))
        .map_err(ChartError::render)?;

    if wedges.is_empty() {
        return Ok(());
    }

    let (plot_area, legend_area) = root.split_horizontally((75).percent_width());
    let (pw, ph) = plot_area.dim_in_pixel();
    let cx = pw as i32 / 2;
    let cy = ph as i32 / 2 + 16;
    let radius = (pw.min(ph) as f64) * 0.32;

    let total: f64 = wedges.iter().map(|wd| wd.value).sum();
    // Start at 12 o'clock, sweep counter-clockwise.
    let mut angle = std::f64::consts::FRAC_PI_2;

    let wedge_font_px: u32 = 13;
    let pct_style = TextStyle::from((FontFamily::SansSerif, wedge_font_px))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let label_style = TextStyle::from((FontFamily::SansSerif, wedge_font_px))
        .pos(Pos::new(HPos::Center, VPos::Center));

    let to_screen = |theta: f64, r: f64| -> (i32, i32) {
        (
            cx + (r * theta.cos()).round() as i32,
            cy - (r * theta.sin()).round() as i32,
        )
    };

    for (i, wedge) in wedges.iter().enumerate() {
        let sweep = wedge.value / total * std::f64::consts::TAU;
        let end = angle + sweep;
        let color = scene.style.color(i);

        let steps = ((sweep.to_degrees() / 2.0).ceil() as usize).max(8);
        let mut sector = Vec::with_capacity(steps + 2);
        sector.push((cx, cy));
        for s in 0..=steps {
            let theta = angle + sweep * s as f64 / steps as f64;
            sector.push(to_screen(theta, radius));
        }
        plot_area
            .draw(&Polygon::new(sector, color.filled()))
            .map_err(ChartError::render)?;

        let mid = angle + sweep / 2.0;
        let (px, py) = to_screen(mid, radius * 0.6);
        plot_area
            .draw(&Text::new(
                format!("{:.1}%", wedge.percent),
                (px, py),
                pct_style.clone(),
            ))
            .map_err(ChartError::render)?;

        let (lx, ly) = to_screen(mid, radius * 1.22);
        plot_area
            .draw(&Text::new(wedge.label.clone(), (lx, ly), label_style.clone()))
            .map_err(ChartError::render)?;

        angle = end;
    }

    let items: Vec<(String, RGBAColor)> = wedges
        .iter()
        .enumerate()
        .map(|(i, wd)| (wd.name.clone(), scene.style.color(i)))
        .collect();
    draw_legend_panel(&legend_area, &items, "Categories")
}

/// Data bounds plus family-appropriate padding; degenerate ranges are
/// padded to ±1.
fn plot_bounds(geometry: &Geometry) -> ((f64, f64), (f64, f64)) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    let mut grow = |px: f64, py: f64| {
        x.0 = x.0.min(px);
        x.1 = x.1.max(px);
        y.0 = y.0.min(py);
        y.1 = y.1.max(py);
    };

    match &geometry.kind {
        GeometryKind::Paths(paths) => {
            for p in paths {
                for &(px, py) in p.points.iter().chain(p.markers.iter()) {
                    grow(px, py);
                }
            }
        }
        GeometryKind::Bands(bands) => {
            for b in bands {
                for &(px, py) in b.lower.iter().chain(b.upper.iter()) {
                    grow(px, py);
                }
            }
        }
        GeometryKind::Bars(series_list) => {
            for s in series_list {
                for b in &s.bars {
                    grow(b.x0, b.y0);
                    grow(b.x1, b.y1);
                }
            }
        }
        GeometryKind::Wedges(_) => {}
    }
    if let Some(ticks) = &geometry.x_ticks {
        for (pos, _) in ticks {
            x.0 = x.0.min(*pos);
            x.1 = x.1.max(*pos);
        }
    }

    if !(x.0.is_finite() && x.1.is_finite() && y.0.is_finite() && y.1.is_finite()) {
        return ((0.0, 1.0), (0.0, 1.0));
    }

    let bars = matches!(geometry.kind, GeometryKind::Bars(_));
    if bars {
        // Slot padding left/right, headroom for value annotations above.
        x.0 -= 0.3;
        x.1 += 0.3;
        y.0 = y.0.min(0.0);
        y.1 += (y.1 - y.0).abs() * 0.08;
    } else {
        let pad = (y.1 - y.0).abs() * 0.05;
        y.0 -= pad;
        y.1 += pad;
    }

    if (x.1 - x.0).abs() < f64::EPSILON {
        x.0 -= 1.0;
        x.1 += 1.0;
    }
    if (y.1 - y.0).abs() < f64::EPSILON {
        y.0 -= 1.0;
        y.1 += 1.0;
    }
    ((x.0, x.1), (y.0, y.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{Geometry, GeometryKind, SeriesPath};
    use crate::style;

    #[test]
    fn bounds_pad_degenerate_ranges() {
        let g = Geometry::new(GeometryKind::Paths(vec![SeriesPath::line(
            "one",
            vec![(2.0, 5.0)],
            0,
        )]));
        let ((x0, x1), (y0, y1)) = plot_bounds(&g);
        assert!(x0 < 2.0 && x1 > 2.0);
        assert!(y0 < 5.0 && y1 > 5.0);
    }

    #[test]
    fn empty_geometry_gets_unit_bounds() {
        let g = Geometry::new(GeometryKind::Paths(Vec::new()));
        assert_eq!(plot_bounds(&g), ((0.0, 1.0), (0.0, 1.0)));
    }

    #[test]
    fn render_produces_nonblank_raster() {
        let g = Geometry::new(GeometryKind::Paths(vec![SeriesPath::line(
            "demo",
            vec![(0.0, 0.0), (1.0, 2.0), (2.0, 1.0)],
            0,
        )]));
        let style = style::resolve("neon", "neon");
        let scene = Scene {
            geometry: &g,
            style: &style,
            family: crate::models::CurveFamily::Line,
            title: "Render Test",
            x_label: "x",
            y_label: "y",
            show_x_axis: true,
            show_y_axis: true,
        };
        let img = render(&scene).unwrap();
        assert_eq!(img.pixels.len(), (CHART_WIDTH * CHART_HEIGHT * 3) as usize);
        // White background plus at least some colored pixels.
        assert!(img.pixels.iter().any(|&b| b != 255));
    }
}
