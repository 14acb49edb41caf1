//! Single-column legend panel for charts drawn without cartesian axes
//! (pie), placed in its own drawing area on the right.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontFamily;

use super::text::wrap_text_to_width;
use crate::error::ChartError;

/// Draw a titled single-column legend. Pass an empty title to omit it.
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    title: &str,
) -> Result<(), ChartError> {
    legend_area.fill(&WHITE).map_err(ChartError::render)?;

    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;

    let font_px: u32 = 14;
    let line_h: i32 = font_px as i32 + 2;
    let row_gap: i32 = 4;
    let pad_x: i32 = 6;
    let marker_radius: i32 = 4;

    let has_title = !title.trim().is_empty();
    let title_font_px: u32 = 16;
    let title_style: TextStyle = TextStyle::from((FontFamily::SansSerif, title_font_px))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = if has_title {
        legend_area
            .draw(&Text::new(title, (pad_x, pad_x), title_style))
            .map_err(ChartError::render)?;
        pad_x + title_font_px as i32 + 8
    } else {
        pad_x + 6
    };

    let text_x = pad_x + 24;
    let max_text_w = (w - text_x - pad_x).max(40) as u32;

    for (label, color) in items {
        let lines = wrap_text_to_width(label, font_px, max_text_w);
        let block_h = (lines.len().max(1) as i32) * line_h;

        legend_area
            .draw(&Circle::new(
                (pad_x + 12, y + block_h / 2),
                marker_radius,
                color.filled(),
            ))
            .map_err(ChartError::render)?;

        for (i, line) in lines.iter().enumerate() {
            let line_center_y = y + (i as i32) * line_h + line_h / 2;
            legend_area
                .draw(&Text::new(
                    line.as_str(),
                    (text_x, line_center_y),
                    label_style.clone(),
                ))
                .map_err(ChartError::render)?;
        }

        y += block_h + row_gap;
    }

    Ok(())
}
