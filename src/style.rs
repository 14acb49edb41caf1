//! Style resolution: color-scheme and grid-style identifiers to concrete
//! visual parameters.
//!
//! The palette and grid tables are process-lifetime constants, read-only
//! after initialization. Unknown identifiers fall back to the `neon`
//! defaults — style is cosmetic, never fatal.

use plotters::style::{RGBAColor, RGBColor};

/// Every palette carries the same number of colors; series beyond that
/// cycle by index.
pub const PALETTE_SIZE: usize = 6;

const NEON: [RGBColor; PALETTE_SIZE] = [
    RGBColor(31, 119, 180),  // #1F77B4
    RGBColor(255, 127, 14),  // #FF7F0E
    RGBColor(44, 160, 44),   // #2CA02C
    RGBColor(214, 39, 40),   // #D62728
    RGBColor(148, 103, 189), // #9467BD
    RGBColor(140, 86, 75),   // #8C564B
];

const OCEAN: [RGBColor; PALETTE_SIZE] = [
    RGBColor(30, 58, 138),  // #1E3A8A
    RGBColor(59, 130, 246), // #3B82F6
    RGBColor(6, 182, 212),  // #06B6D4
    RGBColor(8, 145, 178),  // #0891B2
    RGBColor(14, 116, 144), // #0E7490
    RGBColor(21, 94, 117),  // #155E75
];

const SUNSET: [RGBColor; PALETTE_SIZE] = [
    RGBColor(249, 115, 22), // #F97316
    RGBColor(234, 88, 12),  // #EA580C
    RGBColor(220, 38, 38),  // #DC2626
    RGBColor(185, 28, 28),  // #B91C1C
    RGBColor(153, 27, 27),  // #991B1B
    RGBColor(127, 29, 29),  // #7F1D1D
];

const FOREST: [RGBColor; PALETTE_SIZE] = [
    RGBColor(22, 101, 52),   // #166534
    RGBColor(22, 163, 74),   // #16A34A
    RGBColor(34, 197, 94),   // #22C55E
    RGBColor(74, 222, 128),  // #4ADE80
    RGBColor(134, 239, 172), // #86EFAC
    RGBColor(187, 247, 208), // #BBF7D0
];

const MONOCHROME: [RGBColor; PALETTE_SIZE] = [
    RGBColor(0, 0, 0),       // #000000
    RGBColor(64, 64, 64),    // #404040
    RGBColor(128, 128, 128), // #808080
    RGBColor(192, 192, 192), // #C0C0C0
    RGBColor(224, 224, 224), // #E0E0E0
    RGBColor(240, 240, 240), // #F0F0F0
];

/// Grid line parameters; `None` in [`StyleSpec::grid`] means no grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub color: RGBColor,
    pub alpha: f64,
    pub stroke_width: u32,
}

const GRID_NEON: GridSpec = GridSpec {
    color: RGBColor(204, 204, 204), // #CCCCCC
    alpha: 0.3,
    stroke_width: 1,
};

const GRID_SUBTLE: GridSpec = GridSpec {
    color: RGBColor(221, 221, 221), // #DDDDDD
    alpha: 0.2,
    stroke_width: 1,
};

/// Concrete visual parameters for one render, independent of curve family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    pub palette: &'static [RGBColor; PALETTE_SIZE],
    pub grid: Option<GridSpec>,
}

impl StyleSpec {
    /// Palette color for a series index, cycling past the palette end.
    pub fn color(&self, index: usize) -> RGBAColor {
        let c = self.palette[index % PALETTE_SIZE];
        RGBAColor(c.0, c.1, c.2, 1.0)
    }
}

/// Map identifiers to a concrete [`StyleSpec`]; unknown identifiers use the
/// documented `neon` defaults.
pub fn resolve(color_scheme: &str, grid_style: &str) -> StyleSpec {
    let palette = match color_scheme {
        "neon" => &NEON,
        "ocean" => &OCEAN,
        "sunset" => &SUNSET,
        "forest" => &FOREST,
        "monochrome" => &MONOCHROME,
        _ => &NEON,
    };
    let grid = match grid_style {
        "none" => None,
        "subtle" => Some(GRID_SUBTLE),
        "neon" => Some(GRID_NEON),
        _ => Some(GRID_NEON),
    };
    StyleSpec { palette, grid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes_resolve() {
        assert_eq!(resolve("ocean", "neon").palette, &OCEAN);
        assert_eq!(resolve("monochrome", "subtle").grid, Some(GRID_SUBTLE));
        assert_eq!(resolve("neon", "none").grid, None);
    }

    #[test]
    fn unknown_identifiers_fall_back_to_neon() {
        let s = resolve("zebra", "plaid");
        assert_eq!(s.palette, &NEON);
        assert_eq!(s.grid, Some(GRID_NEON));
    }

    #[test]
    fn palette_colors_cycle() {
        let s = resolve("neon", "neon");
        assert_eq!(s.color(0), s.color(PALETTE_SIZE));
        assert_eq!(s.color(1), s.color(PALETTE_SIZE + 1));
    }
}
