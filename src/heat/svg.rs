use super::grid::HeatmapGrid;
use std::fmt::{self, Write};

/// Empty day first, darkest last.
pub const PALETTE: [&str; 4] = ["#ebedf0", "#c6e48b", "#7bc96f", "#196127"];

const CELL: u32 = 14;
const GAP: u32 = 2;
const PAD: u32 = 30;
const MIN_WIDTH: u32 = 180;
const LEGEND_CELL: u32 = 10;

/// Palette index for `band`. Band 0 is always the empty colour and `cap`
/// always the darkest; intermediate bands spread over the rest.
pub fn palette_index(band: u32, cap: u32) -> usize {
    let cap = cap.max(1);
    let band = band.min(cap);
    if band == 0 {
        return 0;
    }
    let top = (PALETTE.len() - 1) as u32;
    ((band * top + cap - 1) / cap) as usize
}

pub fn band_color(band: u32, cap: u32) -> &'static str {
    PALETTE[palette_index(band, cap).min(PALETTE.len() - 1)]
}

/// Self-contained SVG calendar heatmap for `grid`.
pub fn render_svg(grid: &HeatmapGrid) -> std::result::Result<String, fmt::Error> {
    let cap = grid.scale.cap();
    let step = CELL + GAP;
    let x0 = PAD;
    let y0 = PAD + 10;
    let width = (PAD + grid.columns * step + PAD).max(MIN_WIDTH);
    let height = y0 + 7 * step + PAD;

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="system-ui, sans-serif" font-size="10">"#
    )?;
    writeln!(svg, r#"<rect width="{width}" height="{height}" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{PAD}" y="18" font-weight="600">Attendance (last {} days)</text>"#,
        grid.span.len()
    )?;

    for (row, label) in [(0, "Mon"), (2, "Wed"), (4, "Fri")] {
        let y = y0 + row * step + CELL - 3;
        writeln!(svg, r##"<text x="4" y="{y}" fill="#767676">{label}</text>"##)?;
    }

    for cell in &grid.cells {
        let x = x0 + cell.column * step;
        let y = y0 + cell.row * step;
        let noun = if cell.count == 1 { "participant" } else { "participants" };
        writeln!(
            svg,
            r#"<rect x="{x}" y="{y}" width="{CELL}" height="{CELL}" rx="2" fill="{}" data-date="{}" data-count="{}"><title>{} : {} {noun}</title></rect>"#,
            band_color(cell.band, cap),
            cell.date,
            cell.count,
            cell.date,
            cell.count,
        )?;
    }

    // Legend, right-aligned under the grid
    let legend_y = y0 + 7 * step + 8;
    let swatches = cap + 1;
    let legend_width = 28 + swatches * (LEGEND_CELL + GAP) + 28;
    let mut lx = width.saturating_sub(PAD + legend_width);
    writeln!(
        svg,
        r##"<text x="{lx}" y="{}" fill="#767676">Less</text>"##,
        legend_y + LEGEND_CELL - 1
    )?;
    lx += 28;
    for band in 0..=cap {
        writeln!(
            svg,
            r#"<rect x="{lx}" y="{legend_y}" width="{LEGEND_CELL}" height="{LEGEND_CELL}" rx="2" fill="{}"/>"#,
            band_color(band, cap)
        )?;
        lx += LEGEND_CELL + GAP;
    }
    writeln!(
        svg,
        r##"<text x="{}" y="{}" fill="#767676">More</text>"##,
        lx + 4,
        legend_y + LEGEND_CELL - 1
    )?;

    svg.push_str("</svg>\n");
    Ok(svg)
}
