use super::grid::HeatmapGrid;
use super::svg::palette_index;
use anyhow::Result;
use console::style;

const GLYPHS: [&str; 4] = ["·", "░", "▒", "█"];
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn glyph(band: u32, cap: u32) -> String {
    let index = palette_index(band, cap).min(GLYPHS.len() - 1);
    let g = GLYPHS[index];
    if index == 0 {
        style(g).dim().to_string()
    } else {
        style(g).green().to_string()
    }
}

pub fn output_heatmap(grid: &HeatmapGrid) -> Result<()> {
    if grid.cells.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let cap = grid.scale.cap();
    println!("{}", style("Attendance Heatmap").bold());
    println!(
        "{} to {} ({} days)",
        style(grid.span.start).dim(),
        style(grid.span.end).dim(),
        grid.span.len()
    );
    println!("{}", "─".repeat(50));

    let mut rows = vec![vec![" ".to_string(); grid.columns as usize]; 7];
    for cell in &grid.cells {
        if let Some(slot) = rows
            .get_mut(cell.row as usize)
            .and_then(|r| r.get_mut(cell.column as usize))
        {
            *slot = glyph(cell.band, cap);
        }
    }

    for (label, row) in WEEKDAYS.iter().zip(rows) {
        println!("{label} {}", row.concat());
    }

    let busiest = grid.cells.iter().max_by_key(|c| (c.count, std::cmp::Reverse(c.date)));
    if let Some(cell) = busiest.filter(|c| c.count > 0) {
        println!(
            "\nBusiest day: {} with {} participants",
            style(cell.date).cyan(),
            style(cell.count).cyan()
        );
    }

    let legend: String = (0..=cap).map(|band| glyph(band, cap)).collect();
    println!("\n{}", style("Legend").bold());
    println!("  Less {legend} More (darkest = {cap}+ participants)");

    Ok(())
}
