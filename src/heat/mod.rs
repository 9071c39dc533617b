pub mod exec;
pub mod grid;
pub mod output;
pub mod svg;

pub use exec::exec;
pub use grid::{build_grid, HeatmapGrid, HeatmapSpan, IntensityScale, DEFAULT_CAP, DEFAULT_SPAN_DAYS};
pub use output::output_heatmap;
pub use svg::render_svg;

use crate::model::AttendanceReport;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy)]
pub struct HeatmapOptions {
    pub days: u32,
    pub cap: u32,
    /// Last date shown; defaults to the latest date with a check-in.
    pub as_of: Option<NaiveDate>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            days: DEFAULT_SPAN_DAYS,
            cap: DEFAULT_CAP,
            as_of: None,
        }
    }
}

/// Grid for `report`. `fallback_end` is only used when there is neither
/// an explicit end date nor any check-in to anchor the span.
pub fn heatmap_for(report: &AttendanceReport, options: &HeatmapOptions, fallback_end: NaiveDate) -> HeatmapGrid {
    let end = options
        .as_of
        .or_else(|| report.latest_date())
        .unwrap_or(fallback_end);
    let span = HeatmapSpan::ending_at(end, options.days);
    build_grid(&report.daily_counts, span, IntensityScale::new(options.cap))
}
