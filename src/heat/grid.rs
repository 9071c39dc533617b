use crate::model::{DailyCounts, HeatmapCell};
use chrono::{Datelike, Days, NaiveDate};

pub const DEFAULT_CAP: u32 = 3;
pub const DEFAULT_SPAN_DAYS: u32 = 365;

/// Quantizes a daily count into a band in `0..=cap`.
///
/// Counts at or above the cap share one band; the exact count is still
/// carried on every [`HeatmapCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityScale {
    cap: u32,
}

impl IntensityScale {
    pub fn new(cap: u32) -> Self {
        Self { cap: cap.max(1) }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn band(&self, count: usize) -> u32 {
        u32::try_from(count).unwrap_or(u32::MAX).min(self.cap)
    }
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self::new(DEFAULT_CAP)
    }
}

/// Inclusive range of calendar dates shown on the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HeatmapSpan {
    /// `days` dates ending at (and including) `end`.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len(&self) -> u32 {
        let days = (self.end - self.start).num_days() + 1;
        u32::try_from(days).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    pub span: HeatmapSpan,
    pub scale: IntensityScale,
    /// Week columns touched by the span.
    pub columns: u32,
    /// One cell per date in the span, in date order.
    pub cells: Vec<HeatmapCell>,
}

/// Lay the span out as week columns by weekday rows (Monday on top).
pub fn build_grid(counts: &DailyCounts, span: HeatmapSpan, scale: IntensityScale) -> HeatmapGrid {
    let mut cells = Vec::with_capacity(span.len() as usize);
    let mut column = 0;

    for date in span.days() {
        let row = date.weekday().num_days_from_monday();
        let count = counts.get(&date).copied().unwrap_or(0);
        cells.push(HeatmapCell {
            date,
            count,
            band: scale.band(count),
            column,
            row,
        });
        // Sunday closes the week
        if row == 6 {
            column += 1;
        }
    }

    let columns = cells.last().map(|c| c.column + 1).unwrap_or(0);
    HeatmapGrid {
        span,
        scale,
        columns,
        cells,
    }
}
