//! Reporting utilities: per-series statistics and formatted terminal output.

use crate::domain::Series;

mod format;

pub use format::*;

/// Basic ranges of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub n: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Compute [`SeriesStats`]; an empty series reports `NaN` ranges.
pub fn series_stats(series: &Series) -> SeriesStats {
    let mut stats = SeriesStats {
        n: series.len(),
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };
    for s in &series.samples {
        stats.x_min = stats.x_min.min(s.x);
        stats.x_max = stats.x_max.max(s.x);
        stats.y_min = stats.y_min.min(s.y);
        stats.y_max = stats.y_max.max(s.y);
    }
    if stats.n == 0 {
        stats.x_min = f64::NAN;
        stats.x_max = f64::NAN;
        stats.y_min = f64::NAN;
        stats.y_max = f64::NAN;
    }
    stats
}
