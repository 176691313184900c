//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! grid validation -> directory ingest + classification -> parallel fits
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::domain::FitConfig;
use crate::error::FitError;
use crate::fit::{FitBatch, FitOptions, extrapolation_grid, fit_all};
use crate::io::{LoadedData, load_series_dir};

/// All computed outputs of a single `bcurves fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub loaded: LoadedData,
    pub batch: FitBatch,
    /// Extrapolation grid the fitted curves are predicted on.
    pub grid: Vec<f64>,
}

/// Execute the full fitting pipeline and return the computed outputs.
///
/// Per-series failures are kept in `batch.failures`; the run only fails when
/// there were series to fit and none of them succeeded.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, FitError> {
    // Reject a bad range before touching the filesystem.
    let grid = extrapolation_grid(
        config.extrapolate_min,
        config.extrapolate_max,
        config.extrapolate_steps,
    )?;

    let loaded = load_series_dir(config)?;
    let batch = fit_all(&loaded.series, &FitOptions::from_config(config));

    if batch.fits.is_empty() {
        if let Some((_, err)) = batch.failures.first() {
            return Err(err.clone());
        }
    }

    info!(
        fitted = batch.fits.len(),
        failed = batch.failures.len(),
        grid_points = grid.len(),
        "fit run complete"
    );

    Ok(RunOutput { loaded, batch, grid })
}
