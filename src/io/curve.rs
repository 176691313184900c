//! Read/write curves JSON files.
//!
//! Curves JSON is the "portable" representation of a fit run:
//! - model kind + parameters per series
//! - fit quality diagnostics
//! - a precomputed predicted grid for quick plotting
//!
//! The schema is defined by `domain::CurvesFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{CurveEntry, CurveGrid, CurvesFile, FitResult};
use crate::error::FitError;
use crate::models::predict_curve;

/// Build the curves document for `fits` evaluated on `grid`.
pub fn build_curves_file(fits: &[FitResult], grid: &[f64]) -> CurvesFile {
    let curves = fits
        .iter()
        .map(|fit| {
            // JSON has no NaN; points outside the model's domain are dropped.
            let (x, y) = predict_curve(fit, grid)
                .into_iter()
                .filter(|(_, y)| y.is_finite())
                .unzip();
            CurveEntry {
                series: fit.series.clone(),
                family: fit.family(),
                model: fit.model,
                params: fit.params.clone(),
                quality: fit.quality.clone(),
                grid: CurveGrid { x, y },
            }
        })
        .collect();

    CurvesFile {
        tool: "bcurves".to_string(),
        generated_at: Local::now().to_rfc3339(),
        curves,
    }
}

/// Write a curves JSON file.
pub fn write_curves_json(path: &Path, fits: &[FitResult], grid: &[f64]) -> Result<(), FitError> {
    let file = File::create(path)
        .map_err(|e| FitError::io(format!("Failed to create curves JSON '{}': {e}", path.display())))?;

    let curves = build_curves_file(fits, grid);
    serde_json::to_writer_pretty(file, &curves)
        .map_err(|e| FitError::io(format!("Failed to write curves JSON: {e}")))?;

    Ok(())
}

/// Read a curves JSON file.
pub fn read_curves_json(path: &Path) -> Result<CurvesFile, FitError> {
    let file = File::open(path)
        .map_err(|e| FitError::malformed(format!("Failed to open curves JSON '{}': {e}", path.display())))?;
    let curves: CurvesFile =
        serde_json::from_reader(file).map_err(|e| FitError::malformed(format!("Invalid curves JSON: {e}")))?;
    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, GrowthFamily, ModelKind};
    use tempfile::tempdir;

    #[test]
    fn curves_file_survives_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curves.json");
        let fits = vec![FitResult {
            series: "Quick".to_string(),
            model: ModelKind::LogLinear,
            params: vec![2.0, 0.0, 1.0],
            quality: FitQuality {
                sse: 1.0,
                rmse: 0.5,
                n: 4,
                evaluations: 12,
                resampled: true,
            },
        }];

        write_curves_json(&path, &fits, &[10.0, 20.0]).unwrap();
        let back = read_curves_json(&path).unwrap();

        assert_eq!(back.tool, "bcurves");
        assert_eq!(back.curves.len(), 1);
        let c = &back.curves[0];
        assert_eq!(c.family, GrowthFamily::LogLinear);
        assert_eq!(c.model, ModelKind::LogLinear);
        assert_eq!(c.grid.x, vec![10.0, 20.0]);
        assert!((c.grid.y[0] - 10.0 * 20.0_f64.ln()).abs() < 1e-9);
        assert!(c.quality.resampled);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_curves_json(&path), Err(FitError::MalformedInput(_))));
    }
}
