//! Export fitted parameters to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per fitted series, parameters in the model's own order.

use std::path::Path;

use crate::domain::FitResult;
use crate::error::FitError;

/// Widest parameter vector across all model kinds.
const MAX_PARAMS: usize = 4;

/// Write one row per fitted series.
pub fn write_params_csv(path: &Path, fits: &[FitResult]) -> Result<(), FitError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| FitError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["series".to_string(), "family".to_string(), "model".to_string()];
    header.extend((0..MAX_PARAMS).map(|i| format!("p{i}")));
    header.extend(["sse", "rmse", "n", "evaluations"].map(str::to_string));
    writer
        .write_record(&header)
        .map_err(|e| FitError::io(format!("Failed to write export CSV header: {e}")))?;

    for fit in fits {
        let mut row = vec![
            fit.series.clone(),
            fit.family().display_name().to_string(),
            fit.model.display_name().to_string(),
        ];
        for i in 0..MAX_PARAMS {
            row.push(fit.params.get(i).map(|v| format!("{v:.10e}")).unwrap_or_default());
        }
        row.push(format!("{:.6e}", fit.quality.sse));
        row.push(format!("{:.6e}", fit.quality.rmse));
        row.push(fit.quality.n.to_string());
        row.push(fit.quality.evaluations.to_string());

        writer
            .write_record(&row)
            .map_err(|e| FitError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| FitError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
