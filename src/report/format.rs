//! Formatted terminal output.
//!
//! Formatting lives here so the math/fitting code stays clean and output
//! changes are localized.

use super::{SeriesStats, series_stats};
use crate::domain::{FitConfig, FitResult, GrowthFamily, LogForm, ModelKind, Series};
use crate::fit::FitBatch;
use crate::io::LoadedData;

/// Format the full run summary: dataset overview, parameters per family, failures.
pub fn format_fit_summary(loaded: &LoadedData, batch: &FitBatch, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== bcurves - benchmark growth curves ===\n");
    out.push_str(&format!(
        "Input: {} | files: {} | series: {} | excluded: {}\n",
        config.input_dir.display(),
        loaded.files_found,
        loaded.series.len(),
        loaded.excluded.len(),
    ));
    if !loaded.excluded.is_empty() {
        out.push_str(&format!("Excluded: {}\n", loaded.excluded.join(", ")));
    }
    out.push_str(&format!(
        "Log form: {} | resample: {} | max evals: {}\n",
        match config.log_form {
            LogForm::Basic => "basic",
            LogForm::Ratio => "ratio",
        },
        if config.resample {
            format!("{} points", config.resample_points)
        } else {
            "off".to_string()
        },
        config.max_evaluations,
    ));

    for family in GrowthFamily::ALL {
        out.push_str(&format!("\n{}:\n", family.display_name()));
        let fits: Vec<&FitResult> = batch.fits.iter().filter(|f| f.family() == family).collect();
        if fits.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        out.push_str(&format!("  model: {}\n", fits[0].model.display_name()));
        for fit in fits {
            out.push_str(&format!(
                "  {:<26} {}  SSE={:.4e} RMSE={:.4e} evals={}\n",
                truncate(&fit.series, 26),
                fmt_params(fit.model, &fit.params),
                fit.quality.sse,
                fit.quality.rmse,
                fit.quality.evaluations,
            ));
        }
    }

    if !batch.failures.is_empty() {
        out.push_str("\nFailed:\n");
        for (name, err) in &batch.failures {
            out.push_str(&format!("  {:<26} {err}\n", truncate(name, 26)));
        }
    }

    out
}

/// Format a per-series overview table (used when only plotting).
pub fn format_series_table(series: &[Series]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<26} {:<10} {:>6} {:>10} {:>10} {:>12} {:>12}\n",
            "series", "family", "n", "x_min", "x_max", "y_min", "y_max"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<26} {:-<10} {:-<6} {:-<10} {:-<10} {:-<12} {:-<12}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in series {
        let SeriesStats {
            n,
            x_min,
            x_max,
            y_min,
            y_max,
        } = series_stats(s);
        out.push_str(&format!(
            "{:<26} {:<10} {:>6} {:>10.0} {:>10.0} {:>12.4e} {:>12.4e}\n",
            truncate(&s.name, 26),
            s.family.display_name(),
            n,
            x_min,
            x_max,
            y_min,
            y_max,
        ));
    }

    out
}

fn fmt_params(model: ModelKind, params: &[f64]) -> String {
    let parts: Vec<String> = model
        .param_names()
        .iter()
        .zip(params)
        .map(|(name, v)| format!("{name}={v:.6e}"))
        .collect();
    parts.join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
