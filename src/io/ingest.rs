//! CSV ingest.
//!
//! This module turns a directory of benchmark CSVs (one file per series) into
//! classified, sorted [`Series`].
//!
//! Design goals:
//! - **Canonical schema**: header names are trimmed, BOM-stripped and
//!   lower-cased before lookup, so `Y` and ` Y` name the same column
//! - **Fail fast**: any unreadable file or unparseable value aborts the load
//!   with a `MalformedInput` error naming the file and line
//! - **Deterministic order**: files are processed sorted by file name
//! - **Classify once**: the growth family is attached here and never re-derived

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{FitConfig, Sample, Series};
use crate::error::FitError;
use crate::fit::Classifier;

/// Ingest output: classified series + names that were skipped.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub series: Vec<Series>,
    /// Series dropped by an exclusion marker (never parsed).
    pub excluded: Vec<String>,
    pub files_found: usize,
}

/// Load every CSV under `config.input_dir` into classified series.
pub fn load_series_dir(config: &FitConfig) -> Result<LoadedData, FitError> {
    let classifier = Classifier::from_config(config);
    let files = discover_csv_files(&config.input_dir)?;
    if files.is_empty() {
        return Err(FitError::malformed(format!(
            "No CSV files found in '{}'.",
            config.input_dir.display()
        )));
    }

    let mut series = Vec::new();
    let mut excluded = Vec::new();

    for path in &files {
        let name = series_name(path);
        if classifier.is_excluded(&name) {
            debug!(series = %name, "excluded by marker");
            excluded.push(name);
            continue;
        }

        let samples = read_series_file(path, &config.x_column, &config.y_column)?;
        let family = classifier.classify(&name);
        debug!(series = %name, samples = samples.len(), "loaded series");
        series.push(Series::new(name, family, samples));
    }

    info!(
        dir = %config.input_dir.display(),
        files = files.len(),
        loaded = series.len(),
        excluded = excluded.len(),
        "loaded benchmark series"
    );

    Ok(LoadedData {
        series,
        excluded,
        files_found: files.len(),
    })
}

/// List `*.csv` files (case-insensitive extension) directly inside `dir`, sorted.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, FitError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        FitError::malformed(format!("Failed to read input directory '{}': {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            FitError::malformed(format!("Failed to read input directory '{}': {e}", dir.display()))
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Series name for a file: its stem.
pub fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read the `(x, y)` columns of one CSV file, in file order.
pub fn read_series_file(path: &Path, x_column: &str, y_column: &str) -> Result<Vec<Sample>, FitError> {
    let file = File::open(path)
        .map_err(|e| FitError::malformed(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| FitError::malformed(format!("Failed to read CSV headers in '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = column_index(&header_map, x_column, path)?;
    let y_idx = column_index(&header_map, y_column, path)?;

    let mut samples = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            FitError::malformed(format!("{}:{line}: CSV parse error: {e}", path.display()))
        })?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let x = parse_value(&record, x_idx, x_column, path, line)?;
        let y = parse_value(&record, y_idx, y_column, path, line)?;
        samples.push(Sample::new(x, y));
    }

    Ok(samples)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the x-column lookup fails.
    let name = name.trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, column: &str, path: &Path) -> Result<usize, FitError> {
    header_map
        .get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| {
            FitError::malformed(format!(
                "Missing required column `{}` in '{}'.",
                column.trim(),
                path.display()
            ))
        })
}

fn parse_value(record: &StringRecord, idx: usize, column: &str, path: &Path, line: usize) -> Result<f64, FitError> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            FitError::malformed(format!(
                "{}:{line}: missing value for `{}`.",
                path.display(),
                column.trim()
            ))
        })?;
    let v = raw.parse::<f64>().map_err(|_| {
        FitError::malformed(format!(
            "{}:{line}: invalid number '{raw}' in `{}`.",
            path.display(),
            column.trim()
        ))
    })?;
    if !v.is_finite() {
        return Err(FitError::malformed(format!(
            "{}:{line}: non-finite value '{raw}' in `{}`.",
            path.display(),
            column.trim()
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GrowthFamily;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn config_for(dir: &Path) -> FitConfig {
        FitConfig {
            input_dir: dir.to_path_buf(),
            ..FitConfig::default()
        }
    }

    #[test]
    fn loads_sorts_classifies_and_excludes() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Bubble.csv", "X,Y\n300,9\n100,1\n200,4\n");
        write(dir.path(), "Quick.csv", "X, Y\n10,5\n5,2\n");
        write(dir.path(), "Bubble Almost Sorted.csv", "X,Y\nnot,parsed\n");
        write(dir.path(), "notes.txt", "ignored");

        let data = load_series_dir(&config_for(dir.path())).unwrap();
        assert_eq!(data.files_found, 3);
        assert_eq!(data.excluded, vec!["Bubble Almost Sorted".to_string()]);

        let names: Vec<&str> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bubble", "Quick"]);
        assert_eq!(data.series[0].family, GrowthFamily::Quadratic);
        assert_eq!(data.series[0].xs(), vec![100.0, 200.0, 300.0]);
        assert_eq!(data.series[1].family, GrowthFamily::LogLinear);
        assert_eq!(data.series[1].ys(), vec![2.0, 5.0]);
    }

    #[test]
    fn leading_space_and_bom_headers_resolve() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Std.csv");
        fs::write(&path, "\u{feff}X, Y\n1,2\n").unwrap();
        let samples = read_series_file(&path, "X", "Y").unwrap();
        assert_eq!(samples, vec![Sample::new(1.0, 2.0)]);

        let samples = read_series_file(&path, "x", " Y").unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn missing_column_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bubble.csv");
        fs::write(&path, "X,Time\n1,2\n").unwrap();
        let err = read_series_file(&path, "X", "Y").unwrap_err();
        assert!(matches!(err, FitError::MalformedInput(ref m) if m.contains("`Y`")), "{err}");
    }

    #[test]
    fn bad_value_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bubble.csv");
        fs::write(&path, "X,Y\n1,2\n3,abc\n").unwrap();
        let err = read_series_file(&path, "X", "Y").unwrap_err();
        assert!(matches!(err, FitError::MalformedInput(ref m) if m.contains(":3:")), "{err}");
    }

    #[test]
    fn empty_directory_is_malformed() {
        let dir = tempdir().unwrap();
        let err = load_series_dir(&config_for(dir.path())).unwrap_err();
        assert!(matches!(err, FitError::MalformedInput(_)));
    }

    #[test]
    fn missing_directory_is_malformed() {
        let dir = tempdir().unwrap();
        let err = load_series_dir(&config_for(&dir.path().join("nope"))).unwrap_err();
        assert!(matches!(err, FitError::MalformedInput(_)));
    }
}
