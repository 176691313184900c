//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One benchmark measurement: input size `x` and observed time `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Assumed asymptotic shape of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthFamily {
    /// `O(n²)` algorithms.
    Quadratic,
    /// `O(n log n)` algorithms.
    #[serde(rename = "loglinear")]
    LogLinear,
}

impl GrowthFamily {
    pub const ALL: [GrowthFamily; 2] = [GrowthFamily::Quadratic, GrowthFamily::LogLinear];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            GrowthFamily::Quadratic => "Quadratic",
            GrowthFamily::LogLinear => "LogLinear",
        }
    }

    /// Concrete model used to fit this family.
    pub fn model(self, log_form: LogForm) -> ModelKind {
        match self {
            GrowthFamily::Quadratic => ModelKind::Quadratic,
            GrowthFamily::LogLinear => match log_form {
                LogForm::Basic => ModelKind::LogLinear,
                LogForm::Ratio => ModelKind::LogRatio,
            },
        }
    }
}

/// Which functional form the log-linear family is fitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogForm {
    /// `c·x·ln(a·x) + b`
    Basic,
    /// `c·x·ln(a·x) / ln(e·x) + d`
    Ratio,
}

/// Concrete fitted model kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `a·x² + b·x + c`, params `[a, b, c]`.
    Quadratic,
    /// `c·x·ln(a·x) + b`, params `[a, b, c]`.
    #[serde(rename = "loglinear")]
    LogLinear,
    /// `c·x·ln(a·x) / ln(e·x) + d`, params `[a, c, d, e]`.
    #[serde(rename = "logratio")]
    LogRatio,
}

impl ModelKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Quadratic => "a*x^2 + b*x + c",
            ModelKind::LogLinear => "c*x*ln(a*x) + b",
            ModelKind::LogRatio => "c*x*ln(a*x)/ln(e*x) + d",
        }
    }

    /// Number of free parameters.
    pub fn param_len(self) -> usize {
        match self {
            ModelKind::Quadratic | ModelKind::LogLinear => 3,
            ModelKind::LogRatio => 4,
        }
    }

    /// Parameter names, in the order of the parameter vector.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::Quadratic => &["a", "b", "c"],
            ModelKind::LogLinear => &["a", "b", "c"],
            ModelKind::LogRatio => &["a", "c", "d", "e"],
        }
    }

    pub fn family(self) -> GrowthFamily {
        match self {
            ModelKind::Quadratic => GrowthFamily::Quadratic,
            ModelKind::LogLinear | ModelKind::LogRatio => GrowthFamily::LogLinear,
        }
    }
}

/// A named benchmark series, sorted by `x` ascending.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub family: GrowthFamily,
    pub samples: Vec<Sample>,
}

impl Series {
    /// Build a series, stable-sorting samples by `x`.
    pub fn new(name: impl Into<String>, family: GrowthFamily, mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self {
            name: name.into(),
            family,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.x, s.y)).collect()
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    /// Samples the optimizer saw (after optional resampling).
    pub n: usize,
    /// Residual evaluations spent by the optimizer.
    pub evaluations: usize,
    pub resampled: bool,
}

/// Fitted model for one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub series: String,
    pub model: ModelKind,
    pub params: Vec<f64>,
    pub quality: FitQuality,
}

impl FitResult {
    pub fn family(&self) -> GrowthFamily {
        self.model.family()
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input_dir: PathBuf,
    pub x_column: String,
    pub y_column: String,

    /// Substrings that put a series into the log-linear family.
    pub log_keywords: Vec<String>,
    /// Substrings that drop a series entirely.
    pub exclude_markers: Vec<String>,

    pub log_form: LogForm,
    pub resample: bool,
    pub resample_points: usize,
    pub max_evaluations: usize,

    pub extrapolate_min: f64,
    pub extrapolate_max: f64,
    pub extrapolate_steps: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub svg_dir: Option<PathBuf>,
    pub export_params: Option<PathBuf>,
    pub export_curves: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            x_column: "X".to_string(),
            y_column: "Y".to_string(),
            log_keywords: DEFAULT_LOG_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            exclude_markers: DEFAULT_EXCLUDE_MARKERS.iter().map(|s| s.to_string()).collect(),
            log_form: LogForm::Basic,
            resample: false,
            resample_points: DEFAULT_RESAMPLE_POINTS,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            extrapolate_min: 25_000.0,
            extrapolate_max: 500_000.0,
            extrapolate_steps: 5_000,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            svg_dir: None,
            export_params: None,
            export_curves: None,
        }
    }
}

pub const DEFAULT_INPUT_DIR: &str = "Benchmarks";
pub const DEFAULT_LOG_KEYWORDS: [&str; 2] = ["Quick", "Std"];
pub const DEFAULT_EXCLUDE_MARKERS: [&str; 1] = ["Almost"];
pub const DEFAULT_RESAMPLE_POINTS: usize = 100;
pub const DEFAULT_MAX_EVALUATIONS: usize = 50_000;

/// A saved set of predicted curves (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvesFile {
    pub tool: String,
    pub generated_at: String,
    pub curves: Vec<CurveEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    pub series: String,
    pub family: GrowthFamily,
    pub model: ModelKind,
    pub params: Vec<f64>,
    pub quality: FitQuality,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
