//! Command-line parsing for the benchmark growth-curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code. Input options can also be supplied via
//! `BENCH_CURVES_*` environment variables (or a `.env` file).

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::bench::SortAlgorithm;
use crate::domain::{DEFAULT_INPUT_DIR, DEFAULT_MAX_EVALUATIONS, DEFAULT_RESAMPLE_POINTS, LogForm};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bcurves", version, about = "Benchmark growth-curve fitter")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, classify and fit a benchmark directory; print parameters and plots.
    Fit(FitArgs),
    /// Plot the measured series only (linear + log), without fitting.
    Plot(PlotArgs),
    /// Re-render a curves JSON written by `bcurves fit --export-curves`.
    Show(ShowArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying fit pipeline as `bcurves fit`, but renders
    /// the measured, log-scale and fitted charts in a terminal UI.
    Tui(TuiArgs),
    /// Time the sorting algorithms and write one CSV per series.
    Bench(BenchArgs),
}

/// Where the series come from and how they are classified.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Directory of benchmark CSVs (one file per series).
    #[arg(short, long, env = "BENCH_CURVES_DIR", default_value = DEFAULT_INPUT_DIR)]
    pub dir: PathBuf,

    /// Input-size column name (matched trimmed, case-insensitively).
    #[arg(long, env = "BENCH_CURVES_X_COLUMN", default_value = "X")]
    pub x_column: String,

    /// Timing column name (matched trimmed, case-insensitively).
    #[arg(long, env = "BENCH_CURVES_Y_COLUMN", default_value = "Y")]
    pub y_column: String,

    /// Comma-separated name substrings that mark an `n log n` series.
    #[arg(long, env = "BENCH_CURVES_LOG_KEYWORDS", value_delimiter = ',', default_value = "Quick,Std")]
    pub log_keywords: Vec<String>,

    /// Comma-separated name substrings that drop a series entirely.
    #[arg(long, env = "BENCH_CURVES_EXCLUDE", value_delimiter = ',', default_value = "Almost")]
    pub exclude: Vec<String>,
}

/// Optimizer and extrapolation options.
#[derive(Debug, Args, Clone)]
pub struct FittingArgs {
    /// Functional form used for the log-linear family.
    #[arg(long, value_enum, default_value_t = LogForm::Basic)]
    pub log_form: LogForm,

    /// Resample each series onto a uniform grid before fitting.
    #[arg(long)]
    pub resample: bool,

    /// Number of uniform points used by `--resample`.
    #[arg(long, default_value_t = DEFAULT_RESAMPLE_POINTS)]
    pub resample_points: usize,

    /// Residual-evaluation budget per series.
    #[arg(long, env = "BENCH_CURVES_MAX_EVALS", default_value_t = DEFAULT_MAX_EVALUATIONS)]
    pub max_evals: usize,

    /// Start of the extrapolation range.
    #[arg(long, default_value_t = 25_000.0)]
    pub extrapolate_min: f64,

    /// End of the extrapolation range.
    #[arg(long, default_value_t = 500_000.0)]
    pub extrapolate_max: f64,

    /// Number of points on the extrapolation grid.
    #[arg(long, default_value_t = 5_000)]
    pub extrapolate_steps: usize,
}

/// Terminal and SVG plot options.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write SVG charts into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub fitting: FittingArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Export fitted parameters to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export curves (model + params + predicted grid) to JSON.
    #[arg(long = "export-curves", value_name = "JSON")]
    pub export_curves: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub fitting: FittingArgs,
}

/// Options for re-rendering saved curves.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Curves JSON file produced by `bcurves fit --export-curves`.
    #[arg(long, value_name = "JSON")]
    pub curves: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write the chart as SVG.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for the sorting benchmarks.
#[derive(Debug, Args, Clone)]
pub struct BenchArgs {
    /// Output directory for the per-series CSVs.
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub out: PathBuf,

    /// Comma-separated algorithms to run (default: all).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub algorithms: Vec<SortAlgorithm>,

    /// Skip the almost-sorted variants.
    #[arg(long)]
    pub no_almost_sorted: bool,

    /// Exclusive upper bound of the random values.
    #[arg(long, default_value_t = 10_000)]
    pub value_max: i32,

    /// Random swaps per element for the almost-sorted inputs.
    #[arg(long, default_value_t = 0.3)]
    pub shuffle_ratio: f64,

    /// Time budget per (series, size) case, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub max_time_ms: u64,

    /// Iteration cap per (series, size) case.
    #[arg(long, default_value_t = 50_000)]
    pub max_iterations: usize,

    /// Skip input sizes above this bound.
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Seed for input generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
