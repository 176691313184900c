//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the fit pipeline (or the plot/show/tui/bench front-ends)
//! - prints reports/plots
//! - writes optional exports

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bench::{BenchConfig, SortAlgorithm, run_benchmarks};
use crate::cli::{BenchArgs, Cli, Command, FitArgs, FittingArgs, InputArgs, PlotArgs, ShowArgs, TuiArgs, ViewArgs};
use crate::domain::FitConfig;
use crate::error::AppError;
use crate::plot::{AxisScale, curves_view, fitted_view, observed_view, write_svg_views};

pub mod pipeline;

/// SVG canvas size in pixels.
const SVG_SIZE: (u32, u32) = (1280, 800);

/// Entry point for the `bcurves` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the common case.
    let _ = dotenvy::dotenv();

    // `bcurves` and `bcurves --dir D` behave like `bcurves fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => handle_tui(args),
        Command::Bench(args) => handle_bench(args),
    }
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;
    let series = &run.loaded.series;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.loaded, &run.batch, &config)
    );

    if config.plot {
        let (w, h) = (config.plot_width, config.plot_height);
        println!("{}", observed_view(series, AxisScale::Linear).render_ascii(w, h));
        println!("{}", observed_view(series, AxisScale::Log).render_ascii(w, h));
        println!("{}", fitted_view(series, &run.batch.fits, &run.grid).render_ascii(w, h));
    }

    // Optional exports.
    if let Some(dir) = &config.svg_dir {
        write_svg_views(dir, series, &run.batch.fits, &run.grid, SVG_SIZE)?;
    }
    if let Some(path) = &config.export_params {
        crate::io::write_params_csv(path, &run.batch.fits)?;
        info!(path = %path.display(), "wrote parameter export");
    }
    if let Some(path) = &config.export_curves {
        crate::io::write_curves_json(path, &run.batch.fits, &run.grid)?;
        info!(path = %path.display(), "wrote curves export");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let mut config = input_config(&args.input);
    apply_view(&mut config, &args.view);

    let loaded = crate::io::load_series_dir(&config)?;
    println!("{}", crate::report::format_series_table(&loaded.series));

    if config.plot {
        let (w, h) = (config.plot_width, config.plot_height);
        println!("{}", observed_view(&loaded.series, AxisScale::Linear).render_ascii(w, h));
        println!("{}", observed_view(&loaded.series, AxisScale::Log).render_ascii(w, h));
    }

    if let Some(dir) = &config.svg_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create plot directory '{}': {e}", dir.display())))?;
        observed_view(&loaded.series, AxisScale::Linear).write_svg(&dir.join("linear.svg"), SVG_SIZE)?;
        observed_view(&loaded.series, AxisScale::Log).write_svg(&dir.join("log.svg"), SVG_SIZE)?;
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let curves = crate::io::read_curves_json(&args.curves)?;

    for c in &curves.curves {
        let params: Vec<String> = c
            .model
            .param_names()
            .iter()
            .zip(&c.params)
            .map(|(n, v)| format!("{n}={v:.6e}"))
            .collect();
        println!(
            "{:<26} {:<10} {}  RMSE={:.4e}",
            c.series,
            c.family.display_name(),
            params.join(", "),
            c.quality.rmse
        );
    }
    println!();
    println!("{}", curves_view(&curves).render_ascii(args.width, args.height));

    if let Some(path) = &args.svg {
        curves_view(&curves).write_svg(path, SVG_SIZE)?;
    }
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let mut config = input_config(&args.input);
    apply_fitting(&mut config, &args.fitting);
    crate::tui::run(config)
}

fn handle_bench(args: BenchArgs) -> Result<(), AppError> {
    let config = bench_config_from_args(&args);
    let report = run_benchmarks(&config)?;
    println!(
        "Wrote {} series ({} measurements) to {}",
        report.files.len(),
        report.measurements,
        config.out_dir.display()
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let mut config = input_config(&args.input);
    apply_fitting(&mut config, &args.fitting);
    apply_view(&mut config, &args.view);
    config.export_params = args.export.clone();
    config.export_curves = args.export_curves.clone();
    config
}

fn input_config(args: &InputArgs) -> FitConfig {
    FitConfig {
        input_dir: args.dir.clone(),
        x_column: args.x_column.clone(),
        y_column: args.y_column.clone(),
        log_keywords: args.log_keywords.clone(),
        exclude_markers: args.exclude.clone(),
        ..FitConfig::default()
    }
}

fn apply_fitting(config: &mut FitConfig, args: &FittingArgs) {
    config.log_form = args.log_form;
    config.resample = args.resample;
    config.resample_points = args.resample_points;
    config.max_evaluations = args.max_evals;
    config.extrapolate_min = args.extrapolate_min;
    config.extrapolate_max = args.extrapolate_max;
    config.extrapolate_steps = args.extrapolate_steps;
}

fn apply_view(config: &mut FitConfig, args: &ViewArgs) {
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.svg_dir = args.svg_dir.clone();
}

pub fn bench_config_from_args(args: &BenchArgs) -> BenchConfig {
    let algorithms = if args.algorithms.is_empty() {
        SortAlgorithm::ALL.to_vec()
    } else {
        args.algorithms.clone()
    };
    BenchConfig {
        out_dir: args.out.clone(),
        algorithms,
        almost_sorted: !args.no_almost_sorted,
        value_max: args.value_max,
        shuffle_ratio: args.shuffle_ratio,
        max_time: Duration::from_millis(args.max_time_ms),
        max_iterations: args.max_iterations,
        max_size: args.max_size,
        seed: args.seed,
    }
}

/// Rewrite argv so `bcurves` defaults to `bcurves fit`.
///
/// Rules:
/// - `bcurves`                      -> `bcurves fit`
/// - `bcurves --dir D ...`          -> `bcurves fit --dir D ...`
/// - `bcurves --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "show" | "tui" | "bench");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
