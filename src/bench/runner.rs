//! Benchmark harness: generate inputs, time sorts, write one CSV per series.
//!
//! Each case repeats (fresh input, timed sort) until the accumulated sort time
//! reaches `max_time` or `max_iterations` runs were made. Input generation is
//! not timed. The reported `Y` is the mean wall time per sort in nanoseconds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::sorts::SortAlgorithm;
use crate::error::{AppError, FitError};

/// Representative sizes shared by every case.
const STRIDES: [usize; 18] = [
    100, 200, 300, 1_000, 2_000, 3_000, 5_000, 10_000, 11_000, 12_000, 13_000, 15_000, 20_000, 21_000,
    25_000, 30_000, 31_000, 32_000,
];
const STRIDES_LONG: [usize; 6] = [50_000, 60_000, 70_000, 80_000, 90_000, 100_000];

/// How the unsorted input of a case is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Uniform values in `[0, value_max)`.
    Random,
    /// Sorted random values with `len * shuffle_ratio` random swaps.
    AlmostSorted,
}

/// One output series: an algorithm, an input kind and the sizes to time.
#[derive(Debug, Clone)]
pub struct BenchCase {
    pub series: String,
    pub algorithm: SortAlgorithm,
    pub input: InputKind,
    pub sizes: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub out_dir: PathBuf,
    pub algorithms: Vec<SortAlgorithm>,
    /// Also run the almost-sorted cases of the quadratic sorts.
    pub almost_sorted: bool,
    pub value_max: i32,
    pub shuffle_ratio: f64,
    pub max_time: Duration,
    pub max_iterations: usize,
    /// Skip sizes above this bound.
    pub max_size: Option<usize>,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(crate::domain::DEFAULT_INPUT_DIR),
            algorithms: SortAlgorithm::ALL.to_vec(),
            almost_sorted: true,
            value_max: 10_000,
            shuffle_ratio: 0.3,
            max_time: Duration::from_millis(500),
            max_iterations: 50_000,
            max_size: None,
            seed: 42,
        }
    }
}

/// Timing of one (case, size) pair.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub size: usize,
    pub iterations: usize,
    pub total: Duration,
    pub mean_ns: f64,
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub files: Vec<PathBuf>,
    pub measurements: usize,
}

/// The standard case list for the selected algorithms.
///
/// The `n log n` sorts get the long size ranges; the quadratic ones stop at
/// the short strides (plus tiny sizes for insertion sort, where it shines).
pub fn standard_cases(algorithms: &[SortAlgorithm], almost_sorted: bool, max_size: Option<usize>) -> Vec<BenchCase> {
    let wide: Vec<usize> = (100_000..300_000).step_by(5_000).collect();
    let tiny: Vec<usize> = (2..100).collect();

    let mut cases = Vec::new();
    for &algorithm in algorithms {
        let name = algorithm.series_name();
        let (random, almost): (Vec<&[usize]>, Option<Vec<&[usize]>>) = match algorithm {
            SortAlgorithm::Std | SortAlgorithm::Quick => {
                (vec![&STRIDES[..], &STRIDES_LONG[..], &wide[..], &tiny[..]], None)
            }
            SortAlgorithm::BetterQuick => (vec![&STRIDES[..], &wide[..]], None),
            SortAlgorithm::Bubble | SortAlgorithm::Selection => (vec![&STRIDES[..]], Some(vec![&STRIDES[..]])),
            SortAlgorithm::Insertion => (
                vec![&STRIDES[..], &STRIDES_LONG[..], &tiny[..]],
                Some(vec![&STRIDES[..], &STRIDES_LONG[..]]),
            ),
        };

        cases.push(BenchCase {
            series: name.to_string(),
            algorithm,
            input: InputKind::Random,
            sizes: size_plan(&random, max_size),
        });
        if let (true, Some(almost)) = (almost_sorted, almost) {
            cases.push(BenchCase {
                series: format!("{name} Almost Sorted"),
                algorithm,
                input: InputKind::AlmostSorted,
                sizes: size_plan(&almost, max_size),
            });
        }
    }
    cases.retain(|c| !c.sizes.is_empty());
    cases
}

fn size_plan(groups: &[&[usize]], max_size: Option<usize>) -> Vec<usize> {
    let mut sizes: Vec<usize> = groups
        .iter()
        .flat_map(|g| g.iter().copied())
        .filter(|&s| max_size.is_none_or(|m| s <= m))
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// Build one input vector.
pub fn generate_input(rng: &mut StdRng, size: usize, kind: InputKind, value_max: i32, shuffle_ratio: f64) -> Vec<i32> {
    let mut data: Vec<i32> = (0..size).map(|_| rng.gen_range(0..value_max)).collect();
    if kind == InputKind::AlmostSorted {
        data.sort_unstable();
        if size > 0 {
            let swaps = (size as f64 * shuffle_ratio) as usize;
            for _ in 0..swaps {
                let a = rng.gen_range(0..size);
                let b = rng.gen_range(0..size);
                data.swap(a, b);
            }
        }
    }
    data
}

/// Sanity check every algorithm against `sort_unstable` before timing anything.
pub fn verify_algorithms(algorithms: &[SortAlgorithm], rng: &mut StdRng) -> Result<(), AppError> {
    let data: Vec<i32> = (0..1_000).map(|_| rng.gen_range(0..1_000)).collect();
    let mut expected = data.clone();
    expected.sort_unstable();

    for &algorithm in algorithms {
        let mut v = data.clone();
        algorithm.sort(&mut v);
        if v != expected {
            return Err(AppError::new(
                4,
                format!("{} sort produced unsorted output.", algorithm.series_name()),
            ));
        }
    }
    debug!(algorithms = algorithms.len(), "sort verification passed");
    Ok(())
}

/// Time one case at one size.
pub fn measure(algorithm: SortAlgorithm, size: usize, kind: InputKind, config: &BenchConfig, rng: &mut StdRng) -> Measurement {
    let mut total = Duration::ZERO;
    let mut iterations = 0usize;
    loop {
        let mut data = generate_input(rng, size, kind, config.value_max, config.shuffle_ratio);
        let start = Instant::now();
        algorithm.sort(&mut data);
        total += start.elapsed();
        std::hint::black_box(&data);
        iterations += 1;

        if total >= config.max_time || iterations >= config.max_iterations {
            break;
        }
    }

    Measurement {
        size,
        iterations,
        total,
        mean_ns: total.as_nanos() as f64 / iterations as f64,
    }
}

/// Run every standard case and write `<out_dir>/<series>.csv`.
pub fn run_benchmarks(config: &BenchConfig) -> Result<BenchReport, AppError> {
    if config.value_max <= 0 {
        return Err(FitError::malformed("value_max must be > 0.").into());
    }
    if !(config.shuffle_ratio.is_finite() && config.shuffle_ratio >= 0.0) {
        return Err(FitError::malformed("shuffle_ratio must be >= 0.").into());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    verify_algorithms(&config.algorithms, &mut rng)?;

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        FitError::io(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let mut registry: BTreeMap<String, Vec<(usize, f64)>> = BTreeMap::new();
    let mut measurements = 0;
    for case in standard_cases(&config.algorithms, config.almost_sorted, config.max_size) {
        for &size in &case.sizes {
            let m = measure(case.algorithm, size, case.input, config, &mut rng);
            info!(
                series = %case.series,
                size = m.size,
                iterations = m.iterations,
                total_ms = m.total.as_secs_f64() * 1e3,
                mean_ns = m.mean_ns,
                "benchmark case"
            );
            registry.entry(case.series.clone()).or_default().push((size, m.mean_ns));
            measurements += 1;
        }
    }

    let mut files = Vec::with_capacity(registry.len());
    for (series, mut rows) in registry {
        let path = config.out_dir.join(format!("{series}.csv"));
        rows.sort_by_key(|&(x, _)| x);
        write_series_csv(&path, &rows)?;
        files.push(path);
    }

    Ok(BenchReport { files, measurements })
}

/// Write an `X,Y` CSV in the loader's input format.
pub fn write_series_csv(path: &Path, rows: &[(usize, f64)]) -> Result<(), FitError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| FitError::io(format!("Failed to create '{}': {e}", path.display())))?;
    writer
        .write_record(["X", "Y"])
        .map_err(|e| FitError::io(format!("Failed to write '{}': {e}", path.display())))?;
    for (x, y) in rows {
        writer
            .write_record([x.to_string(), y.to_string()])
            .map_err(|e| FitError::io(format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| FitError::io(format!("Failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_series_file;
    use tempfile::tempdir;

    #[test]
    fn case_plan_follows_growth_class() {
        let cases = standard_cases(&SortAlgorithm::ALL, true, None);
        let names: Vec<&str> = cases.iter().map(|c| c.series.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Std",
                "Quick",
                "Better Quick",
                "Bubble",
                "Bubble Almost Sorted",
                "Selection",
                "Selection Almost Sorted",
                "Insertion",
                "Insertion Almost Sorted",
            ]
        );

        let std = &cases[0];
        assert_eq!(std.sizes.first(), Some(&2));
        assert_eq!(std.sizes.last(), Some(&295_000));
        // 100_000 appears in two groups but only once in the plan.
        assert_eq!(std.sizes.iter().filter(|&&s| s == 100_000).count(), 1);

        let bubble = &cases[3];
        assert_eq!(bubble.sizes, STRIDES.to_vec());
    }

    #[test]
    fn max_size_trims_and_drops_empty_cases() {
        let cases = standard_cases(&[SortAlgorithm::BetterQuick, SortAlgorithm::Insertion], false, Some(50));
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].series, "Insertion");
        assert_eq!(cases[0].sizes, (2..=50).collect::<Vec<_>>());
    }

    #[test]
    fn almost_sorted_input_is_a_permutation_of_sorted_values() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = generate_input(&mut rng, 200, InputKind::AlmostSorted, 50, 0.3);
        assert_eq!(data.len(), 200);
        assert!(data.iter().all(|&v| (0..50).contains(&v)));

        let mut rng = StdRng::seed_from_u64(1);
        let none = generate_input(&mut rng, 200, InputKind::AlmostSorted, 50, 0.0);
        assert!(none.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn measure_runs_at_least_once() {
        let config = BenchConfig {
            max_time: Duration::ZERO,
            ..BenchConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let m = measure(SortAlgorithm::Std, 10, InputKind::Random, &config, &mut rng);
        assert_eq!(m.iterations, 1);
        assert!(m.mean_ns >= 0.0);
    }

    #[test]
    fn writes_loader_compatible_csvs() {
        let dir = tempdir().unwrap();
        let config = BenchConfig {
            out_dir: dir.path().to_path_buf(),
            algorithms: vec![SortAlgorithm::Insertion, SortAlgorithm::Std],
            max_time: Duration::from_millis(1),
            max_iterations: 2,
            max_size: Some(300),
            ..BenchConfig::default()
        };

        let report = run_benchmarks(&config).unwrap();
        let names: Vec<String> = report
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Insertion.csv", "Insertion Almost Sorted.csv", "Std.csv"]);
        assert_eq!(report.measurements, 3 + 101 + 101);

        let samples = read_series_file(&dir.path().join("Std.csv"), "X", "Y").unwrap();
        assert_eq!(samples.len(), 101);
        assert_eq!(samples[0].x, 2.0);
        assert_eq!(samples[100].x, 300.0);
        assert!(samples.windows(2).all(|w| w[0].x < w[1].x));
    }
}
