//! Sorting benchmark generator.
//!
//! Produces the CSV directory the fitter consumes: one `X,Y` file per series
//! (input size, mean nanoseconds per sort).

pub mod runner;
pub mod sorts;

pub use runner::{BenchCase, BenchConfig, BenchReport, InputKind, Measurement, run_benchmarks, standard_cases};
pub use sorts::SortAlgorithm;
