//! `bench-curves` library crate.
//!
//! The binary (`bcurves`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitter, renderers and benchmark harness can be driven separately
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod bench;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
