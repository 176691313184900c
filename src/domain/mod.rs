//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - benchmark observations (`Sample`, `Series`)
//! - growth families and concrete model kinds (`GrowthFamily`, `ModelKind`, `LogForm`)
//! - fit outputs (`FitResult`, `FitQuality`, `CurvesFile`)
//! - the resolved run configuration (`FitConfig`)

pub mod types;

pub use types::*;
