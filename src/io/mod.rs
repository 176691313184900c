//! Input/output helpers.
//!
//! - CSV directory ingest + classification (`ingest`)
//! - fitted parameter export (CSV) (`export`)
//! - curves JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
