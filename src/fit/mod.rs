//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - classify series into growth families by name
//! - fit each series with its family's model (parallel across series)
//! - build the extrapolation grid predictions are evaluated on

pub mod classify;
pub mod fitter;
pub mod grid;

pub use classify::*;
pub use fitter::*;
pub use grid::*;
