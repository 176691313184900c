//! Plotting: an explicit [`PlotContext`] plus its renderers.
//!
//! - `context`: chart state and the standard views (measured, log, fitted)
//! - `ascii`: fixed-size text rendering
//! - `svg`: plotters rendering (SVG files, reused by the TUI)

pub mod ascii;
pub mod context;
pub mod svg;

pub use context::*;
pub use svg::{ChartStyle, draw_chart, fmt_tick, write_svg_views};
