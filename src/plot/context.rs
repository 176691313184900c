//! Explicit plot state.
//!
//! A [`PlotContext`] collects everything one chart needs (title, y-axis scale,
//! layers). It is created before the first series is drawn and flushed exactly
//! once by a renderer (`render_ascii`, `write_svg`, or the TUI widget), which
//! consumes or borrows it; nothing about a chart lives in global state.

use crate::domain::{CurvesFile, FitResult, Series};
use crate::models::predict_curve;

/// Deterministic per-series palette (RGB), indexed by series order.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (188, 189, 34),
    (23, 190, 207),
    (127, 127, 127),
];

/// Per-series glyphs for text plots, parallel to [`PALETTE`].
pub const GLYPHS: [char; 10] = ['*', 'o', '+', 'x', '#', '@', '%', '&', '=', '~'];

pub fn palette_color(idx: usize) -> (u8, u8, u8) {
    PALETTE[idx % PALETTE.len()]
}

pub fn glyph(idx: usize) -> char {
    GLYPHS[idx % GLYPHS.len()]
}

/// Y-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// How a layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStyle {
    /// Measured samples: solid line through the points.
    Observed,
    /// Model prediction: dashed line.
    Fitted,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: LayerStyle,
    /// Index into [`PALETTE`] / [`GLYPHS`].
    pub color: usize,
}

#[derive(Debug, Clone)]
pub struct PlotContext {
    pub title: String,
    pub y_scale: AxisScale,
    pub x_label: String,
    pub y_label: String,
    layers: Vec<Layer>,
}

impl PlotContext {
    pub fn new(title: impl Into<String>, y_scale: AxisScale) -> Self {
        Self {
            title: title.into(),
            y_scale,
            x_label: "n".to_string(),
            y_label: "time (ns)".to_string(),
            layers: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, label: impl Into<String>, points: Vec<(f64, f64)>, style: LayerStyle, color: usize) {
        self.layers.push(Layer {
            label: label.into(),
            points,
            style,
            color,
        });
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.points.is_empty())
    }

    /// Points of a layer that can be drawn on this context's axes.
    ///
    /// Non-finite points are dropped; on a log axis non-positive `y` is too.
    pub fn drawable_points<'a>(&self, layer: &'a Layer) -> impl Iterator<Item = (f64, f64)> + 'a {
        let log = self.y_scale == AxisScale::Log;
        layer
            .points
            .iter()
            .copied()
            .filter(move |&(x, y)| x.is_finite() && y.is_finite() && (!log || y > 0.0))
    }

    /// Data bounds `([x_min, x_max], [y_min, y_max])` over all drawable points.
    ///
    /// Degenerate spans are widened so renderers always get `max > min`.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];
        for layer in &self.layers {
            for (px, py) in self.drawable_points(layer) {
                x = [x[0].min(px), x[1].max(px)];
                y = [y[0].min(py), y[1].max(py)];
            }
        }
        if !(x[0].is_finite() && y[0].is_finite()) {
            return None;
        }
        if x[1] <= x[0] {
            x = [x[0] - 0.5, x[1] + 0.5];
        }
        if y[1] <= y[0] {
            y = match self.y_scale {
                AxisScale::Linear => [y[0] - 0.5, y[1] + 0.5],
                AxisScale::Log => [y[0] / 2.0, y[1] * 2.0],
            };
        }
        Some((x, y))
    }
}

/// Overlay of the measured series (one solid layer per series).
pub fn observed_view(series: &[Series], y_scale: AxisScale) -> PlotContext {
    let title = match y_scale {
        AxisScale::Linear => "Measured",
        AxisScale::Log => "Measured (log scale)",
    };
    let mut ctx = PlotContext::new(title, y_scale);
    for (idx, s) in series.iter().enumerate() {
        ctx.add_layer(s.name.clone(), s.points(), LayerStyle::Observed, idx);
    }
    ctx
}

/// Measured series plus their fitted curves over `grid`.
///
/// A fitted curve shares the color of its series; series without a fit are
/// drawn as measured only.
pub fn fitted_view(series: &[Series], fits: &[FitResult], grid: &[f64]) -> PlotContext {
    let mut ctx = PlotContext::new("Fitted growth curves", AxisScale::Linear);
    for (idx, s) in series.iter().enumerate() {
        ctx.add_layer(s.name.clone(), s.points(), LayerStyle::Observed, idx);
        if let Some(fit) = fits.iter().find(|f| f.series == s.name) {
            ctx.add_layer(s.name.clone(), predict_curve(fit, grid), LayerStyle::Fitted, idx);
        }
    }
    ctx
}

/// Saved curves (no measured data), one dashed layer per curve.
pub fn curves_view(curves: &CurvesFile) -> PlotContext {
    let mut ctx = PlotContext::new(format!("Saved curves ({})", curves.generated_at), AxisScale::Linear);
    for (idx, c) in curves.curves.iter().enumerate() {
        let points = c.grid.x.iter().copied().zip(c.grid.y.iter().copied()).collect();
        ctx.add_layer(c.series.clone(), points, LayerStyle::Fitted, idx);
    }
    ctx
}
