//! Plotters rendering of a [`PlotContext`].
//!
//! [`draw_chart`] is backend-generic: the SVG writer below and the TUI widget
//! both flush through it, so file output and the terminal show the same chart.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::context::{AxisScale, LayerStyle, PlotContext, fitted_view, observed_view, palette_color};
use crate::domain::{FitResult, Series};
use crate::error::FitError;

/// Backend-specific styling.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub foreground: RGBColor,
    pub background: Option<RGBColor>,
    pub caption: bool,
    pub legend: bool,
    pub mesh: bool,
    pub margin: u32,
    pub label_area_left: u32,
    pub label_area_bottom: u32,
    pub font_size: u32,
}

impl ChartStyle {
    /// Light background, caption and legend.
    pub const FILE: ChartStyle = ChartStyle {
        foreground: BLACK,
        background: Some(WHITE),
        caption: true,
        legend: true,
        mesh: true,
        margin: 20,
        label_area_left: 80,
        label_area_bottom: 45,
        font_size: 14,
    };

    /// Terminal cells are low-res: compact label areas, no mesh lines.
    pub const TERMINAL: ChartStyle = ChartStyle {
        foreground: WHITE,
        background: None,
        caption: false,
        legend: false,
        mesh: false,
        margin: 1,
        label_area_left: 8,
        label_area_bottom: 3,
        font_size: 10,
    };
}

/// Draw `ctx` onto `root`. An empty context only fills the background.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ctx: &PlotContext,
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if let Some(bg) = style.background {
        root.fill(&bg)?;
    }
    let Some(([x0, x1], [y0, y1])) = ctx.bounds() else {
        return Ok(());
    };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(style.margin)
        .set_label_area_size(LabelAreaPosition::Left, style.label_area_left)
        .set_label_area_size(LabelAreaPosition::Bottom, style.label_area_bottom);
    if style.caption {
        builder.caption(
            &ctx.title,
            ("sans-serif", style.font_size + 6).into_font().color(&style.foreground),
        );
    }

    match ctx.y_scale {
        AxisScale::Linear => {
            let chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;
            draw_layers(chart, ctx, style)
        }
        AxisScale::Log => {
            let chart = builder.build_cartesian_2d(x0..x1, (y0..y1).log_scale())?;
            draw_layers(chart, ctx, style)
        }
    }
}

fn draw_layers<'a, DB, Y>(
    mut chart: ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    ctx: &PlotContext,
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let fmt = |v: &f64| fmt_tick(*v);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(ctx.x_label.clone())
        .y_desc(ctx.y_label.clone())
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&fmt)
        .y_label_formatter(&fmt)
        .label_style(("sans-serif", style.font_size).into_font().color(&style.foreground))
        .axis_style(style.foreground);
    if !style.mesh {
        mesh.disable_x_mesh().disable_y_mesh();
    }
    mesh.draw()?;

    for layer in ctx.layers() {
        let (r, g, b) = palette_color(layer.color);
        let color = RGBColor(r, g, b);
        let points: Vec<(f64, f64)> = ctx.drawable_points(layer).collect();

        let anno = match layer.style {
            LayerStyle::Observed => chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?,
            LayerStyle::Fitted => chart.draw_series(DashedLineSeries::new(points, 6, 4, color.stroke_width(1)))?,
        };
        if style.legend {
            let label = match layer.style {
                LayerStyle::Observed => layer.label.clone(),
                LayerStyle::Fitted => format!("{} (fit)", layer.label),
            };
            anno.label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        }
    }

    if style.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(style.foreground)
            .label_font(("sans-serif", style.font_size).into_font().color(&style.foreground))
            .draw()?;
    }

    Ok(())
}

/// Compact tick label for nanosecond-scale values.
pub fn fmt_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e5 || (a > 0.0 && a < 1e-2) {
        format!("{v:.1e}")
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

impl PlotContext {
    /// Flush this context to an SVG file.
    pub fn write_svg(self, path: &Path, size: (u32, u32)) -> Result<(), FitError> {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_chart(&root, &self, &ChartStyle::FILE)
            .map_err(|e| FitError::io(format!("Failed to draw '{}': {e}", path.display())))?;
        root.present()
            .map_err(|e| FitError::io(format!("Failed to write '{}': {e}", path.display())))?;
        Ok(())
    }
}

/// Write the three standard views (`linear.svg`, `log.svg`, `fitted.svg`) into `dir`.
pub fn write_svg_views(
    dir: &Path,
    series: &[Series],
    fits: &[FitResult],
    grid: &[f64],
    size: (u32, u32),
) -> Result<Vec<PathBuf>, FitError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| FitError::io(format!("Failed to create plot directory '{}': {e}", dir.display())))?;

    let views = [
        ("linear.svg", observed_view(series, AxisScale::Linear)),
        ("log.svg", observed_view(series, AxisScale::Log)),
        ("fitted.svg", fitted_view(series, fits, grid)),
    ];

    let mut written = Vec::with_capacity(views.len());
    for (file, ctx) in views {
        let path = dir.join(file);
        ctx.write_svg(&path, size)?;
        tracing::info!(path = %path.display(), "wrote plot");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, GrowthFamily, ModelKind, Sample};
    use tempfile::tempdir;

    #[test]
    fn tick_labels_stay_short() {
        assert_eq!(fmt_tick(250000.0), "2.5e5");
        assert_eq!(fmt_tick(1234.4), "1234");
        assert_eq!(fmt_tick(1.5), "1.50");
        assert_eq!(fmt_tick(0.0), "0.00");
    }

    #[test]
    fn writes_all_three_views() {
        let dir = tempdir().unwrap();
        let series = vec![Series::new(
            "Bubble",
            GrowthFamily::Quadratic,
            (1..=10).map(|i| Sample::new(i as f64 * 100.0, (i * i) as f64)).collect(),
        )];

        let fit = FitResult {
            series: "Bubble".to_string(),
            model: ModelKind::Quadratic,
            params: vec![1e-4, 0.0, 0.0],
            quality: FitQuality {
                sse: 0.0,
                rmse: 0.0,
                n: 10,
                evaluations: 3,
                resampled: false,
            },
        };
        let grid = [500.0, 1000.0, 1500.0, 2000.0];

        let written = write_svg_views(dir.path(), &series, &[fit], &grid, (400, 300)).unwrap();
        assert_eq!(written.len(), 3);
        for path in &written {
            let body = std::fs::read_to_string(path).unwrap();
            assert!(body.contains("<svg"), "{}", path.display());
        }
        let fitted = std::fs::read_to_string(&written[2]).unwrap();
        assert!(fitted.contains("Bubble (fit)"));
    }
}
