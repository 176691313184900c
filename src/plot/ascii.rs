//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each layer gets the glyph of its color index. Observed layers are solid
//! polylines with the samples stamped on top; fitted layers are dashed (drawn
//! on even columns only) and go down first, underneath the measured data.

use super::context::{AxisScale, LayerStyle, PlotContext, glyph};

impl PlotContext {
    /// Flush this context into a fixed-size text plot.
    pub fn render_ascii(self, width: usize, height: usize) -> String {
        let width = width.max(10);
        let height = height.max(5);

        let Some(([x_min, x_max], [y_lo, y_hi])) = self.bounds() else {
            return format!("Plot: {} | (no drawable points)\n", self.title);
        };

        let to_axis = |y: f64| match self.y_scale {
            AxisScale::Linear => y,
            AxisScale::Log => y.log10(),
        };
        let (y_min, y_max) = pad_range(to_axis(y_lo), to_axis(y_hi), 0.05);

        let mut grid = vec![vec![' '; width]; height];

        // Fitted curves first so measured points can overlay.
        for style in [LayerStyle::Fitted, LayerStyle::Observed] {
            for layer in self.layers().iter().filter(|l| l.style == style) {
                let ch = glyph(layer.color);
                let cells: Vec<(usize, usize)> = self
                    .drawable_points(layer)
                    .map(|(x, y)| {
                        (
                            map_x(x, x_min, x_max, width),
                            map_y(to_axis(y), y_min, y_max, height),
                        )
                    })
                    .collect();
                let dashed = style == LayerStyle::Fitted;

                for pair in cells.windows(2) {
                    draw_line(&mut grid, pair[0], pair[1], ch, dashed);
                }
                if style == LayerStyle::Observed {
                    for &(x, y) in &cells {
                        grid[y][x] = ch;
                    }
                } else if let [(x, y)] = cells[..] {
                    grid[y][x] = ch;
                }
            }
        }

        let (shown_min, shown_max, suffix) = match self.y_scale {
            AxisScale::Linear => (y_min, y_max, ""),
            AxisScale::Log => (10f64.powf(y_min), 10f64.powf(y_max), " (log)"),
        };

        let mut out = String::new();
        out.push_str(&format!(
            "Plot: {} | x=[{x_min:.0}, {x_max:.0}] | y=[{shown_min:.3e}, {shown_max:.3e}]{suffix}\n",
            self.title
        ));
        for row in grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        for layer in self.layers() {
            let tag = match layer.style {
                LayerStyle::Observed => "",
                LayerStyle::Fitted => " (fit)",
            };
            out.push_str(&format!("  {} {}{tag}\n", glyph(layer.color), layer.label));
        }

        out
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char, dashed: bool) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
            && !(dashed && x0 % 2 == 1)
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let mut ctx = PlotContext::new("t", AxisScale::Linear);
        ctx.add_layer("Std", vec![(1.0, 100.0), (10.0, 110.0)], LayerStyle::Observed, 0);

        let txt = ctx.render_ascii(10, 5);
        let expected = concat!(
            "Plot: t | x=[1, 10] | y=[9.950e1, 1.105e2]\n",
            "        **\n",
            "      **  \n",
            "    **    \n",
            "  **      \n",
            "**        \n",
            "  * Std\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn fitted_layer_is_dashed_and_under_observed() {
        let mut ctx = PlotContext::new("t", AxisScale::Linear);
        ctx.add_layer("Quick", vec![(0.0, 1.0), (9.0, 1.0)], LayerStyle::Fitted, 1);
        ctx.add_layer("Quick", vec![(0.0, 1.0), (9.0, 1.0)], LayerStyle::Observed, 0);
        ctx.add_layer("Bubble", vec![(0.0, 0.0), (9.0, 0.0)], LayerStyle::Fitted, 1);

        let txt = ctx.render_ascii(10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        // Measured line fills the gaps the dashes left; samples sit on the ends.
        assert_eq!(rows[1], "**o*o*o*o*");
        assert_eq!(rows[5], "o o o o o ");
        assert_eq!(rows[6], "  o Quick (fit)");
    }

    #[test]
    fn log_view_drops_non_positive_points() {
        let mut ctx = PlotContext::new("log", AxisScale::Log);
        ctx.add_layer("Bubble", vec![(1.0, 0.0), (2.0, 10.0), (3.0, 1000.0)], LayerStyle::Observed, 0);
        let txt = ctx.render_ascii(10, 5);
        let header = txt.lines().next().unwrap();
        assert!(header.starts_with("Plot: log | x=[2, 3]"), "{header}");
        assert!(header.ends_with("(log)"), "{header}");
        let rows: Vec<&str> = txt.lines().skip(1).take(5).collect();
        assert_eq!(rows[0].chars().last(), Some('*'));
        assert_eq!(rows[4].chars().next(), Some('*'));
    }

    #[test]
    fn empty_context_renders_placeholder() {
        let ctx = PlotContext::new("empty", AxisScale::Log);
        assert_eq!(ctx.render_ascii(10, 5), "Plot: empty | (no drawable points)\n");
    }
}
