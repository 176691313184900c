//! Plotters-powered growth chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - a real log-scale y axis
//! - dashed fitted curves
//! - the exact drawing code used for SVG export
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartStyle, PlotContext, draw_chart};

/// Render-only view of a prepared [`PlotContext`].
pub struct GrowthChart<'a> {
    pub ctx: &'a PlotContext,
}

impl Widget for GrowthChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.ctx.bounds().is_none() {
            buf.set_string(
                area.x,
                area.y,
                "No drawable points in this view.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let ctx = self.ctx;
        let widget = widget_fn(move |root| {
            draw_chart(&root, ctx, &ChartStyle::TERMINAL)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
