//! Ratatui-based terminal UI.
//!
//! The TUI loads and fits a benchmark directory once, then lets the user cycle
//! through the measured (linear), measured (log) and fitted views. Series
//! colors match the SVG output.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
};

use crate::app::pipeline::{RunOutput, run_fit};
use crate::domain::{FitConfig, LogForm};
use crate::error::AppError;
use crate::plot::{AxisScale, PlotContext, fitted_view, glyph, observed_view, palette_color};

mod plotters_chart;

use plotters_chart::GrowthChart;

/// Start the TUI.
pub fn run(config: FitConfig) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(2, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(2, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(2, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which chart is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Linear,
    Log,
    Fitted,
}

impl View {
    const ALL: [View; 3] = [View::Linear, View::Log, View::Fitted];

    fn title(self) -> &'static str {
        match self {
            View::Linear => "Linear",
            View::Log => "Log",
            View::Fitted => "Fitted",
        }
    }

    fn index(self) -> usize {
        match self {
            View::Linear => 0,
            View::Log => 1,
            View::Fitted => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

struct App {
    config: FitConfig,
    view: View,
    status: String,
    run: RunOutput,
}

impl App {
    fn new(config: FitConfig) -> Result<Self, AppError> {
        let run = run_fit(&config)?;
        let status = format!("Loaded {} series.", run.loaded.series.len());
        Ok(Self {
            config,
            view: View::Linear,
            status,
            run,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(2, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(2, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(2, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.view = self.view.next(),
            KeyCode::BackTab | KeyCode::Left => self.view = self.view.prev(),
            KeyCode::Char('1') => self.view = View::Linear,
            KeyCode::Char('2') => self.view = View::Log,
            KeyCode::Char('3') => self.view = View::Fitted,
            KeyCode::Char('r') => self.reload("Reloaded"),
            KeyCode::Char('f') => {
                self.config.log_form = match self.config.log_form {
                    LogForm::Basic => LogForm::Ratio,
                    LogForm::Ratio => LogForm::Basic,
                };
                self.reload("Log form switched");
            }
            _ => {}
        }
        false
    }

    /// Re-read the directory and refit; keeps the previous run on failure.
    fn reload(&mut self, what: &str) {
        match run_fit(&self.config) {
            Ok(run) => {
                self.status = format!(
                    "{what}: {} series, {} fitted, {} failed.",
                    run.loaded.series.len(),
                    run.batch.fits.len(),
                    run.batch.failures.len()
                );
                self.run = run;
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn plot_context(&self) -> PlotContext {
        let series = &self.run.loaded.series;
        match self.view {
            View::Linear => observed_view(series, AxisScale::Linear),
            View::Log => observed_view(series, AxisScale::Log),
            View::Fitted => fitted_view(series, &self.run.batch.fits, &self.run.grid),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let info = Line::from(vec![
            Span::styled("bcurves", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " | dir: {} | series: {} | excluded: {} | log form: {:?}",
                self.config.input_dir.display(),
                self.run.loaded.series.len(),
                self.run.loaded.excluded.len(),
                self.config.log_form,
            )),
        ]);
        frame.render_widget(Paragraph::new(info), rows[0]);

        let tabs = Tabs::new(View::ALL.iter().map(|v| v.title()))
            .select(self.view.index())
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, rows[1]);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(44)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_legend(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ctx = self.plot_context();
        let block = Block::default().title(ctx.title.clone()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        frame.render_widget(GrowthChart { ctx: &ctx }, inner);
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        for (idx, s) in self.run.loaded.series.iter().enumerate() {
            let (r, g, b) = palette_color(idx);
            let color = Style::default().fg(Color::Rgb(r, g, b));
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} {}", glyph(idx), s.name), color.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {} n={}", s.family.display_name(), s.len()),
                    Style::default().fg(Color::Gray),
                ),
            ])];

            if let Some(fit) = self.run.batch.fits.iter().find(|f| f.series == s.name) {
                let params: Vec<String> = fit
                    .model
                    .param_names()
                    .iter()
                    .zip(&fit.params)
                    .map(|(n, v)| format!("{n}={v:.3e}"))
                    .collect();
                lines.push(Line::from(Span::raw(format!("  {}", params.join(" ")))));
                lines.push(Line::from(Span::styled(
                    format!("  rmse={:.3e} evals={}", fit.quality.rmse, fit.quality.evaluations),
                    Style::default().fg(Color::Gray),
                )));
            } else if let Some((_, err)) = self.run.batch.failures.iter().find(|(n, _)| n == &s.name) {
                lines.push(Line::from(Span::styled(
                    format!("  {err}"),
                    Style::default().fg(Color::Red),
                )));
            }
            items.push(ListItem::new(Text::from(lines)));
        }

        let list = List::new(items).block(Block::default().title("Series").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "tab/←/→ view  1-3 jump  r reload  f log form  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cycle_both_ways() {
        assert_eq!(View::Linear.next(), View::Log);
        assert_eq!(View::Fitted.next(), View::Linear);
        assert_eq!(View::Linear.prev(), View::Fitted);
        for v in View::ALL {
            assert_eq!(v.next().prev(), v);
        }
    }
}
