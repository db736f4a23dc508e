//! Ratatui-based terminal UI.
//!
//! The TUI mirrors the original page layout: one tab per dashboard view and a
//! year multiselect (space toggles a year; clearing the selection shows every
//! year). Charts render the same `ChartSpec`s the JSON export writes.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_dashboard};
use crate::chart::primary_indicators;
use crate::cli::RunArgs;
use crate::data::cache::DataCache;
use crate::domain::{ChartSpec, RunConfig, View};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::TradePlottersChart;

/// Start the TUI.
pub fn run(args: RunArgs) -> Result<(), AppError> {
    let config = crate::app::run_config_from_args(&args);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    config: RunConfig,
    cache: DataCache,
    view: View,
    year_cursor: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: RunConfig) -> Result<Self, AppError> {
        let mut app = Self {
            config,
            cache: DataCache::new(),
            view: View::VendasVsExportacoes,
            year_cursor: 0,
            status: "Loading dataset...".to_string(),
            run: None,
        };
        app.recompute()?;

        // Pin the applied selection so year toggles edit it explicitly; the
        // default policy only runs once, at startup.
        if let Some(run) = &app.run {
            app.config.years = Some(run.selection.clone());
            app.status = format!("Loaded {} month(s).", run.rows_used);
        }
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab | KeyCode::Right => {
                self.view = self.view.next();
                self.status = self.view.display_name().to_string();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.view = self.view.prev();
                self.status = self.view.display_name().to_string();
            }
            KeyCode::Up => {
                if self.year_cursor > 0 {
                    self.year_cursor -= 1;
                }
            }
            KeyCode::Down => {
                let max = self.years_available().len().saturating_sub(1);
                if self.year_cursor < max {
                    self.year_cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_year_at_cursor()?,
            KeyCode::Char('a') => {
                // Empty selection = every year, matching the original page's
                // cleared multiselect.
                self.config.years = Some(crate::domain::YearSelection::default());
                self.recompute()?;
                self.status = "Selection cleared: showing all years.".to_string();
            }
            KeyCode::Char('d') => {
                self.config.years = None;
                self.recompute()?;
                if let Some(run) = &self.run {
                    self.config.years = Some(run.selection.clone());
                }
                self.status = "Default selection restored (last 3 years).".to_string();
            }
            KeyCode::Char('r') => {
                self.cache.invalidate();
                self.recompute()?;
                self.status = "Reloaded dataset from source.".to_string();
            }
            _ => {}
        }

        Ok(false)
    }

    fn toggle_year_at_cursor(&mut self) -> Result<(), AppError> {
        let Some(&year) = self.years_available().get(self.year_cursor) else {
            return Ok(());
        };

        let mut selection = match (&self.config.years, &self.run) {
            (Some(sel), _) => sel.clone(),
            (None, Some(run)) => run.selection.clone(),
            (None, None) => return Ok(()),
        };
        selection.toggle(year);
        self.config.years = Some(selection);
        self.recompute()?;

        self.status = match &self.run {
            Some(run) if run.selection.is_empty() => {
                "Selection empty: showing all years.".to_string()
            }
            Some(run) => format!("Selected {} year(s).", run.selection.len()),
            None => String::new(),
        };
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), AppError> {
        let run = run_dashboard(&mut self.cache, &self.config)?;
        self.year_cursor = self
            .year_cursor
            .min(run.years_available.len().saturating_sub(1));
        self.run = Some(run);
        Ok(())
    }

    fn years_available(&self) -> &[i32] {
        self.run
            .as_ref()
            .map(|r| r.years_available.as_slice())
            .unwrap_or(&[])
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sider", Style::default().fg(Color::Cyan)),
            Span::raw(" — Siderurgia Brasileira (Aço Brasil / MDIC)"),
        ]));

        let source = crate::app::source_label(&self.config);
        let (rows, selection) = match &self.run {
            Some(run) => {
                let selection = if run.selection.is_empty() {
                    "all years".to_string()
                } else {
                    run.selection
                        .years()
                        .map(|y| y.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                (
                    format!("rows={} (errors={})", run.rows_used, run.row_errors),
                    selection,
                )
            }
            None => ("rows=0".to_string(), "-".to_string()),
        };
        lines.push(Line::from(Span::styled(
            format!("source: {source} | {rows} | years: {selection}"),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(28)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_sidebar(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.tabs_line()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };
        let Some(spec) = run.spec(self.view) else {
            return;
        };

        // Empty series are a valid state, distinct from "data is zero".
        if spec.primary_series.is_empty() {
            let msg = Paragraph::new("Sem dados para a seleção atual.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }
        if inner.height < 2 {
            return;
        }

        let legend = legend_line(spec);
        frame.render_widget(
            Paragraph::new(legend),
            Rect {
                x: inner.x + 1,
                y: inner.y,
                width: inner.width.saturating_sub(2),
                height: 1,
            },
        );

        let body = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height - 1,
        };

        let data = chart_series(spec);
        let (chart_rect, insets) = chart_layout(body, data.overlay_bounds.is_some());
        let widget = TradePlottersChart {
            primary_a: &data.primary_a,
            primary_b: &data.primary_b,
            overlay: &data.overlay,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: "",
            y_label: spec.primary_axis_label.clone(),
            fmt_x: fmt_axis_month,
            fmt_y: fmt_axis_volume,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, body, chart_rect, insets, spec, &data);
        }
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_years(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
    }

    fn draw_years(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let selection = self.run.as_ref().map(|r| &r.selection);

        let items: Vec<ListItem> = self
            .years_available()
            .iter()
            .map(|&year| {
                let selected = selection.map(|s| s.contains(year)).unwrap_or(false);
                let marker = if selected { "[x]" } else { "[ ]" };
                ListItem::new(format!("{marker} {year}"))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Anos").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if !self.years_available().is_empty() {
            state.select(Some(self.year_cursor));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let kpis = self.run.as_ref().and_then(|r| r.kpis.as_ref());
        let text = crate::report::format::format_kpis(kpis);
        let p = Paragraph::new(text).block(Block::default().title("KPIs").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ view  ↑/↓ year  space toggle  a all  d default  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn tabs_line(&self) -> Line<'static> {
        let mut spans: Vec<Span> = Vec::new();
        for (i, view) in View::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            let style = if *view == self.view {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(view.display_name().to_string(), style));
        }
        Line::from(spans)
    }
}

/// Series data prepared for the Plotters widget.
struct ChartData {
    primary_a: Vec<(f64, f64)>,
    primary_b: Vec<(f64, f64)>,
    /// Overlay scaled into `y_bounds`.
    overlay: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    /// The overlay's own value range (for right-axis tick labels).
    overlay_bounds: Option<[f64; 2]>,
}

/// Build plot series from a chart spec.
///
/// Dates map to days-since-CE on the x axis; the overlay is rescaled into the
/// primary y range so it can share the plot area, with its real bounds kept
/// for the synthetic right axis.
fn chart_series(spec: &ChartSpec) -> ChartData {
    let [ind_a, ind_b] = primary_indicators(spec.view);

    let primary_a: Vec<(f64, f64)> = spec
        .primary_series
        .iter()
        .filter(|p| p.indicator == ind_a)
        .map(|p| (day_x(p.date), p.value))
        .collect();
    let primary_b: Vec<(f64, f64)> = spec
        .primary_series
        .iter()
        .filter(|p| p.indicator == ind_b)
        .map(|p| (day_x(p.date), p.value))
        .collect();

    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in primary_a.iter().chain(primary_b.iter()) {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        // Single-month selections still need a nonzero span.
        let center = if x0.is_finite() { x0 } else { 0.0 };
        x0 = center - 15.0;
        x1 = center + 15.0;
    }
    if !y0.is_finite() || !y1.is_finite() || y1 <= y0 {
        let center = if y0.is_finite() { y0 } else { 0.0 };
        y0 = center - 1.0;
        y1 = center + 1.0;
    }
    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);
    let y_bounds = [y0 - pad, y1 + pad];
    let x_bounds = [x0, x1];

    let (overlay, overlay_bounds) = match &spec.overlay_series {
        Some(points) if !points.is_empty() => {
            let (o0, o1) = spec
                .overlay_range
                .unwrap_or_else(|| auto_overlay_range(points.iter().map(|p| p.value)));
            if o1 > o0 {
                let scale = |v: f64| {
                    y_bounds[0] + (v - o0) / (o1 - o0) * (y_bounds[1] - y_bounds[0])
                };
                let scaled: Vec<(f64, f64)> = points
                    .iter()
                    .map(|p| (day_x(p.date), scale(p.value)))
                    .collect();
                (scaled, Some([o0, o1]))
            } else {
                (Vec::new(), None)
            }
        }
        _ => (Vec::new(), None),
    };

    ChartData {
        primary_a,
        primary_b,
        overlay,
        x_bounds,
        y_bounds,
        overlay_bounds,
    }
}

fn auto_overlay_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi <= lo {
        return (lo - 1.0, lo + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn legend_line(spec: &ChartSpec) -> Line<'static> {
    let [ind_a, ind_b] = primary_indicators(spec.view);
    let mut spans = vec![
        Span::styled(
            format!("— {}", ind_a.display_name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("— {}", ind_b.display_name()),
            Style::default().fg(Color::Yellow),
        ),
    ];
    if let Some(label) = &spec.overlay_axis_label {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("— {label}"),
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(spans)
}

fn day_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn fmt_axis_month(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn fmt_axis_volume(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect, has_overlay: bool) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        // The overlay gets a synthetic right axis, which needs label room.
        right: if has_overlay { 8 } else { 2 },
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    spec: &ChartSpec,
    data: &ChartData,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let x_bounds = data.x_bounds;
    let y_bounds = data.y_bounds;

    // Bottom: month labels.
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_month(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    // Left: volume labels.
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_volume(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    // Right: overlay labels in overlay units, when the view has one.
    if let Some([o0, o1]) = data.overlay_bounds {
        let overlay_style = Style::default().fg(Color::Green);
        for i in 0..ticks {
            let u = i as f64 / (ticks as f64 - 1.0);
            let o_val = o0 + u * (o1 - o0);
            let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
            let label = format!("{o_val:.0}");
            let label_len = (label.len() as u16).min(insets.right.saturating_sub(1));
            let x = chart.x + chart.width + 1;
            if x + label_len > inner.x + inner.width {
                continue;
            }
            frame.render_widget(
                Paragraph::new(label).style(overlay_style),
                Rect {
                    x,
                    y,
                    width: label_len,
                    height: 1,
                },
            );
        }
    }

    // Axis captions: primary top-left, overlay top-right.
    let y_label = Paragraph::new(spec.primary_axis_label.clone())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1).max(6),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);

    if let Some(label) = &spec.overlay_axis_label {
        let width = (label.len() as u16).min(inner.width / 2);
        let x = (inner.x + inner.width).saturating_sub(width + 1);
        let rect = Rect {
            x,
            y: inner.y,
            width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(label.clone()).style(Style::default().fg(Color::Green)),
            rect,
        );
    }
}
