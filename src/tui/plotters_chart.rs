//! Plotters-powered trade-series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call (from a `ChartSpec`), so `render()` stays focused
/// on drawing and the data prep is testable separately.
pub struct TradePlottersChart<'a> {
    /// First primary indicator line.
    pub primary_a: &'a [(f64, f64)],
    /// Second primary indicator line.
    pub primary_b: &'a [(f64, f64)],
    /// Overlay line, already scaled into `y_bounds` (empty when the view has
    /// no overlay).
    pub overlay: &'a [(f64, f64)],
    /// X bounds (days since CE, mapped back to dates for tick labels).
    pub x_bounds: [f64; 2],
    /// Y bounds (volume in thousand tonnes).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: String,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TradePlottersChart<'a> {
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

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; the axes + labels are usually
            // enough for a monthly series.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(&self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal
            // readability. The same colors back the legend in the chart title.
            let color_a = RGBColor(0, 255, 255); // cyan
            let color_b = RGBColor(255, 255, 0); // yellow
            let color_overlay = RGBColor(0, 255, 0); // green

            chart.draw_series(LineSeries::new(self.primary_a.iter().copied(), &color_a))?;
            chart.draw_series(LineSeries::new(self.primary_b.iter().copied(), &color_b))?;

            // The overlay is drawn last so it stays visible where lines cross.
            if !self.overlay.is_empty() {
                chart.draw_series(LineSeries::new(
                    self.overlay.iter().copied(),
                    &color_overlay,
                ))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
