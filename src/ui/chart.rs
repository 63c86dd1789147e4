//! Chart view rendering.
//!
//! One line per audit, x axis in bucket order as delivered by the source.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{format_log_ts, ChartSeries, TimeStaticsDim};

/// Render the chart view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };
    let chart = &data.chart;

    let block = Block::default()
        .title(format!(" Audit trend ({} buckets) ", chart.x_axis.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if chart.x_axis.is_empty() {
        let empty = Paragraph::new("No audit data for this query")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points = chart_points(chart);
    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(i, (series, pts))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.series_color(i)))
                .data(pts)
        })
        .collect();

    let x_max = (chart.x_axis.len().saturating_sub(1)).max(1) as f64;
    let y_max = nice_ceiling(chart.y_max());

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(x_labels(&chart.x_axis, app.dim())),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format_count(y_max / 2.0)),
                    Span::raw(format_count(y_max)),
                ]),
        );

    frame.render_widget(widget, area);
}

/// `(x index, value)` points per series.
fn chart_points(chart: &ChartSeries) -> Vec<Vec<(f64, f64)>> {
    chart
        .series
        .iter()
        .map(|s| s.data.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect())
        .collect()
}

/// First, middle and last bucket labels.
fn x_labels(x_axis: &[String], dim: TimeStaticsDim) -> Vec<Span<'static>> {
    let picks: Vec<usize> = match x_axis.len() {
        0 => Vec::new(),
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    };
    picks
        .into_iter()
        .map(|i| Span::raw(format_log_ts(&x_axis[i], dim)))
        .collect()
}

/// Round up to one significant digit so the y axis ends on a clean value.
fn nice_ceiling(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    (max / magnitude).ceil() * magnitude
}

/// Format large numbers with K/M suffixes
fn format_count(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}
