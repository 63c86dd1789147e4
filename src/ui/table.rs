//! Table view rendering.
//!
//! One row per bucket (reverse of the chart's order), each metric cell
//! coloured by its change relative to the reference column.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::format_log_ts;
use crate::data::table::ColumnKey;

/// Render the table view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };
    let reference = data.reference_id(app.options.baseline);

    let header = Row::new(data.columns.iter().map(|column| {
        let style = match column.key {
            ColumnKey::Audit(id) if Some(id) == reference => {
                Style::default().add_modifier(Modifier::UNDERLINED)
            }
            _ => Style::default(),
        };
        Cell::from(column.title.clone()).style(style)
    }))
    .height(1)
    .style(app.theme.header);

    let dim = app.dim();
    let rows: Vec<Row> = data
        .rows
        .iter()
        .map(|row| {
            let cells = data.columns.iter().map(|column| match column.key {
                ColumnKey::LogTs => Cell::from(format_log_ts(&row.log_ts, dim)),
                ColumnKey::Audit(id) => match row.cell(id) {
                    Some(cell) => {
                        Cell::from(cell.text.clone()).style(app.theme.trend_style(cell.trend))
                    }
                    None => Cell::from("-"),
                },
            });
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = data
        .columns
        .iter()
        .map(|column| match column.key {
            ColumnKey::LogTs => Constraint::Min(10),
            ColumnKey::Audit(_) => Constraint::Fill(1),
        })
        .collect();

    let selected = app.selected_row.min(data.rows.len().saturating_sub(1));
    let position_info = if data.rows.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, data.rows.len())
    };
    let reference_name = reference
        .and_then(|id| data.metric_name(id))
        .unwrap_or("-");
    let title = format!(
        " Audit table [{}] [b:ref {}]{} ",
        dim.label(&app.options.labels),
        reference_name,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !data.rows.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
