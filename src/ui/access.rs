//! Access dashboard rendering.
//!
//! Count cards across the top, the paged record table below, and the
//! execution-log and delete-confirmation overlays on top of both.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::access::status;

/// Render the access view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.access_description().is_none() {
        let paragraph = Paragraph::new("No access source (start with --access FILE)")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).split(area);
    render_cards(frame, app, chunks[0]);
    render_records(frame, app, chunks[1]);

    if app.access.log_modal.visible {
        render_log_modal(frame, app, area);
    }
    if let Some(ref target) = app.access.pending_delete {
        render_delete_confirm(frame, app, target, area);
    }
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = &app.access.cards;
    if cards.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Fill(1); cards.len()];
    let slots = Layout::horizontal(constraints).split(area);

    for (card, slot) in cards.iter().zip(slots.iter()) {
        let block = Block::default()
            .title(format!(" {} ", card.desc))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let count = Paragraph::new(card.count.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(count, *slot);
    }
}

fn render_records(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.access;

    let header = Row::new(["Business ID", "Name", "Owners", "Status", "Created"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = dashboard
        .page
        .list
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.business_identifier.clone()),
                Cell::from(record.name.clone()),
                Cell::from(record.in_charges.clone()),
                Cell::from(status::label(record.status)),
                Cell::from(record.create_time.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(20),
        Constraint::Length(19),
    ];

    let mut title = format!(
        " Access [page {}/{}] [{} total]",
        dashboard.options.page_num,
        dashboard.page_count(),
        dashboard.page.total
    );
    if app.filter_active {
        title.push_str(&format!(" [/{}▏]", app.filter_text));
    } else if let Some(ref keyword) = dashboard.options.keyword {
        title.push_str(&format!(" [/{}]", keyword));
    }
    if let Some(code) = dashboard.options.status {
        title.push_str(&format!(" [s:{}]", status::label(code)));
    }
    if let Some(ref err) = app.access_error {
        title.push_str(&format!(" [error: {}]", err));
    }
    title.push(' ');

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
    if !dashboard.page.list.is_empty() {
        state.select(Some(dashboard.selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_log_modal(frame: &mut Frame, app: &App, area: Rect) {
    let modal = &app.access.log_modal;
    let mut lines: Vec<Line> = if modal.entries.is_empty() {
        vec![Line::from(Span::styled(
            "No execution log",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        modal.entries.iter().map(|entry| Line::from(entry.as_str())).collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(format!(" Execution log: {} ", modal.business_identifier))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let height = lines.len() as u16 + 2;
    let modal_area = centered(area, 60, height);
    frame.render_widget(Clear, modal_area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        modal_area,
    );
}

fn render_delete_confirm(frame: &mut Frame, app: &App, target: &str, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(target, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y:confirm n:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.decrease));

    let confirm_area = centered(area, 44, 5);
    frame.render_widget(Clear, confirm_area);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        confirm_area,
    );
}
