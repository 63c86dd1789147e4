//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar: query window, metric and bucket counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" INLONG AUDIT ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref data) = app.data else {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let window = &app.window;
    let range = if window.effective_end() == window.start_date {
        window.start_date.to_string()
    } else {
        format!("{} → {}", window.start_date, window.effective_end())
    };

    let line = Line::from(vec![
        title,
        Span::raw("│ "),
        Span::styled(range, Style::default().fg(app.theme.highlight)),
        Span::raw(format!(" ({}) │ ", app.dim().label(&app.options.labels))),
        Span::styled(
            format!("{}", data.metrics.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" audits │ "),
        Span::styled(
            format!("{}", data.series_map.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" buckets"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Chart "),
        Line::from(" 2:Table "),
        Line::from(" 3:Access "),
    ];

    let selected = match app.current_view {
        View::Chart => 0,
        View::Table => 1,
        View::Access => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, time since last update and the available controls.
/// Temporary status messages and load errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if app.current_view == View::Access {
        let status = match app.access_description() {
            Some(description) => format!(
                " {} | {} | {}",
                app.current_view.label(),
                description,
                access_controls(app)
            ),
            None => " Access | no source | Tab:switch q:quit".to_string(),
        };
        let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | r:retry q:quit", err)
    } else if let Some(ref data) = app.data {
        let controls = match app.current_view {
            View::Chart => "Tab:switch d:dim ?:help q:quit",
            View::Table => "↑↓:select b:reference d:dim e:export ?:help q:quit",
            View::Access => access_controls(app),
        };
        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            app.source_description(),
            data.last_updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        format!(" Waiting for {} | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn access_controls(app: &App) -> &'static str {
    if app.filter_active {
        "Enter:apply Esc:cancel"
    } else if app.access.pending_delete.is_some() {
        "y:confirm n:cancel"
    } else if app.access.log_modal.visible {
        "Esc:close"
    } else {
        "[/]:page /:search s:status o:log x:delete n:new ?:help"
    }
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  1 / 2 / 3   Chart / Table / Access"),
        Line::from("  ↑/↓ j/k     Select row"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    First/last row"),
        Line::from(""),
        Line::from(vec![Span::styled(" Table", bold)]),
        Line::from("  b         Next reference column"),
        Line::from("  d         Cycle time dimension"),
        Line::from(""),
        Line::from(vec![Span::styled(" Access", bold)]),
        Line::from("  [ / ]     Previous/next page"),
        Line::from("  / c s     Search, clear, status"),
        Line::from("  o x n     Log, delete, new"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
