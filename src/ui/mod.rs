//! Terminal UI rendering using ratatui.
//!
//! Each view lives in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`chart`]: Line chart of every audit over time
//! - [`table`]: Percent-annotated table with trend colours
//! - [`access`]: Access dashboard with count cards and record table
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content (chart/table/access)    │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```

pub mod access;
pub mod chart;
pub mod common;
pub mod table;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Draw one frame of the console.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = ratatui::widgets::Paragraph::new(msg)
            .alignment(ratatui::layout::Alignment::Center)
            .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
        let centered = ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
        frame.render_widget(paragraph, centered.intersection(area));
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Chart => chart::render(frame, app, chunks[2]),
        View::Table => table::render(frame, app, chunks[2]),
        View::Access => access::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::access::{status, AccessRecord};
    use crate::data::{QueryWindow, TimeStaticsDim, ViewOptions};
    use crate::source::{AuditSnapshot, DataSource, FileAccessBackend};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    #[derive(Debug)]
    struct OneShot(Option<AuditSnapshot>);

    impl DataSource for OneShot {
        fn poll(&mut self) -> Option<AuditSnapshot> {
            self.0.take()
        }

        fn description(&self) -> &str {
            "test"
        }

        fn error(&self) -> Option<String> {
            None
        }
    }

    fn app() -> App {
        let json = r#"[
            {"auditId": 3, "auditName": "Agent Receive", "auditSet": [
                {"logTs": "2024-05-01 10:00:00", "count": 100},
                {"logTs": "2024-05-01 10:01:00", "count": 150}
            ]},
            {"auditId": 4, "auditName": "Agent Send", "auditSet": [
                {"logTs": "2024-05-01 10:01:00", "count": 300}
            ]}
        ]"#;
        let snapshot = crate::source::parse_snapshot(json).unwrap();
        let mut app = App::with_theme(
            Box::new(OneShot(Some(snapshot))),
            ViewOptions::default(),
            QueryWindow::single_day(
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                TimeStaticsDim::Minute,
            ),
            Theme::dark(),
        );
        app.reload_data();
        app
    }

    fn render_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_table_view_renders_annotated_cells() {
        let mut app = app();
        app.set_view(View::Table);
        let screen = render_to_string(&app);
        assert!(screen.contains("300 (+100%)"));
        assert!(screen.contains("10:01:00"));
        assert!(screen.contains("Agent Send"));
    }

    #[test]
    fn test_chart_view_renders_title() {
        let app = app();
        let screen = render_to_string(&app);
        assert!(screen.contains("Audit trend (2 buckets)"));
        assert!(screen.contains("INLONG AUDIT"));
    }

    #[test]
    fn test_small_terminal_message() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let screen: String =
            terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("Terminal too small"));
    }

    fn access_app() -> App {
        let records = vec![
            AccessRecord {
                id: 1,
                business_identifier: "b_orders".to_string(),
                name: "Orders".to_string(),
                in_charges: "alice".to_string(),
                status: status::TO_BE_APPROVAL,
                create_time: "2024-05-01 09:00:00".to_string(),
                execution_log: vec!["submitted for approval".to_string()],
            },
            AccessRecord {
                id: 2,
                business_identifier: "b_clicks".to_string(),
                name: "Clicks".to_string(),
                in_charges: "bob".to_string(),
                status: status::CONFIG_SUCCESSFUL,
                create_time: "2024-05-02 09:00:00".to_string(),
                execution_log: Vec::new(),
            },
        ];
        let mut app = app().with_access(Box::new(FileAccessBackend::from_records(
            "access.json",
            records,
        )));
        app.set_view(View::Access);
        app
    }

    #[test]
    fn test_access_view_renders_cards_and_records() {
        let app = access_app();
        let screen = render_to_string(&app);
        assert!(screen.contains("3:Access"));
        assert!(screen.contains("Pending approval"));
        assert!(screen.contains("page 1/1"));
        assert!(screen.contains("b_orders"));
        assert!(screen.contains("Config successful"));
    }

    #[test]
    fn test_access_view_without_backend() {
        let mut app = app();
        app.set_view(View::Access);
        let screen = render_to_string(&app);
        assert!(screen.contains("No access source"));
    }

    #[test]
    fn test_access_log_modal_renders_entries() {
        let mut app = access_app();
        app.open_execution_log();
        let screen = render_to_string(&app);
        assert!(screen.contains("Execution log: b_orders"));
        assert!(screen.contains("submitted for approval"));
    }

    #[test]
    fn test_access_delete_confirm_renders() {
        let mut app = access_app();
        app.access.select_last();
        assert!(app.access.request_delete());
        let screen = render_to_string(&app);
        assert!(screen.contains("Delete b_clicks?"));
        assert!(screen.contains("y:confirm n:cancel"));
    }

    #[test]
    fn test_access_filter_input_in_title() {
        let mut app = access_app();
        app.start_filter();
        app.filter_push('o');
        let screen = render_to_string(&app);
        assert!(screen.contains("[/o▏]"));
    }
}

