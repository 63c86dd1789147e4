//! Application state and navigation logic.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::data::access::{AccessAction, AccessDashboard};
use crate::data::{AuditView, Baseline, QueryWindow, TimeStaticsDim, ViewOptions};
use crate::source::{AccessBackend, AuditSnapshot, DataSource};
use crate::ui::Theme;

/// The current view/tab in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Line chart of every audit over time.
    Chart,
    /// Percent-annotated table, one row per bucket.
    Table,
    /// Access dashboard: counters and the paged access list.
    Access,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Chart => View::Table,
            View::Table => View::Access,
            View::Access => View::Chart,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Chart => View::Access,
            View::Table => View::Chart,
            View::Access => View::Table,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Chart => "Chart",
            View::Table => "Table",
            View::Access => "Access",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    snapshot: Option<AuditSnapshot>,
    pub data: Option<AuditView>,
    pub load_error: Option<String>,

    // Query and presentation
    pub options: ViewOptions,
    pub window: QueryWindow,

    // Table navigation
    pub selected_row: usize,

    // Access dashboard
    pub access: AccessDashboard,
    access_backend: Option<Box<dyn AccessBackend>>,
    pub access_error: Option<String>,

    // Keyword filter input (access view)
    pub filter_active: bool,
    pub filter_text: String,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: Box<dyn DataSource>, options: ViewOptions, window: QueryWindow) -> Self {
        Self::with_theme(source, options, window, Theme::auto_detect())
    }

    /// Create an app with an explicit theme (no terminal probing).
    pub fn with_theme(
        source: Box<dyn DataSource>,
        options: ViewOptions,
        window: QueryWindow,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Chart,
            show_help: false,
            source,
            snapshot: None,
            data: None,
            load_error: None,
            options,
            window,
            selected_row: 0,
            access: AccessDashboard::default(),
            access_backend: None,
            access_error: None,
            filter_active: false,
            filter_text: String::new(),
            theme,
            status_message: None,
        }
    }

    /// Attach an access backend and load the first page.
    pub fn with_access(mut self, backend: Box<dyn AccessBackend>) -> Self {
        self.access_backend = Some(backend);
        let refresh = self.access.refresh();
        self.run_access_action(refresh);
        self
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn access_description(&self) -> Option<&str> {
        self.access_backend.as_ref().map(|b| b.description())
    }

    pub fn dim(&self) -> TimeStaticsDim {
        self.window.time_statics_dim
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new query result.
    ///
    /// Returns true if new data was received.
    pub fn reload_data(&mut self) -> bool {
        if let Some(snapshot) = self.source.poll() {
            info!(series = snapshot.len(), "received audit result");
            self.snapshot = Some(snapshot);
            self.rebuild();
            self.load_error = None;
            true
        } else {
            self.load_error = self.source.error();
            false
        }
    }

    /// Recompute the view from the last snapshot with the current options.
    fn rebuild(&mut self) {
        let Some(ref snapshot) = self.snapshot else {
            return;
        };
        let view = AuditView::from_snapshot(snapshot, &self.options);
        if self.selected_row >= view.rows.len() {
            self.selected_row = view.rows.len().saturating_sub(1);
        }
        self.data = Some(view);
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.rows.len())
    }

    /// Move the table selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    /// Move the table selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.row_count().saturating_sub(1);
    }

    /// Move the reference column to the next metric, wrapping around.
    pub fn cycle_baseline(&mut self) {
        let Some(ref data) = self.data else {
            return;
        };
        let ids = crate::data::table::column_ids(&data.metrics);
        if ids.is_empty() {
            return;
        }

        let current = data.reference_id(self.options.baseline).unwrap_or(ids[0]);
        let pos = ids.iter().position(|&id| id == current).unwrap_or(0);
        let next = ids[(pos + 1) % ids.len()];

        self.options.baseline = if pos + 1 == ids.len() {
            Baseline::First
        } else {
            Baseline::Audit(next)
        };
        debug!(baseline = ?self.options.baseline, "baseline changed");
        self.rebuild();

        let name = self
            .data
            .as_ref()
            .and_then(|d| d.metric_name(next))
            .unwrap_or_default()
            .to_string();
        self.set_status_message(format!("Reference column: {}", name));
    }

    /// Cycle the time dimension used to format the time column.
    ///
    /// An end date outside the new dimension's range is clamped.
    pub fn cycle_dim(&mut self) {
        self.window.time_statics_dim = self.window.time_statics_dim.next();
        let label = self.window.time_statics_dim.label(&self.options.labels);
        if self.window.clamp_end_date() {
            debug!(end = %self.window.end_date, "end date clamped");
            self.set_status_message(format!(
                "Time dimension: {} (end date {})",
                label, self.window.end_date
            ));
        } else {
            self.set_status_message(format!("Time dimension: {}", label));
        }
    }

    /// Perform an access dashboard action against the backend.
    pub fn run_access_action(&mut self, action: AccessAction) {
        let Some(backend) = self.access_backend.as_mut() else {
            self.set_status_message("No access source".to_string());
            return;
        };

        match action {
            AccessAction::Refresh(options) => {
                let result = backend
                    .list(&options)
                    .and_then(|page| backend.count_by_status().map(|summary| (page, summary)));
                match result {
                    Ok((page, summary)) => {
                        self.access.set_page(page);
                        self.access.set_summary(&summary);
                        self.access_error = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "access list failed");
                        self.access_error = Some(e);
                    }
                }
            }
            AccessAction::Delete(request) => match backend.send(&request) {
                Ok(()) => {
                    info!(%request, "access deleted");
                    let refresh = self.access.on_deleted();
                    self.run_access_action(refresh);
                    self.set_status_message("Successfully deleted".to_string());
                }
                Err(e) => {
                    warn!(%request, error = %e, "access delete failed");
                    self.set_status_message(format!("Delete failed: {}", e));
                }
            },
            AccessAction::Create { route } => {
                self.set_status_message(format!("New access: open {} in the manager", route));
            }
        }
    }

    /// Run an optional action, e.g. from a page change at the last page.
    pub fn run_access(&mut self, action: Option<AccessAction>) {
        if let Some(action) = action {
            self.run_access_action(action);
        }
    }

    /// Open the execution log of the selected access record.
    pub fn open_execution_log(&mut self) {
        let Some(id) = self
            .access
            .selected_record()
            .map(|r| r.business_identifier.clone())
        else {
            return;
        };
        let entries = match self.access_backend.as_mut() {
            Some(backend) => backend
                .execution_log(&id)
                .unwrap_or_else(|e| vec![format!("Error: {}", e)]),
            None => Vec::new(),
        };
        self.access.log_modal.open(&id, entries);
    }

    /// Start typing a keyword filter.
    pub fn start_filter(&mut self) {
        self.filter_active = true;
        self.filter_text = self.access.options.keyword.clone().unwrap_or_default();
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Leave input mode without changing the list.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
        self.filter_text.clear();
    }

    /// Apply the typed keyword and reload page 1.
    pub fn commit_filter(&mut self) {
        self.filter_active = false;
        let keyword = std::mem::take(&mut self.filter_text);
        let action = self.access.apply_keyword(&keyword);
        self.run_access_action(action);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current chart and table to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            bail!("No data to export");
        };

        let mut export = data.to_export();
        if let Some(obj) = export.as_object_mut() {
            obj.insert("query".to_string(), serde_json::to_value(self.window)?);
        }

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "exported audit view");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::access::{status, AccessRecord};
    use crate::source::FileAccessBackend;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct StaticSource {
        pending: Option<AuditSnapshot>,
    }

    impl DataSource for StaticSource {
        fn poll(&mut self) -> Option<AuditSnapshot> {
            self.pending.take()
        }

        fn description(&self) -> &str {
            "static"
        }

        fn error(&self) -> Option<String> {
            None
        }
    }

    fn sample_app() -> App {
        let json = r#"[
            {"auditId": 3, "auditName": "Agent Receive", "auditSet": [
                {"logTs": "2024-05-01 10:00:00", "count": 100},
                {"logTs": "2024-05-01 10:01:00", "count": 120}
            ]},
            {"auditId": 4, "auditName": "Agent Send", "auditSet": [
                {"logTs": "2024-05-01 10:00:00", "count": 50},
                {"logTs": "2024-05-01 10:01:00", "count": 60}
            ]}
        ]"#;
        let snapshot = crate::source::parse_snapshot(json).unwrap();
        let window = QueryWindow::single_day(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            TimeStaticsDim::Minute,
        );
        let mut app = App::with_theme(
            Box::new(StaticSource {
                pending: Some(snapshot),
            }),
            ViewOptions::default(),
            window,
            Theme::dark(),
        );
        assert!(app.reload_data());
        app
    }

    #[test]
    fn test_reload_builds_view() {
        let mut app = sample_app();
        let data = app.data.as_ref().unwrap();
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.chart.series.len(), 2);
        assert!(!app.reload_data());
        assert!(app.data.is_some());
    }

    #[test]
    fn test_view_cycling() {
        let mut app = sample_app();
        assert_eq!(app.current_view, View::Chart);
        app.next_view();
        assert_eq!(app.current_view, View::Table);
        app.next_view();
        assert_eq!(app.current_view, View::Access);
        app.next_view();
        assert_eq!(app.current_view, View::Chart);
        app.prev_view();
        assert_eq!(app.current_view, View::Access);
    }

    #[test]
    fn test_selection_clamps() {
        let mut app = sample_app();
        app.select_next_n(10);
        assert_eq!(app.selected_row, 1);
        app.select_prev_n(10);
        assert_eq!(app.selected_row, 0);
        app.select_last();
        assert_eq!(app.selected_row, 1);
        app.select_first();
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_cycle_baseline_wraps() {
        let mut app = sample_app();
        app.cycle_baseline();
        assert_eq!(app.options.baseline, Baseline::Audit(4));
        let row = &app.data.as_ref().unwrap().rows[0];
        assert_eq!(row.text(4), Some("60"));
        assert_eq!(row.text(3), Some("120 (+100%)"));

        app.cycle_baseline();
        assert_eq!(app.options.baseline, Baseline::First);
        let row = &app.data.as_ref().unwrap().rows[0];
        assert_eq!(row.text(3), Some("120"));
    }

    #[test]
    fn test_cycle_dim() {
        let mut app = sample_app();
        app.cycle_dim();
        assert_eq!(app.dim(), TimeStaticsDim::Hour);
        assert_eq!(app.get_status_message(), Some("Time dimension: Hour"));
    }

    #[test]
    fn test_export_state() {
        let app = sample_app();
        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["query"]["timeStaticsDim"], "MINUTE");
        assert_eq!(json["table"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_export_without_data_fails() {
        let app = App::with_theme(
            Box::new(StaticSource { pending: None }),
            ViewOptions::default(),
            QueryWindow::single_day(
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                TimeStaticsDim::Day,
            ),
            Theme::dark(),
        );
        assert!(app.export_state(Path::new("unused.json")).is_err());
    }

    fn access_record(id: u64, business_identifier: &str, status: i32) -> AccessRecord {
        AccessRecord {
            id,
            business_identifier: business_identifier.to_string(),
            name: business_identifier.trim_start_matches("b_").to_string(),
            in_charges: "admin".to_string(),
            status,
            create_time: "2024-05-01 10:00:00".to_string(),
            execution_log: vec![format!("{} submitted", business_identifier)],
        }
    }

    fn access_app(count: u64) -> App {
        let records = (1..=count)
            .map(|i| access_record(i, &format!("b_{:02}", i), status::TO_BE_APPROVAL))
            .collect();
        sample_app().with_access(Box::new(FileAccessBackend::from_records(
            "access.json",
            records,
        )))
    }

    #[test]
    fn test_with_access_loads_first_page() {
        let app = access_app(12);
        assert_eq!(app.access.page.total, 12);
        assert_eq!(app.access.page.list.len(), 10);
        assert_eq!(app.access.cards[0].count, 12);
        assert_eq!(app.access_description(), Some("access: access.json"));
    }

    #[test]
    fn test_access_paging_fetches_next_page() {
        let mut app = access_app(12);
        let action = app.access.next_page();
        app.run_access(action);
        assert_eq!(app.access.page.list.len(), 2);
        assert_eq!(app.access.page.list[0].business_identifier, "b_11");

        let action = app.access.next_page();
        assert!(action.is_none());
    }

    #[test]
    fn test_access_delete_refreshes_with_same_options() {
        let mut app = access_app(12);
        let action = app.access.next_page();
        app.run_access(action);
        app.access.select_last();
        assert!(app.access.request_delete());

        let action = app.access.confirm_delete();
        app.run_access(action);

        assert_eq!(app.access.options.page_num, 2);
        assert_eq!(app.access.page.total, 11);
        assert_eq!(app.access.page.list.len(), 1);
        assert_eq!(app.get_status_message(), Some("Successfully deleted"));
    }

    #[test]
    fn test_access_keyword_filter() {
        let mut app = access_app(12);
        app.start_filter();
        for c in "11".chars() {
            app.filter_push(c);
        }
        app.commit_filter();
        assert!(!app.filter_active);
        assert_eq!(app.access.options.keyword.as_deref(), Some("11"));
        assert_eq!(app.access.page.total, 1);

        app.start_filter();
        assert_eq!(app.filter_text, "11");
        app.cancel_filter();
        assert_eq!(app.access.page.total, 1);
    }

    #[test]
    fn test_open_execution_log() {
        let mut app = access_app(3);
        app.access.select_next();
        app.open_execution_log();
        assert!(app.access.log_modal.visible);
        assert_eq!(app.access.log_modal.business_identifier, "b_02");
        assert_eq!(app.access.log_modal.entries, vec!["b_02 submitted".to_string()]);
    }

    #[test]
    fn test_access_actions_without_backend() {
        let mut app = sample_app();
        let action = app.access.create();
        app.run_access_action(action);
        assert_eq!(app.get_status_message(), Some("No access source"));
    }

    #[test]
    fn test_create_action_reports_route() {
        let mut app = access_app(1);
        let action = app.access.create();
        app.run_access_action(action);
        assert!(app.get_status_message().unwrap().contains("/access/create"));
    }

    #[test]
    fn test_cycle_dim_clamps_end_date() {
        let mut app = sample_app();
        app.window = QueryWindow {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            time_statics_dim: TimeStaticsDim::Day,
        };
        app.cycle_dim();
        assert_eq!(app.dim(), TimeStaticsDim::Minute);
        app.cycle_dim();
        assert_eq!(app.dim(), TimeStaticsDim::Hour);
        assert_eq!(app.window.end_date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert!(app.window.validate().is_ok());
        assert!(app.get_status_message().unwrap().contains("end date 2024-05-03"));
    }
}

