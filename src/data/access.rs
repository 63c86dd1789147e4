//! State of the access dashboard.
//!
//! The dashboard pages through access records, shows per-status counters,
//! opens an execution-log modal per record and deletes records after a
//! confirmation. Transitions that need the manager return an
//! [`AccessAction`]; performing it is the caller's job.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page size of dashboard lists.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Console route of the "new access" form.
pub const CREATE_ROUTE: &str = "/access/create";

/// Counter cards shown above the list: `(data_index, description)`.
pub const DASH_CARDS: [(&str, &str); 4] = [
    ("totalCount", "Total"),
    ("waitAssignCount", "Pending assignment"),
    ("waitApproveCount", "Pending approval"),
    ("rejectCount", "Rejected"),
];

/// Access (business) lifecycle status codes.
pub mod status {
    pub const TO_BE_SUBMIT: i32 = 100;
    pub const TO_BE_APPROVAL: i32 = 101;
    pub const APPROVE_REJECTED: i32 = 102;
    pub const APPROVE_PASSED: i32 = 103;
    pub const CONFIG_ING: i32 = 120;
    pub const CONFIG_FAILED: i32 = 121;
    pub const CONFIG_SUCCESSFUL: i32 = 130;

    /// Statuses offered by the status filter, in cycling order.
    pub const FILTERABLE: [i32; 7] = [
        TO_BE_SUBMIT,
        TO_BE_APPROVAL,
        APPROVE_REJECTED,
        APPROVE_PASSED,
        CONFIG_ING,
        CONFIG_FAILED,
        CONFIG_SUCCESSFUL,
    ];

    /// Display label of a status code.
    pub fn label(code: i32) -> &'static str {
        match code {
            TO_BE_SUBMIT => "To be submitted",
            TO_BE_APPROVAL => "Pending approval",
            APPROVE_REJECTED => "Rejected",
            APPROVE_PASSED => "Approved",
            CONFIG_ING => "Configuring",
            CONFIG_FAILED => "Config failed",
            CONFIG_SUCCESSFUL => "Config successful",
            _ => "Unknown",
        }
    }
}

/// Query parameters of the access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: DEFAULT_PAGE_SIZE,
            keyword: None,
            status: None,
        }
    }
}

/// Filter form values. `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub keyword: Option<String>,
    pub status: Option<i32>,
}

/// Pagination widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
}

impl ListOptions {
    /// Merge filter values and jump back to the first page.
    pub fn on_filter(&mut self, filter: ListFilter) {
        if filter.keyword.is_some() {
            self.keyword = filter.keyword;
        }
        if filter.status.is_some() {
            self.status = filter.status;
        }
        self.page_num = 1;
    }

    /// Follow the table's page/size change. Zero values are clamped to 1.
    pub fn on_page_change(&mut self, page_num: u32, page_size: u32) {
        self.page_num = page_num.max(1);
        self.page_size = page_size.max(1);
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            current: self.page_num,
            page_size: self.page_size,
            total,
        }
    }

    /// Number of pages for `total` records (at least 1).
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size.max(1))).max(1)
    }
}

/// One access record of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    #[serde(default)]
    pub id: u64,
    pub business_identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub in_charges: String,
    pub status: i32,
    #[serde(default)]
    pub create_time: String,
    /// Workflow execution log lines, newest last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub execution_log: Vec<String>,
}

/// One page of the access list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPage {
    pub list: Vec<AccessRecord>,
    pub total: u64,
}

/// Execution-log modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionLogModal {
    pub visible: bool,
    pub business_identifier: String,
    pub entries: Vec<String>,
}

impl ExecutionLogModal {
    pub fn open(&mut self, business_identifier: &str, entries: Vec<String>) {
        self.visible = true;
        self.business_identifier = business_identifier.to_string();
        self.entries = entries;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.business_identifier.clear();
        self.entries.clear();
    }
}

/// One counter card on top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountCard {
    pub data_index: String,
    pub desc: String,
    pub count: u64,
}

/// Build the counter cards from a count-by-status summary.
///
/// `cards` lists `(data_index, description)`; missing counts show as 0.
pub fn count_cards(cards: &[(&str, &str)], summary: &HashMap<String, u64>) -> Vec<CountCard> {
    cards
        .iter()
        .map(|(data_index, desc)| CountCard {
            data_index: data_index.to_string(),
            desc: desc.to_string(),
            count: summary.get(*data_index).copied().unwrap_or(0),
        })
        .collect()
}

/// A request to the manager's REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: &'static str,
    pub path: String,
}

impl ApiRequest {
    /// `DELETE /business/delete/{businessIdentifier}`
    pub fn delete_business(business_identifier: &str) -> Self {
        Self {
            method: "DELETE",
            path: format!("/business/delete/{}", business_identifier),
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Work the dashboard asks its owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessAction {
    /// Fetch the list (and counters) with these options.
    Refresh(ListOptions),
    /// Send a confirmed delete.
    Delete(ApiRequest),
    /// Open the new-access form.
    Create { route: &'static str },
}

/// Whole dashboard state: list options, current page, cards and modals.
#[derive(Debug, Clone)]
pub struct AccessDashboard {
    pub options: ListOptions,
    pub page: AccessPage,
    pub cards: Vec<CountCard>,
    pub log_modal: ExecutionLogModal,
    /// Business identifier awaiting delete confirmation.
    pub pending_delete: Option<String>,
    pub selected: usize,
}

impl Default for AccessDashboard {
    fn default() -> Self {
        Self {
            options: ListOptions::default(),
            page: AccessPage::default(),
            cards: count_cards(&DASH_CARDS, &HashMap::new()),
            log_modal: ExecutionLogModal::default(),
            pending_delete: None,
            selected: 0,
        }
    }
}

impl AccessDashboard {
    /// Fetch with the current options.
    pub fn refresh(&self) -> AccessAction {
        AccessAction::Refresh(self.options.clone())
    }

    /// Take a freshly fetched page.
    pub fn set_page(&mut self, page: AccessPage) {
        self.page = page;
        self.selected = self.selected.min(self.page.list.len().saturating_sub(1));
    }

    pub fn set_summary(&mut self, summary: &HashMap<String, u64>) {
        self.cards = count_cards(&DASH_CARDS, summary);
    }

    pub fn page_count(&self) -> u64 {
        self.options.page_count(self.page.total)
    }

    pub fn selected_record(&self) -> Option<&AccessRecord> {
        self.page.list.get(self.selected)
    }

    pub fn select_next(&mut self) {
        let max = self.page.list.len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.page.list.len().saturating_sub(1);
    }

    /// Move to the next page, if any.
    pub fn next_page(&mut self) -> Option<AccessAction> {
        if u64::from(self.options.page_num) >= self.page_count() {
            return None;
        }
        self.change_page(self.options.page_num + 1)
    }

    /// Move to the previous page, if any.
    pub fn prev_page(&mut self) -> Option<AccessAction> {
        if self.options.page_num <= 1 {
            return None;
        }
        self.change_page(self.options.page_num - 1)
    }

    fn change_page(&mut self, page_num: u32) -> Option<AccessAction> {
        let page_size = self.options.page_size;
        self.options.on_page_change(page_num, page_size);
        self.selected = 0;
        Some(self.refresh())
    }

    /// Filter by keyword. An empty keyword clears it.
    pub fn apply_keyword(&mut self, keyword: &str) -> AccessAction {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.options.keyword = None;
            self.options.page_num = 1;
        } else {
            self.options.on_filter(ListFilter {
                keyword: Some(keyword.to_string()),
                status: None,
            });
        }
        self.selected = 0;
        self.refresh()
    }

    /// Step the status filter: none, then each status in turn, then none.
    pub fn cycle_status(&mut self) -> AccessAction {
        let next = match self.options.status {
            None => status::FILTERABLE.first().copied(),
            Some(current) => status::FILTERABLE
                .iter()
                .position(|&s| s == current)
                .and_then(|pos| status::FILTERABLE.get(pos + 1).copied()),
        };
        self.options.status = next;
        self.options.page_num = 1;
        self.selected = 0;
        self.refresh()
    }

    /// Drop keyword and status filters.
    pub fn clear_filter(&mut self) -> AccessAction {
        self.options.keyword = None;
        self.options.status = None;
        self.options.page_num = 1;
        self.selected = 0;
        self.refresh()
    }

    /// Ask for confirmation to delete the selected record.
    ///
    /// Returns false when nothing is selected.
    pub fn request_delete(&mut self) -> bool {
        self.pending_delete = self
            .selected_record()
            .map(|record| record.business_identifier.clone());
        self.pending_delete.is_some()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the pending delete.
    pub fn confirm_delete(&mut self) -> Option<AccessAction> {
        self.pending_delete
            .take()
            .map(|id| AccessAction::Delete(ApiRequest::delete_business(&id)))
    }

    /// After a successful delete: reload the list with the same options.
    pub fn on_deleted(&self) -> AccessAction {
        self.refresh()
    }

    /// The "new access" action.
    pub fn create(&self) -> AccessAction {
        AccessAction::Create {
            route: CREATE_ROUTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, business_identifier: &str, status: i32) -> AccessRecord {
        AccessRecord {
            id,
            business_identifier: business_identifier.to_string(),
            name: String::new(),
            in_charges: "admin".to_string(),
            status,
            create_time: String::new(),
            execution_log: Vec::new(),
        }
    }

    fn dashboard(total: u64) -> AccessDashboard {
        let mut dashboard = AccessDashboard::default();
        dashboard.set_page(AccessPage {
            list: vec![
                record(1, "b_orders", status::TO_BE_APPROVAL),
                record(2, "b_clicks", status::CONFIG_SUCCESSFUL),
            ],
            total,
        });
        dashboard
    }

    #[test]
    fn test_defaults() {
        let options = ListOptions::default();
        assert_eq!(options.page_num, 1);
        assert_eq!(options.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_filter_resets_page() {
        let mut options = ListOptions::default();
        options.on_page_change(4, 20);
        options.on_filter(ListFilter {
            keyword: Some("orders".to_string()),
            status: None,
        });
        assert_eq!(options.page_num, 1);
        assert_eq!(options.page_size, 20);
        assert_eq!(options.keyword.as_deref(), Some("orders"));

        options.on_filter(ListFilter {
            keyword: None,
            status: Some(130),
        });
        assert_eq!(options.keyword.as_deref(), Some("orders"));
        assert_eq!(options.status, Some(130));
    }

    #[test]
    fn test_pagination() {
        let mut options = ListOptions::default();
        options.on_page_change(3, 25);
        assert_eq!(
            options.pagination(61),
            Pagination {
                current: 3,
                page_size: 25,
                total: 61
            }
        );
        assert_eq!(options.page_count(61), 3);
        assert_eq!(options.page_count(0), 1);
    }

    #[test]
    fn test_page_change_clamps_zero() {
        let mut options = ListOptions::default();
        options.on_page_change(0, 0);
        assert_eq!((options.page_num, options.page_size), (1, 1));
    }

    #[test]
    fn test_list_options_wire_format() {
        let options = ListOptions::default();
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"pageNum": 1, "pageSize": 10}));
    }

    #[test]
    fn test_execution_log_modal() {
        let mut modal = ExecutionLogModal::default();
        modal.open("b_orders", vec!["submitted".to_string()]);
        assert!(modal.visible);
        assert_eq!(modal.business_identifier, "b_orders");
        assert_eq!(modal.entries.len(), 1);
        modal.close();
        assert_eq!(modal, ExecutionLogModal::default());
    }

    #[test]
    fn test_count_cards_default_missing_to_zero() {
        let summary = HashMap::from([("total".to_string(), 12u64)]);
        let cards = count_cards(&[("total", "Total"), ("waitAssign", "Pending")], &summary);
        assert_eq!(cards[0].count, 12);
        assert_eq!(cards[1].count, 0);
        assert_eq!(cards[1].desc, "Pending");
    }

    #[test]
    fn test_dashboard_starts_with_zero_cards() {
        let dashboard = AccessDashboard::default();
        assert_eq!(dashboard.cards.len(), DASH_CARDS.len());
        assert!(dashboard.cards.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_record_wire_format() {
        let json = r#"{"id": 7, "businessIdentifier": "b_orders", "name": "Orders",
                       "inCharges": "alice", "status": 130, "createTime": "2024-05-01 10:00:00"}"#;
        let record: AccessRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.business_identifier, "b_orders");
        assert_eq!(record.status, status::CONFIG_SUCCESSFUL);
        assert!(record.execution_log.is_empty());
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut dashboard = dashboard(2);
        dashboard.select_next();
        assert!(dashboard.request_delete());
        assert_eq!(dashboard.pending_delete.as_deref(), Some("b_clicks"));

        let action = dashboard.confirm_delete().unwrap();
        assert_eq!(
            action,
            AccessAction::Delete(ApiRequest {
                method: "DELETE",
                path: "/business/delete/b_clicks".to_string(),
            })
        );
        assert!(dashboard.pending_delete.is_none());
        assert!(dashboard.confirm_delete().is_none());
    }

    #[test]
    fn test_cancel_delete() {
        let mut dashboard = dashboard(2);
        assert!(dashboard.request_delete());
        dashboard.cancel_delete();
        assert!(dashboard.confirm_delete().is_none());
    }

    #[test]
    fn test_delete_without_selection() {
        let mut dashboard = AccessDashboard::default();
        assert!(!dashboard.request_delete());
        assert!(dashboard.pending_delete.is_none());
    }

    #[test]
    fn test_refresh_after_delete_keeps_options() {
        let mut dashboard = dashboard(30);
        dashboard.apply_keyword("orders");
        dashboard.next_page();
        let options = dashboard.options.clone();
        assert_eq!(options.page_num, 2);

        dashboard.request_delete();
        dashboard.confirm_delete();
        assert_eq!(dashboard.on_deleted(), AccessAction::Refresh(options));
    }

    #[test]
    fn test_create_action() {
        let dashboard = AccessDashboard::default();
        assert_eq!(
            dashboard.create(),
            AccessAction::Create {
                route: "/access/create"
            }
        );
    }

    #[test]
    fn test_paging_stops_at_bounds() {
        let mut dashboard = dashboard(25);
        assert!(dashboard.prev_page().is_none());
        assert!(dashboard.next_page().is_some());
        assert!(dashboard.next_page().is_some());
        assert_eq!(dashboard.options.page_num, 3);
        assert!(dashboard.next_page().is_none());
        assert!(dashboard.prev_page().is_some());
        assert_eq!(dashboard.options.page_num, 2);
    }

    #[test]
    fn test_keyword_filter_and_clear() {
        let mut dashboard = dashboard(25);
        dashboard.next_page();
        let action = dashboard.apply_keyword(" orders ");
        assert_eq!(dashboard.options.keyword.as_deref(), Some("orders"));
        assert_eq!(dashboard.options.page_num, 1);
        assert_eq!(action, AccessAction::Refresh(dashboard.options.clone()));

        dashboard.apply_keyword("");
        assert!(dashboard.options.keyword.is_none());
    }

    #[test]
    fn test_status_filter_cycles_back_to_none() {
        let mut dashboard = AccessDashboard::default();
        dashboard.cycle_status();
        assert_eq!(dashboard.options.status, Some(status::TO_BE_SUBMIT));
        for _ in 1..status::FILTERABLE.len() {
            dashboard.cycle_status();
        }
        assert_eq!(dashboard.options.status, Some(status::CONFIG_SUCCESSFUL));
        dashboard.cycle_status();
        assert!(dashboard.options.status.is_none());
    }

    #[test]
    fn test_clear_filter() {
        let mut dashboard = AccessDashboard::default();
        dashboard.apply_keyword("orders");
        dashboard.cycle_status();
        dashboard.clear_filter();
        assert_eq!(dashboard.options, ListOptions::default());
    }

    #[test]
    fn test_set_page_clamps_selection() {
        let mut dashboard = dashboard(2);
        dashboard.select_last();
        assert_eq!(dashboard.selected, 1);
        dashboard.set_page(AccessPage {
            list: vec![record(1, "b_orders", status::TO_BE_SUBMIT)],
            total: 1,
        });
        assert_eq!(dashboard.selected, 0);
        assert_eq!(dashboard.selected_record().unwrap().business_identifier, "b_orders");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status::label(101), "Pending approval");
        assert_eq!(status::label(999), "Unknown");
    }
}
