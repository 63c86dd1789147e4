//! Backends for the access dashboard.
//!
//! The dashboard needs three manager endpoints: the paged list, the
//! count-by-status summary and the delete call. [`FileAccessBackend`]
//! serves them from a JSON export of access records.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::data::access::{status, AccessPage, AccessRecord, ApiRequest, ListOptions};

/// Manager operations behind the access dashboard.
pub trait AccessBackend: Send + Debug {
    /// One page of records matching `options`.
    fn list(&mut self, options: &ListOptions) -> Result<AccessPage, String>;

    /// Record counts keyed by card data index.
    fn count_by_status(&mut self) -> Result<HashMap<String, u64>, String>;

    /// Execution log lines of one record.
    fn execution_log(&mut self, business_identifier: &str) -> Result<Vec<String>, String>;

    /// Send a mutating request such as a delete.
    fn send(&mut self, request: &ApiRequest) -> Result<(), String>;

    /// Human-readable description of the backend.
    fn description(&self) -> &str;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccessFile {
    Bare(Vec<AccessRecord>),
    Listed { list: Vec<AccessRecord> },
    Envelope { data: ListedRecords },
}

#[derive(Deserialize)]
struct ListedRecords {
    list: Vec<AccessRecord>,
}

/// Access records loaded from a JSON file.
///
/// Accepts a bare array, `{"list": [...]}` or the manager envelope
/// `{"data": {"list": [...]}}`. Deletes apply to the loaded copy only.
#[derive(Debug)]
pub struct FileAccessBackend {
    path: PathBuf,
    description: String,
    records: Vec<AccessRecord>,
}

impl FileAccessBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        let records = Self::parse(&content)?;
        info!(path = %path.display(), records = records.len(), "loaded access records");
        Ok(Self::from_records(&path, records))
    }

    pub fn from_records<P: AsRef<Path>>(path: P, records: Vec<AccessRecord>) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("access: {}", path.display());
        Self {
            path,
            description,
            records,
        }
    }

    fn parse(content: &str) -> Result<Vec<AccessRecord>> {
        let file: AccessFile =
            serde_json::from_str(content).map_err(|e| anyhow!("Parse error: {}", e))?;
        Ok(match file {
            AccessFile::Bare(records) | AccessFile::Listed { list: records } => records,
            AccessFile::Envelope { data } => data.list,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn matches(record: &AccessRecord, options: &ListOptions) -> bool {
        let keyword_ok = options.keyword.as_deref().is_none_or(|keyword| {
            let keyword = keyword.to_lowercase();
            record.business_identifier.to_lowercase().contains(&keyword)
                || record.name.to_lowercase().contains(&keyword)
        });
        let status_ok = options.status.is_none_or(|s| record.status == s);
        keyword_ok && status_ok
    }
}

impl AccessBackend for FileAccessBackend {
    fn list(&mut self, options: &ListOptions) -> Result<AccessPage, String> {
        let matching: Vec<&AccessRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, options))
            .collect();

        let page_size = options.page_size.max(1) as usize;
        let skip = (options.page_num.max(1) as usize - 1) * page_size;
        let list = matching
            .iter()
            .skip(skip)
            .take(page_size)
            .map(|record| (*record).clone())
            .collect();

        Ok(AccessPage {
            list,
            total: matching.len() as u64,
        })
    }

    fn count_by_status(&mut self) -> Result<HashMap<String, u64>, String> {
        let count = |code: i32| self.records.iter().filter(|r| r.status == code).count() as u64;
        Ok(HashMap::from([
            ("totalCount".to_string(), self.records.len() as u64),
            ("waitAssignCount".to_string(), count(status::TO_BE_SUBMIT)),
            ("waitApproveCount".to_string(), count(status::TO_BE_APPROVAL)),
            ("rejectCount".to_string(), count(status::APPROVE_REJECTED)),
        ]))
    }

    fn execution_log(&mut self, business_identifier: &str) -> Result<Vec<String>, String> {
        self.records
            .iter()
            .find(|r| r.business_identifier == business_identifier)
            .map(|r| r.execution_log.clone())
            .ok_or_else(|| format!("No access {}", business_identifier))
    }

    fn send(&mut self, request: &ApiRequest) -> Result<(), String> {
        let target = match (request.method, request.path.strip_prefix("/business/delete/")) {
            ("DELETE", Some(id)) if !id.is_empty() => id,
            _ => return Err(format!("Unsupported request: {}", request)),
        };

        let before = self.records.len();
        self.records.retain(|r| r.business_identifier != target);
        if self.records.len() == before {
            return Err(format!("No access {}", target));
        }
        debug!(business = %target, "deleted access record");
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{"list": [
            {"id": 1, "businessIdentifier": "b_orders", "name": "Orders", "status": 101,
             "executionLog": ["submitted", "waiting for approval"]},
            {"id": 2, "businessIdentifier": "b_clicks", "name": "Clicks", "status": 130},
            {"id": 3, "businessIdentifier": "b_refunds", "name": "Refunds", "status": 102}
        ]}"#
    }

    fn backend() -> FileAccessBackend {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        FileAccessBackend::open(file.path()).unwrap()
    }

    #[test]
    fn test_open_accepts_envelope() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"success": true, "data": {{"list": [{{"businessIdentifier": "b_x", "status": 100}}], "total": 1}}}}"#
        )
        .unwrap();
        let mut backend = FileAccessBackend::open(file.path()).unwrap();
        assert_eq!(backend.list(&ListOptions::default()).unwrap().total, 1);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(FileAccessBackend::open("/nonexistent/access.json").is_err());
    }

    #[test]
    fn test_list_pages_and_filters() {
        let mut backend = backend();
        let options = ListOptions {
            page_num: 2,
            page_size: 2,
            ..ListOptions::default()
        };
        let page = backend.list(&options).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.list[0].business_identifier, "b_refunds");

        let options = ListOptions {
            keyword: Some("CLICK".to_string()),
            ..ListOptions::default()
        };
        let page = backend.list(&options).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].business_identifier, "b_clicks");

        let options = ListOptions {
            status: Some(status::APPROVE_REJECTED),
            ..ListOptions::default()
        };
        assert_eq!(backend.list(&options).unwrap().list[0].business_identifier, "b_refunds");
    }

    #[test]
    fn test_count_by_status() {
        let mut backend = backend();
        let summary = backend.count_by_status().unwrap();
        assert_eq!(summary["totalCount"], 3);
        assert_eq!(summary["waitApproveCount"], 1);
        assert_eq!(summary["rejectCount"], 1);
        assert_eq!(summary["waitAssignCount"], 0);
    }

    #[test]
    fn test_execution_log() {
        let mut backend = backend();
        assert_eq!(backend.execution_log("b_orders").unwrap().len(), 2);
        assert!(backend.execution_log("b_clicks").unwrap().is_empty());
        assert!(backend.execution_log("b_missing").is_err());
    }

    #[test]
    fn test_delete_request() {
        let mut backend = backend();
        backend.send(&ApiRequest::delete_business("b_clicks")).unwrap();
        assert_eq!(backend.list(&ListOptions::default()).unwrap().total, 2);
        assert!(backend.send(&ApiRequest::delete_business("b_clicks")).is_err());
    }

    #[test]
    fn test_unsupported_request() {
        let mut backend = backend();
        let request = ApiRequest {
            method: "POST",
            path: "/business/save".to_string(),
        };
        assert!(backend.send(&request).unwrap_err().contains("Unsupported"));
    }
}
