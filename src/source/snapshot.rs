//! Wire format of audit query results.
//!
//! The audit service answers a list-by-group query with one series per
//! requested audit. Sources accept either the bare list or the manager's
//! standard response envelope (`{"success": true, "data": [...]}`).

use serde::{Deserialize, Serialize};

use crate::data::series::AuditSeries;

/// One complete audit query result.
pub type AuditSnapshot = Vec<AuditSeries>;

/// The manager's response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub data: Option<AuditSnapshot>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Bare(AuditSnapshot),
    Envelope(ResponseEnvelope),
}

/// Parse a query result from JSON text.
///
/// A failed envelope (`success: false`) is reported as an error carrying the
/// server's message.
pub fn parse_snapshot(content: &str) -> Result<AuditSnapshot, String> {
    parse_payload(serde_json::from_str(content))
}

/// Parse a query result from JSON bytes.
pub fn parse_snapshot_slice(bytes: &[u8]) -> Result<AuditSnapshot, String> {
    parse_payload(serde_json::from_slice(bytes))
}

fn parse_payload(payload: serde_json::Result<Payload>) -> Result<AuditSnapshot, String> {
    match payload {
        Ok(Payload::Bare(snapshot)) => Ok(snapshot),
        Ok(Payload::Envelope(envelope)) if envelope.success => {
            Ok(envelope.data.unwrap_or_default())
        }
        Ok(Payload::Envelope(envelope)) => Err(format!(
            "Query failed: {}",
            envelope.err_msg.unwrap_or_else(|| "unknown error".to_string())
        )),
        Err(e) => Err(format!("Parse error: {}", e)),
    }
}
