//! Audit metric definitions and the audit-code label table.
//!
//! Audit codes 3 through 8 name a component (Agent, DataProxy, Sort) and a
//! direction (Receive, Send). Codes from 9 upward are sink-side audits; they
//! collapse onto Sort Receive (odd) or Sort Send (even).

use serde::{Deserialize, Serialize};

use super::labels::{self, LabelResolver, SinkRegistry};

/// Numeric audit identifier as reported by the audit service.
pub type AuditId = u32;

/// One counter type requested from the audit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetric {
    pub audit_id: AuditId,
    pub audit_name: String,
    /// Sink type the audit belongs to, for sink-side audits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

impl AuditMetric {
    pub fn new(audit_id: AuditId, audit_name: impl Into<String>) -> Self {
        Self {
            audit_id,
            audit_name: audit_name.into(),
            node_type: None,
        }
    }
}

/// Pipeline component an audit point sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Agent,
    DataProxy,
    Sort,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Agent => "Agent",
            Component::DataProxy => "DataProxy",
            Component::Sort => "Sort",
        }
    }
}

/// Whether the audit counts records entering or leaving a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Receive,
    Send,
}

impl Direction {
    fn label_key(&self) -> &'static str {
        match self {
            Direction::Receive => labels::RECEIVE,
            Direction::Send => labels::SEND,
        }
    }
}

/// A labelled audit point: component plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditItem {
    pub component: Component,
    pub direction: Direction,
}

impl AuditItem {
    pub const AGENT_RECEIVE: Self = Self::new(Component::Agent, Direction::Receive);
    pub const AGENT_SEND: Self = Self::new(Component::Agent, Direction::Send);
    pub const DATAPROXY_RECEIVE: Self = Self::new(Component::DataProxy, Direction::Receive);
    pub const DATAPROXY_SEND: Self = Self::new(Component::DataProxy, Direction::Send);
    pub const SORT_RECEIVE: Self = Self::new(Component::Sort, Direction::Receive);
    pub const SORT_SEND: Self = Self::new(Component::Sort, Direction::Send);

    const fn new(component: Component, direction: Direction) -> Self {
        Self {
            component,
            direction,
        }
    }

    /// The audit code of this item (3..=8).
    pub fn code(&self) -> AuditId {
        let base = match self.component {
            Component::Agent => 3,
            Component::DataProxy => 5,
            Component::Sort => 7,
        };
        match self.direction {
            Direction::Receive => base,
            Direction::Send => base + 1,
        }
    }

    /// Display label, e.g. "Agent Receive".
    pub fn label(&self, resolver: &dyn LabelResolver) -> String {
        format!(
            "{} {}",
            self.component.name(),
            resolver.resolve(self.direction.label_key())
        )
    }
}

/// Classification of a numeric audit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCode {
    /// One of the six fixed codes.
    Item(AuditItem),
    /// A code of 9 or more, bucketed by parity onto a Sort item.
    Overflow { code: AuditId, item: AuditItem },
    /// Any other code; it has no label.
    Unknown(AuditId),
}

impl AuditCode {
    pub fn classify(code: AuditId) -> Self {
        match code {
            3 => AuditCode::Item(AuditItem::AGENT_RECEIVE),
            4 => AuditCode::Item(AuditItem::AGENT_SEND),
            5 => AuditCode::Item(AuditItem::DATAPROXY_RECEIVE),
            6 => AuditCode::Item(AuditItem::DATAPROXY_SEND),
            7 => AuditCode::Item(AuditItem::SORT_RECEIVE),
            8 => AuditCode::Item(AuditItem::SORT_SEND),
            c if c >= 9 => AuditCode::Overflow {
                code,
                item: if c % 2 == 1 {
                    AuditItem::SORT_RECEIVE
                } else {
                    AuditItem::SORT_SEND
                },
            },
            _ => AuditCode::Unknown(code),
        }
    }

    /// The labelled item this code maps onto, if any.
    pub fn item(&self) -> Option<AuditItem> {
        match self {
            AuditCode::Item(item) | AuditCode::Overflow { item, .. } => Some(*item),
            AuditCode::Unknown(_) => None,
        }
    }
}

/// Human label for an audit code, with an optional sink suffix.
///
/// Unknown codes below 9 are labelled with the code itself. When `sink_type`
/// resolves in `sinks` the result reads `"Sort Send(Hive)"`; an unresolved
/// sink type leaves the label bare.
pub fn audit_label_for(
    audit_id: AuditId,
    sink_type: Option<&str>,
    resolver: &dyn LabelResolver,
    sinks: &SinkRegistry,
) -> String {
    let label = match AuditCode::classify(audit_id).item() {
        Some(item) => item.label(resolver),
        None => audit_id.to_string(),
    };

    match sink_type.and_then(|t| sinks.lookup(t)) {
        Some(sink_label) => format!("{}({})", label, sink_label),
        None => label,
    }
}
