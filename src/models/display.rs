//! Display model implementations for table and JSON output
//!
//! Display models turn reference records and store state into rows with
//! CLI-friendly column names.

use serde::Serialize;
use tabled::Tabled;

use crate::reference::{ReferenceItem, ResourceKind, StoreStatus};

/// Reference item row for `list` output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ReferenceDisplay {
    #[tabled(rename = "ID")]
    pub key: String,

    #[tabled(rename = "LABEL")]
    pub label: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "PROVIDER")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

impl From<&ReferenceItem> for ReferenceDisplay {
    fn from(item: &ReferenceItem) -> Self {
        Self {
            key: item.key.clone(),
            label: item.label.clone(),
            name: item.name.clone(),
            provider: item.provider.clone().unwrap_or_default(),
        }
    }
}

/// Outcome of resolving one id
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ResolveDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "LABEL")]
    pub label: String,

    #[tabled(rename = "RESOLVED")]
    pub resolved: bool,
}

impl ResolveDisplay {
    pub fn new(id: &str, item: Option<&ReferenceItem>) -> Self {
        match item {
            Some(item) => Self {
                id: id.to_string(),
                label: item.label.clone(),
                resolved: true,
            },
            None => Self {
                id: id.to_string(),
                label: "(unresolved)".to_string(),
                resolved: false,
            },
        }
    }
}

/// Supported resource kind row for `resources` output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ResourceKindDisplay {
    #[tabled(rename = "KIND")]
    pub kind: String,

    #[tabled(rename = "ENDPOINT")]
    pub endpoint: String,

    #[tabled(rename = "ID FIELD")]
    pub id_field: String,

    #[tabled(rename = "SCOPES")]
    pub scopes: String,
}

impl From<ResourceKind> for ResourceKindDisplay {
    fn from(kind: ResourceKind) -> Self {
        let scopes = match kind.allowed_scopes() {
            Some(scopes) => scopes
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => "any".to_string(),
        };
        Self {
            kind: kind.name().to_string(),
            endpoint: kind.endpoint().to_string(),
            id_field: kind.id_field().to_string(),
            scopes,
        }
    }
}

/// Store state row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StoreStatusDisplay {
    #[tabled(rename = "KIND")]
    pub kind: String,

    #[tabled(rename = "ENTRIES")]
    pub entries: usize,

    #[tabled(rename = "STATE")]
    pub state: String,

    #[tabled(rename = "TTL")]
    pub ttl: String,
}

impl From<&StoreStatus> for StoreStatusDisplay {
    fn from(status: &StoreStatus) -> Self {
        let state = if !status.loaded {
            "not loaded"
        } else if status.is_fresh() {
            "fresh"
        } else {
            "stale"
        };
        Self {
            kind: status.kind.name().to_string(),
            entries: status.entries,
            state: state.to_string(),
            ttl: format_duration(status.ttl.as_secs()),
        }
    }
}

/// `3h`, `90s`, `5m`
fn format_duration(secs: u64) -> String {
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
