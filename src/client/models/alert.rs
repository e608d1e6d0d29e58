//! Alerting models

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Escalation policy for alert notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationPolicy {
    pub escalation_policy_id: String,

    #[serde(default)]
    pub name: String,

    /// Whether this is the workspace default
    #[serde(default)]
    pub is_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl ReferenceResource for EscalationPolicy {
    const KIND: ResourceKind = ResourceKind::EscalationPolicy;

    fn key(&self) -> &str {
        &self.escalation_policy_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.escalation_policy_id, &self.name).with_data(json!({
            "is_default": self.is_default,
            "resource_group": self.resource_group,
        }))
    }
}
