//! Dashboard model

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Shared dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub public_dashboard_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl ReferenceResource for Dashboard {
    const KIND: ResourceKind = ResourceKind::Dashboard;

    fn key(&self) -> &str {
        &self.public_dashboard_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.public_dashboard_id, &self.name).with_data(json!({
            "labels": self.labels,
            "resource_group": self.resource_group,
        }))
    }
}
