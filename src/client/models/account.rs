//! Service account and trusted account models

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Cloud account attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub service_account_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Trusted account this one assumes (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_account_id: Option<String>,
}

impl ReferenceResource for ServiceAccount {
    const KIND: ResourceKind = ResourceKind::ServiceAccount;

    fn key(&self) -> &str {
        &self.service_account_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.service_account_id, &self.name)
            .with_provider(self.provider.clone())
            .with_data(json!({
                "project_id": self.project_id,
                "trusted_account_id": self.trusted_account_id,
            }))
    }
}

/// Account trusted by service accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedAccount {
    pub trusted_account_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// DOMAIN or WORKSPACE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl ReferenceResource for TrustedAccount {
    const KIND: ResourceKind = ResourceKind::TrustedAccount;

    fn key(&self) -> &str {
        &self.trusted_account_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.trusted_account_id, &self.name)
            .with_provider(self.provider.clone())
            .with_data(json!({ "resource_group": self.resource_group }))
    }
}
