//! Project model

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Project resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    pub project_id: String,

    /// Project name
    #[serde(default)]
    pub name: String,

    /// Parent project group (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_group_id: Option<String>,

    /// Owning workspace (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// PUBLIC or PRIVATE (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}

impl ReferenceResource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn key(&self) -> &str {
        &self.project_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.project_id, &self.name).with_data(json!({
            "project_group_id": self.project_group_id,
            "workspace_id": self.workspace_id,
            "project_type": self.project_type,
        }))
    }
}
