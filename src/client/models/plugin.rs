//! Plugin model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Repository plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plugin {
    pub plugin_id: String,

    #[serde(default)]
    pub name: String,

    /// Container image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Free-form tags; `icon`, `description` and `link` are read by the console
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl ReferenceResource for Plugin {
    const KIND: ResourceKind = ResourceKind::Plugin;

    fn key(&self) -> &str {
        &self.plugin_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.plugin_id, &self.name)
            .with_icon(self.tags.get("icon").cloned())
            .with_provider(self.provider.clone())
            .with_data(json!({
                "image": self.image,
                "description": self.tags.get("description"),
                "link": self.tags.get("link"),
            }))
    }
}
