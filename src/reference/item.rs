//! Reference records

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lightweight id → display record for a backend resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    /// Unique resource id
    pub key: String,

    /// Display name (may differ from `name`)
    pub label: String,

    /// Raw resource name
    pub name: String,

    /// Denormalized fields consumers need alongside the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Resource id → reference item. At most one entry per id.
pub type ReferenceMap = HashMap<String, ReferenceItem>;

impl ReferenceItem {
    /// Item whose label is its name
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: key.into(),
            label: name.clone(),
            name,
            data: None,
            icon: None,
            color: None,
            provider: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_provider(mut self, provider: Option<String>) -> Self {
        self.provider = provider;
        self
    }
}
