//! Inventory models: providers, collectors, metrics, namespaces, query sets

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Cloud provider (aws, google_cloud, azure, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Provider key, doubles as its ID
    pub provider: String,

    #[serde(default)]
    pub name: String,

    /// Short display name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ReferenceResource for Provider {
    const KIND: ResourceKind = ResourceKind::Provider;

    fn key(&self) -> &str {
        &self.provider
    }

    fn to_reference_item(&self) -> ReferenceItem {
        let label = self
            .alias
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.name.clone());

        ReferenceItem::new(&self.provider, &self.name)
            .with_label(label)
            .with_icon(self.icon.clone())
            .with_color(self.color.clone())
    }
}

/// Plugin binding of a collector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginInfo {
    #[serde(default)]
    pub plugin_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Inventory collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    pub collector_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default)]
    pub plugin_info: PluginInfo,
}

impl ReferenceResource for Collector {
    const KIND: ResourceKind = ResourceKind::Collector;

    fn key(&self) -> &str {
        &self.collector_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.collector_id, &self.name)
            .with_provider(self.provider.clone())
            .with_data(json!({
                "plugin_id": self.plugin_info.plugin_id,
                "plugin_version": self.plugin_info.version,
            }))
    }
}

/// Metric definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub metric_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,

    /// COUNTER or GAUGE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub labels_info: Vec<serde_json::Value>,
}

impl ReferenceResource for Metric {
    const KIND: ResourceKind = ResourceKind::Metric;

    fn key(&self) -> &str {
        &self.metric_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.metric_id, &self.name).with_data(json!({
            "namespace_id": self.namespace_id,
            "metric_type": self.metric_type,
            "unit": self.unit,
            "labels_info": self.labels_info,
        }))
    }
}

/// Metric namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub namespace_id: String,

    #[serde(default)]
    pub name: String,

    /// COMMON or ASSET
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ReferenceResource for Namespace {
    const KIND: ResourceKind = ResourceKind::Namespace;

    fn key(&self) -> &str {
        &self.namespace_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.namespace_id, &self.name)
            .with_icon(self.icon.clone())
            .with_data(json!({
                "category": self.category,
                "resource_type": self.resource_type,
                "group": self.group,
            }))
    }
}

/// Saved cloud-service query set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudServiceQuerySet {
    pub query_set_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_service_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_service_type: Option<String>,

    /// ENABLED or DISABLED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ReferenceResource for CloudServiceQuerySet {
    const KIND: ResourceKind = ResourceKind::CloudServiceQuerySet;

    fn key(&self) -> &str {
        &self.query_set_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.query_set_id, &self.name)
            .with_provider(self.provider.clone())
            .with_data(json!({
                "cloud_service_group": self.cloud_service_group,
                "cloud_service_type": self.cloud_service_type,
                "state": self.state,
            }))
    }
}
