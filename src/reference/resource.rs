//! Resource kinds cached as reference data.
//!
//! Each kind knows its list endpoint, id field and projection. Stores are
//! parameterized by a [`ReferenceResource`] type that ties a deserializable
//! model to its kind.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::grant::GrantScope;
use super::item::ReferenceItem;
use crate::client::Endpoint;
use crate::error::ConfigError;

/// Workspace-bound resources are never loaded from a per-user session
const WORKSPACE_SCOPES: &[GrantScope] = &[GrantScope::Domain, GrantScope::Workspace];

/// Every resource type with a reference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Provider,
    Project,
    Collector,
    Plugin,
    User,
    Metric,
    Namespace,
    ServiceAccount,
    TrustedAccount,
    EscalationPolicy,
    RoleBinding,
    UserGroup,
    Dashboard,
    CloudServiceQuerySet,
}

impl ResourceKind {
    /// All kinds, in display order.
    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::Provider,
        ResourceKind::Project,
        ResourceKind::Collector,
        ResourceKind::Plugin,
        ResourceKind::User,
        ResourceKind::Metric,
        ResourceKind::Namespace,
        ResourceKind::ServiceAccount,
        ResourceKind::TrustedAccount,
        ResourceKind::EscalationPolicy,
        ResourceKind::RoleBinding,
        ResourceKind::UserGroup,
        ResourceKind::Dashboard,
        ResourceKind::CloudServiceQuerySet,
    ];

    /// CLI name (kebab-case)
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Provider => "provider",
            ResourceKind::Project => "project",
            ResourceKind::Collector => "collector",
            ResourceKind::Plugin => "plugin",
            ResourceKind::User => "user",
            ResourceKind::Metric => "metric",
            ResourceKind::Namespace => "namespace",
            ResourceKind::ServiceAccount => "service-account",
            ResourceKind::TrustedAccount => "trusted-account",
            ResourceKind::EscalationPolicy => "escalation-policy",
            ResourceKind::RoleBinding => "role-binding",
            ResourceKind::UserGroup => "user-group",
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::CloudServiceQuerySet => "cloud-service-query-set",
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            ResourceKind::Provider => Endpoint::new("inventory", "provider"),
            ResourceKind::Project => Endpoint::new("identity", "project"),
            ResourceKind::Collector => Endpoint::new("inventory", "collector"),
            ResourceKind::Plugin => Endpoint::new("repository", "plugin"),
            ResourceKind::User => Endpoint::new("identity", "user"),
            ResourceKind::Metric => Endpoint::new("inventory", "metric"),
            ResourceKind::Namespace => Endpoint::new("inventory", "namespace"),
            ResourceKind::ServiceAccount => Endpoint::new("identity", "service_account"),
            ResourceKind::TrustedAccount => Endpoint::new("identity", "trusted_account"),
            ResourceKind::EscalationPolicy => Endpoint::new("monitoring", "escalation_policy"),
            ResourceKind::RoleBinding => Endpoint::new("identity", "role_binding"),
            ResourceKind::UserGroup => Endpoint::new("identity", "user_group"),
            ResourceKind::Dashboard => Endpoint::new("dashboard", "public_dashboard"),
            ResourceKind::CloudServiceQuerySet => {
                Endpoint::new("inventory", "cloud_service_query_set")
            }
        }
    }

    /// Field holding the resource id
    pub fn id_field(&self) -> &'static str {
        match self {
            ResourceKind::Provider => "provider",
            ResourceKind::Project => "project_id",
            ResourceKind::Collector => "collector_id",
            ResourceKind::Plugin => "plugin_id",
            ResourceKind::User => "user_id",
            ResourceKind::Metric => "metric_id",
            ResourceKind::Namespace => "namespace_id",
            ResourceKind::ServiceAccount => "service_account_id",
            ResourceKind::TrustedAccount => "trusted_account_id",
            ResourceKind::EscalationPolicy => "escalation_policy_id",
            ResourceKind::RoleBinding => "role_binding_id",
            ResourceKind::UserGroup => "user_group_id",
            ResourceKind::Dashboard => "public_dashboard_id",
            ResourceKind::CloudServiceQuerySet => "query_set_id",
        }
    }

    /// Projection sent as `only` with every list request
    pub fn only_fields(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Provider => &["provider", "name", "alias", "color", "icon"],
            ResourceKind::Project => &[
                "project_id",
                "name",
                "project_group_id",
                "workspace_id",
                "project_type",
            ],
            ResourceKind::Collector => &["collector_id", "name", "provider", "plugin_info"],
            ResourceKind::Plugin => &["plugin_id", "name", "image", "provider", "tags"],
            ResourceKind::User => &["user_id", "name", "email", "auth_type", "state"],
            ResourceKind::Metric => &[
                "metric_id",
                "name",
                "namespace_id",
                "metric_type",
                "unit",
                "labels_info",
            ],
            ResourceKind::Namespace => &[
                "namespace_id",
                "name",
                "category",
                "resource_type",
                "group",
                "icon",
            ],
            ResourceKind::ServiceAccount => &[
                "service_account_id",
                "name",
                "provider",
                "project_id",
                "trusted_account_id",
            ],
            ResourceKind::TrustedAccount => &[
                "trusted_account_id",
                "name",
                "provider",
                "resource_group",
            ],
            ResourceKind::EscalationPolicy => &[
                "escalation_policy_id",
                "name",
                "is_default",
                "resource_group",
            ],
            ResourceKind::RoleBinding => &[
                "role_binding_id",
                "user_id",
                "role_id",
                "role_type",
                "workspace_id",
            ],
            ResourceKind::UserGroup => &["user_group_id", "name", "users", "workspace_id"],
            ResourceKind::Dashboard => &[
                "public_dashboard_id",
                "name",
                "labels",
                "resource_group",
            ],
            ResourceKind::CloudServiceQuerySet => &[
                "query_set_id",
                "name",
                "provider",
                "cloud_service_group",
                "cloud_service_type",
                "state",
            ],
        }
    }

    /// Grant scopes allowed to load this kind; `None` means any scope
    pub fn allowed_scopes(&self) -> Option<&'static [GrantScope]> {
        match self {
            ResourceKind::EscalationPolicy
            | ResourceKind::RoleBinding
            | ResourceKind::UserGroup
            | ResourceKind::TrustedAccount => Some(WORKSPACE_SCOPES),
            _ => None,
        }
    }

    pub fn allows_scope(&self, scope: GrantScope) -> bool {
        self.allowed_scopes()
            .is_none_or(|allowed| allowed.contains(&scope))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized.strip_suffix('s').map_or(normalized.as_str(), |singular| {
            // "projects" → "project", but keep names that end in 's' for real
            if ResourceKind::ALL.iter().any(|k| k.name() == singular) {
                singular
            } else {
                normalized.as_str()
            }
        });

        ResourceKind::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownResource(s.to_string()))
    }
}

/// A backend resource that can be cached as reference data.
pub trait ReferenceResource: DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Resource id; rows with an empty id are skipped
    fn key(&self) -> &str;

    fn to_reference_item(&self) -> ReferenceItem;
}

/// Deserialize raw list rows and map them to reference items.
///
/// Rows that do not match the model, or that carry no id, are skipped.
pub fn to_reference_items<R: ReferenceResource>(rows: Vec<Value>) -> Vec<ReferenceItem> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<R>(row) {
            Ok(resource) if !resource.key().is_empty() => Some(resource.to_reference_item()),
            Ok(_) => {
                warn!("Skipping {} row without {}", R::KIND, R::KIND.id_field());
                None
            }
            Err(e) => {
                warn!("Skipping malformed {} row: {}", R::KIND, e);
                None
            }
        })
        .collect()
}
