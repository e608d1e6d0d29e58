//! User, user group and role binding models

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reference::{ReferenceItem, ReferenceResource, ResourceKind};

/// Domain user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (usually the login email)
    pub user_id: String,

    /// Display name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// LOCAL, EXTERNAL, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ReferenceResource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn key(&self) -> &str {
        &self.user_id
    }

    /// Users without a display name are labelled by their id
    fn to_reference_item(&self) -> ReferenceItem {
        let name = self.name.clone().unwrap_or_default();
        let label = if name.is_empty() {
            self.user_id.clone()
        } else {
            name.clone()
        };

        ReferenceItem::new(&self.user_id, name)
            .with_label(label)
            .with_data(json!({
                "email": self.email,
                "auth_type": self.auth_type,
                "state": self.state,
            }))
    }
}

/// Group of users inside a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    pub user_group_id: String,

    #[serde(default)]
    pub name: String,

    /// Member user IDs
    #[serde(default)]
    pub users: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl ReferenceResource for UserGroup {
    const KIND: ResourceKind = ResourceKind::UserGroup;

    fn key(&self) -> &str {
        &self.user_group_id
    }

    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.user_group_id, &self.name).with_data(json!({
            "users": self.users,
            "workspace_id": self.workspace_id,
        }))
    }
}

/// Binding of a user to a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role_binding_id: String,

    pub user_id: String,

    pub role_id: String,

    /// DOMAIN_ADMIN, WORKSPACE_OWNER, WORKSPACE_MEMBER, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl ReferenceResource for RoleBinding {
    const KIND: ResourceKind = ResourceKind::RoleBinding;

    fn key(&self) -> &str {
        &self.role_binding_id
    }

    /// Bindings have no name; they are labelled by the bound user
    fn to_reference_item(&self) -> ReferenceItem {
        ReferenceItem::new(&self.role_binding_id, &self.user_id).with_data(json!({
            "role_id": self.role_id,
            "role_type": self.role_type,
            "workspace_id": self.workspace_id,
        }))
    }
}
