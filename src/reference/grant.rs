//! Authorization scope of the current session

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Scope the current grant was issued for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantScope {
    /// Domain administrator
    Domain,
    /// Member of a workspace
    #[default]
    Workspace,
    /// Per-user session with no workspace
    User,
}

impl GrantScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantScope::Domain => "DOMAIN",
            GrantScope::Workspace => "WORKSPACE",
            GrantScope::User => "USER",
        }
    }
}

impl fmt::Display for GrantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOMAIN" => Ok(GrantScope::Domain),
            "WORKSPACE" => Ok(GrantScope::Workspace),
            "USER" => Ok(GrantScope::User),
            other => Err(format!(
                "unknown scope '{}' (expected DOMAIN, WORKSPACE or USER)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GrantInfo {
    scope: GrantScope,
    workspace_id: Option<String>,
}

/// Current grant, shared by every reference store.
///
/// Owned outside the stores; they only read it to decide whether a load
/// should be attempted at all.
#[derive(Debug, Default)]
pub struct GrantContext {
    info: RwLock<GrantInfo>,
}

impl GrantContext {
    pub fn new(scope: GrantScope, workspace_id: Option<String>) -> Self {
        Self {
            info: RwLock::new(GrantInfo {
                scope,
                workspace_id,
            }),
        }
    }

    pub async fn scope(&self) -> GrantScope {
        self.info.read().await.scope
    }

    pub async fn workspace_id(&self) -> Option<String> {
        self.info.read().await.workspace_id.clone()
    }

    /// Replace the grant. Returns true if anything changed.
    pub async fn set(&self, scope: GrantScope, workspace_id: Option<String>) -> bool {
        let mut info = self.info.write().await;
        let changed = info.scope != scope || info.workspace_id != workspace_id;
        info.scope = scope;
        info.workspace_id = workspace_id;
        changed
    }
}
