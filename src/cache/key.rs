//! Cache keys for service queries

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Identity of a query against a console service.
///
/// Two keys built from the same inputs always produce the same
/// [`parts`](Self::parts) and [`cache_hash`](Self::cache_hash), regardless of
/// the order in which object keys appear in `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceQueryKey {
    pub service: String,
    pub resource: String,
    pub action: String,
    /// Tenant scope of the query (e.g. a workspace id)
    pub context_key: Option<String>,
    pub params: Option<Value>,
}

impl ServiceQueryKey {
    pub fn new(
        service: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            resource: resource.into(),
            action: action.into(),
            context_key: None,
            params: None,
        }
    }

    pub fn with_context(mut self, context_key: Option<String>) -> Self {
        self.context_key = context_key;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// `[service, resource, action, context_key?, params?]`
    pub fn parts(&self) -> Vec<String> {
        let mut parts = vec![
            self.service.clone(),
            self.resource.clone(),
            self.action.clone(),
        ];
        if let Some(ref context) = self.context_key {
            parts.push(context.clone());
        }
        if let Some(ref params) = self.params {
            parts.push(canonical_json(params));
        }
        parts
    }

    /// SHA-256 of the parts, hex encoded
    pub fn cache_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for part in self.parts() {
            hasher.update(part.as_bytes());
            hasher.update(b"|");
        }
        format!("{:x}", hasher.finalize())
    }

    /// `service.resource`, shared by every key of a resource
    pub fn resource_prefix(&self) -> String {
        format!("{}.{}", self.service, self.resource)
    }

    pub fn matches(&self, service: &str, resource: &str) -> bool {
        self.service == service && self.resource == resource
    }
}

/// JSON text with object keys sorted at every depth
fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
