//! List query and response types for the console API
//!
//! Every resource exposes a `list` action that takes a JSON body of the form
//! `{"query": {"only": [...], "filter": [...]}}` and answers with
//! `{"results": [...], "total_count": n}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `service.resource` pair identifying a list endpoint (e.g. `identity.project`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub service: &'static str,
    pub resource: &'static str,
}

impl Endpoint {
    pub const fn new(service: &'static str, resource: &'static str) -> Self {
        Self { service, resource }
    }

    /// HTTP path of the list action, relative to the API host
    pub fn list_path(&self) -> String {
        format!("/{}/{}/list", self.service, self.resource.replace('_', "-"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.resource)
    }
}

/// Filter operator understood by the console API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = "contain")]
    Contain,
}

/// A single `{k, v, o}` filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub k: String,
    pub v: Value,
    pub o: FilterOperator,
}

/// Query sent with a list request.
///
/// Use the builder methods to configure projection and filters.
///
/// # Example
/// ```ignore
/// let query = ListQuery::new()
///     .only(["project_id", "name"])
///     .filter_in("project_id", ["p1", "p2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<QueryFilter>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict returned fields
    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add an equality filter
    pub fn filter_eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push(QueryFilter {
            k: key.into(),
            v: value.into(),
            o: FilterOperator::Eq,
        });
        self
    }

    /// Add a membership filter
    pub fn filter_in<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = values.into_iter().map(|v| Value::String(v.into())).collect();
        self.filter.push(QueryFilter {
            k: key.into(),
            v: Value::Array(values),
            o: FilterOperator::In,
        });
        self
    }

    /// Values of the first `in` filter on `key`, if any
    pub fn in_values(&self, key: &str) -> Vec<String> {
        self.filter
            .iter()
            .find(|f| f.k == key && f.o == FilterOperator::In)
            .and_then(|f| f.v.as_array())
            .map(|vals| {
                vals.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Wire body of a list request
#[derive(Debug, Serialize)]
pub struct ListRequest<'a> {
    pub query: &'a ListQuery,
}

/// Response of a list request. Rows are kept as raw JSON; callers
/// deserialize them into typed resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_display_and_path() {
        let ep = Endpoint::new("identity", "service_account");
        assert_eq!(ep.to_string(), "identity.service_account");
        assert_eq!(ep.list_path(), "/identity/service-account/list");
    }

    #[test]
    fn test_request_body_shape() {
        let query = ListQuery::new()
            .only(["project_id", "name"])
            .filter_in("project_id", ["p1", "p2"]);

        let body = serde_json::to_value(ListRequest { query: &query }).unwrap();
        assert_eq!(
            body,
            json!({
                "query": {
                    "only": ["project_id", "name"],
                    "filter": [{"k": "project_id", "v": ["p1", "p2"], "o": "in"}]
                }
            })
        );
    }

    #[test]
    fn test_empty_query_omits_fields() {
        let body = serde_json::to_value(ListRequest {
            query: &ListQuery::new(),
        })
        .unwrap();
        assert_eq!(body, json!({"query": {}}));
    }

    #[test]
    fn test_in_values() {
        let query = ListQuery::new()
            .filter_eq("state", "ENABLED")
            .filter_in("user_id", ["u1", "u2"]);

        assert_eq!(query.in_values("user_id"), vec!["u1", "u2"]);
        assert!(query.in_values("state").is_empty());
    }

    #[test]
    fn test_response_total_count_optional() {
        let resp: ListResponse = serde_json::from_str(r#"{"results": [{"a": 1}]}"#).unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.total_count, None);
    }
}
