//! JIRA tool handlers.
//!
//! Each handler validates its typed arguments, performs the upstream calls
//! through [`JiraClient`](hcc_jira_api::JiraClient), and reshapes the response
//! into the JSON payload returned to the caller. Upstream failures are mapped
//! to tool errors here, once.

pub(crate) mod comments;
pub(crate) mod issues;
pub(crate) mod metadata;
pub(crate) mod search;

use serde_json::{Map, Value};

/// Copy the listed keys that are present in `source`.
fn pick(source: &Value, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| source.get(*key).map(|value| ((*key).to_string(), value.clone())))
        .collect()
}

/// JavaScript-style truthiness, used for required field checks.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|number| number != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
pub(crate) fn test_client(base_url: &str) -> hcc_jira_api::JiraClient {
    hcc_jira_api::JiraClient::new(&hcc_util::Credentials::new(base_url, "test-token-123")).expect("client")
}
