//! Tool-call log events.
//!
//! Each tool invocation emits one `tracing` event carrying the arguments and
//! the outcome. Rendered payloads are capped and passed through
//! [`redact_sensitive`] so tokens never reach the log.

use hcc_util::redact_sensitive;
use rmcp::model::{CallToolResult, ErrorData};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const MAX_LOGGED_PAYLOAD_BYTES: usize = 16 * 1024;

/// Builds the standard log payload with `request` and/or `response`.
///
/// Returns `None` when both values are absent.
pub(crate) fn build_log_payload(request: Option<Value>, response: Option<Value>) -> Option<Value> {
    let mut payload = Map::new();
    if let Some(request_value) = request {
        payload.insert("request".to_string(), request_value);
    }
    if let Some(response_value) = response {
        payload.insert("response".to_string(), response_value);
    }
    if payload.is_empty() { None } else { Some(Value::Object(payload)) }
}

/// Log the outcome of a tool call.
pub(crate) fn emit_tool_log(tool_name: &str, request: Option<Value>, outcome: &Result<CallToolResult, ErrorData>) {
    match outcome {
        Ok(result) => {
            let response = serde_json::to_value(result).ok();
            let rendered = render_payload(build_log_payload(request, response).as_ref());
            debug!(tool = tool_name, payload = %rendered, "tool call succeeded");
        }
        Err(error) => {
            let rendered = render_payload(build_log_payload(request, None).as_ref());
            warn!(
                tool = tool_name,
                code = error.code.0,
                error = %redact_sensitive(&error.message),
                payload = %rendered,
                "tool call failed"
            );
        }
    }
}

fn render_payload(payload: Option<&Value>) -> String {
    let Some(payload) = payload else {
        return String::new();
    };
    let mut rendered = redact_sensitive(&payload.to_string());
    if rendered.len() > MAX_LOGGED_PAYLOAD_BYTES {
        let mut cut = MAX_LOGGED_PAYLOAD_BYTES;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_absent_without_request_or_response() {
        assert!(build_log_payload(None, None).is_none());
        let payload = build_log_payload(Some(json!({"jql": "project = X"})), None).expect("payload");
        assert_eq!(payload["request"]["jql"], "project = X");
        assert!(payload.get("response").is_none());
    }

    #[test]
    fn rendered_payloads_are_capped() {
        let payload = json!({"text": "x".repeat(MAX_LOGGED_PAYLOAD_BYTES * 2)});
        let rendered = render_payload(Some(&payload));
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.len(), MAX_LOGGED_PAYLOAD_BYTES + 3);
    }

    #[test]
    fn rendered_payloads_are_redacted() {
        let payload = json!({"note": "JIRA_API_TOKEN=abc123"});
        let rendered = render_payload(Some(&payload));
        assert!(!rendered.contains("abc123"));
    }
}
