//! Structured tool error helpers.
//!
//! Every tool error is an `ErrorData` whose `data` carries a machine-readable
//! code, a category, and whether retrying can help.

use chrono::Utc;
use hcc_jira_api::DispatchError;
use rmcp::model::ErrorData;
use serde_json::{Value, json};

fn build_error_data(
    error_code: &str,
    category: &str,
    message: &str,
    context: Value,
    retryable: bool,
    suggested_action: &str,
) -> Value {
    json!({
        "error_code": error_code,
        "category": category,
        "message": message,
        "context": context,
        "retryable": retryable,
        "suggested_action": suggested_action,
        "correlation_id": format!("hcc-{}", Utc::now().timestamp_millis()),
    })
}

/// Caller arguments failed a precondition; nothing was sent upstream.
pub fn invalid_params_error(error_code: &str, message: impl Into<String>, context: Value, suggested_action: &str) -> ErrorData {
    let message = message.into();
    ErrorData::invalid_params(
        message.clone(),
        Some(build_error_data(
            error_code,
            "validation",
            &message,
            context,
            false,
            suggested_action,
        )),
    )
}

/// An upstream JIRA call failed. The dispatch message is used verbatim.
pub fn upstream_error(error: &DispatchError) -> ErrorData {
    let message = error.to_string();
    let (error_code, retryable, suggested_action) = match error {
        DispatchError::Status { status, .. } if *status == 401 || *status == 403 => (
            "JIRA_UNAUTHORIZED",
            false,
            "Check the configured JIRA API token and its permissions.",
        ),
        DispatchError::Status { status, .. } if *status >= 500 => (
            "JIRA_SERVER_ERROR",
            true,
            "JIRA reported a server error; retry later.",
        ),
        DispatchError::Status { .. } => (
            "JIRA_REQUEST_REJECTED",
            false,
            "Inspect the upstream response body and correct the request.",
        ),
        DispatchError::Transport { .. } => (
            "JIRA_UNREACHABLE",
            true,
            "Check network connectivity and the configured JIRA base URL.",
        ),
        DispatchError::Decode { .. } => (
            "JIRA_UNEXPECTED_RESPONSE",
            false,
            "The JIRA response was not valid JSON; verify the base URL points at a JIRA instance.",
        ),
    };

    ErrorData::internal_error(
        message.clone(),
        Some(build_error_data(
            error_code,
            "upstream",
            &message,
            json!({
                "operation": error.operation().action(),
                "status": error.status(),
            }),
            retryable,
            suggested_action,
        )),
    )
}

/// A failure inside this process.
pub fn internal_error(error_code: &str, message: impl Into<String>, context: Value, suggested_action: &str) -> ErrorData {
    let message = message.into();
    ErrorData::internal_error(
        message.clone(),
        Some(build_error_data(
            error_code,
            "internal",
            &message,
            context,
            false,
            suggested_action,
        )),
    )
}
