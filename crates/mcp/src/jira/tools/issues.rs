use hcc_jira_api::JiraClient;
use rmcp::model::ErrorData;
use serde_json::{Value, json};
use tracing::warn;

use super::{is_truthy, pick};
use crate::jira::schemas::{CreateIssueRequest, EditIssueRequest, IssueKeyRequest};
use crate::server::errors::{invalid_params_error, upstream_error};

const DETAIL_KEYS: &[&str] = &["key", "id", "self", "fields", "renderedFields", "transitions", "operations"];

/// Fields `create_jira_issue` refuses to dispatch without, with the message for each.
const REQUIRED_CREATE_FIELDS: &[(&str, &str)] = &[
    ("project", "Missing required field: project (must be object with 'key' or 'id')"),
    ("summary", "Missing required field: summary (must be a string)"),
    ("issuetype", "Missing required field: issuetype (must be object with 'name' or 'id')"),
];

/// `get_jira_issue_details`: full issue with expansions, minus comments and changelog.
pub(crate) async fn issue_details(client: &JiraClient, request: &IssueKeyRequest) -> Result<Value, ErrorData> {
    let issue = client
        .issue_details(&request.issue_key)
        .await
        .map_err(|error| upstream_error(&error))?;
    Ok(Value::Object(pick(&issue, DETAIL_KEYS)))
}

/// `create_jira_issue`: check the required fields, then `POST /issue`.
pub(crate) async fn create_issue(client: &JiraClient, request: &CreateIssueRequest) -> Result<Value, ErrorData> {
    for (field, message) in REQUIRED_CREATE_FIELDS {
        if !is_truthy(request.fields.get(*field)) {
            return Err(invalid_params_error(
                "MISSING_REQUIRED_FIELD",
                *message,
                json!({ "field": field }),
                "Call get_jira_create_metadata to discover the fields the project and issue type need.",
            ));
        }
    }

    let created = client
        .create_issue(&request.fields)
        .await
        .map_err(|error| upstream_error(&error))?;

    let mut payload = serde_json::Map::new();
    payload.insert("success".into(), json!(true));
    payload.insert("message".into(), json!("Issue created successfully"));
    if let Some(key) = created.get("key") {
        payload.insert("issueKey".into(), key.clone());
    }
    if let Some(id) = created.get("id") {
        payload.insert("issueId".into(), id.clone());
    }
    let key = created.get("key").and_then(Value::as_str).unwrap_or_default();
    payload.insert("issueUrl".into(), json!(client.browse_url(key)));
    if let Some(link) = created.get("self") {
        payload.insert("self".into(), link.clone());
    }
    Ok(Value::Object(payload))
}

/// `edit_jira_issue`: `PUT` the fields, then read the issue back.
///
/// The read-back is best effort; when it fails the edit is still reported as
/// successful and `currentValues` is left out.
pub(crate) async fn edit_issue(client: &JiraClient, request: &EditIssueRequest) -> Result<Value, ErrorData> {
    client
        .edit_issue(&request.issue_key, &request.fields)
        .await
        .map_err(|error| upstream_error(&error))?;

    let updated_fields: Vec<&String> = request.fields.keys().collect();
    let mut payload = json!({
        "issueKey": request.issue_key,
        "success": true,
        "message": "Issue updated successfully",
        "updatedFields": updated_fields,
    });

    match client.issue(&request.issue_key).await {
        Ok(issue) => {
            if let (Some(fields), Some(object)) = (issue.get("fields"), payload.as_object_mut()) {
                object.insert("currentValues".into(), fields.clone());
            }
        }
        Err(error) => {
            warn!(issue_key = %request.issue_key, %error, "edited issue could not be read back");
        }
    }

    Ok(payload)
}
