use hcc_jira_api::{JiraClient, clamp_max_results};
use rmcp::model::ErrorData;
use serde_json::{Value, json};

use super::is_truthy;
use crate::jira::schemas::{AddCommentRequest, IssueCommentsRequest};
use crate::server::errors::upstream_error;

/// `get_jira_issue_comments`: one page of comments for an issue.
pub(crate) async fn issue_comments(client: &JiraClient, request: &IssueCommentsRequest) -> Result<Value, ErrorData> {
    let max_results = clamp_max_results(request.max_results);
    let result = client
        .issue_comments(&request.issue_key, max_results)
        .await
        .map_err(|error| upstream_error(&error))?;

    let comments = match result.get("comments").and_then(Value::as_array) {
        Some(comments) if !comments.is_empty() => comments,
        _ => {
            return Ok(json!({
                "issueKey": request.issue_key,
                "total": 0,
                "comments": [],
            }));
        }
    };

    let total = match result.get("total") {
        Some(total) if is_truthy(Some(total)) => total.clone(),
        _ => json!(comments.len()),
    };

    Ok(json!({
        "issueKey": request.issue_key,
        "total": total,
        "maxResults": max_results,
        "comments": comments,
    }))
}

/// `add_jira_issue_comment`: post a plain-text comment.
pub(crate) async fn add_comment(client: &JiraClient, request: &AddCommentRequest) -> Result<Value, ErrorData> {
    let comment = client
        .add_comment(&request.issue_key, &request.comment)
        .await
        .map_err(|error| upstream_error(&error))?;

    Ok(json!({
        "issueKey": request.issue_key,
        "success": true,
        "comment": comment,
    }))
}
