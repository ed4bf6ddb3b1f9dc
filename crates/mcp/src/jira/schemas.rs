use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for `search_jira_issues`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchIssuesRequest {
    #[schemars(description = "JQL query string (e.g., 'project = RHCLOUD AND status = Open', 'issuekey = RHCLOUD-12345')")]
    pub jql: String,
    #[schemars(description = "Maximum number of issues to return (default: 50, max: 100)")]
    pub max_results: Option<u32>,
}

/// Parameters for tools addressing a single issue.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueKeyRequest {
    #[schemars(description = "The JIRA issue key (e.g., 'RHCLOUD-12345')")]
    pub issue_key: String,
}

/// Parameters for `get_jira_create_metadata`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetadataRequest {
    #[schemars(description = "Filter by project key (e.g., 'RHCLOUD')")]
    pub project_key: Option<String>,
    #[schemars(description = "Filter by project ID")]
    pub project_id: Option<String>,
    #[schemars(description = "Filter by issue type name (e.g., 'Bug', 'Story')")]
    pub issuetype_name: Option<String>,
    #[schemars(description = "Filter by issue type ID")]
    pub issuetype_id: Option<String>,
}

/// Parameters for `create_jira_issue`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateIssueRequest {
    #[schemars(
        description = "Issue fields. Required: project (object with key or id), summary (string), issuetype (object with name or id). Optional: description, assignee, priority, labels, customfield_*, etc."
    )]
    pub fields: Map<String, Value>,
}

/// Parameters for `edit_jira_issue`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditIssueRequest {
    #[schemars(description = "The JIRA issue key to edit (e.g., 'RHCLOUD-12345')")]
    pub issue_key: String,
    #[schemars(
        description = "Fields to update. Common fields: summary (string), description (string), assignee (object with name/accountId), priority (object with name/id), labels (array of strings), customfield_* (varies by type)"
    )]
    pub fields: Map<String, Value>,
}

/// Parameters for `get_jira_issue_comments`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueCommentsRequest {
    #[schemars(description = "The JIRA issue key (e.g., 'RHCLOUD-12345')")]
    pub issue_key: String,
    #[schemars(description = "Maximum number of comments to return (default: 50, max: 100)")]
    pub max_results: Option<u32>,
}

/// Parameters for `add_jira_issue_comment`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[schemars(description = "The JIRA issue key to add the comment to (e.g., 'RHCLOUD-12345')")]
    pub issue_key: String,
    #[schemars(description = "The comment text to add to the issue")]
    pub comment: String,
}
