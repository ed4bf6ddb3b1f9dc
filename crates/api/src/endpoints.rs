//! Typed JIRA REST operations.
//!
//! Each method maps to one upstream call and returns the decoded JSON body.
//! Reshaping for tool output happens in the MCP layer.

use crate::dispatch::{DispatchError, JiraOperation};
use crate::{JiraClient, encode_path_segment};
use reqwest::Method;
use serde_json::{Map, Value, json};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_MAX_RESULTS: u32 = 50;
/// Largest page size forwarded upstream.
pub const MAX_RESULTS_CEILING: u32 = 100;

const ISSUE_DETAIL_EXPAND: &str = "renderedFields,names,schema,transitions,operations,editmeta";
const CREATE_META_EXPAND: &str = "projects.issuetypes.fields";

/// Apply the default page size and silently cap it at the ceiling.
pub fn clamp_max_results(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_MAX_RESULTS).min(MAX_RESULTS_CEILING)
}

/// Optional filters for the create-metadata endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMetaFilter {
    pub project_key: Option<String>,
    pub project_id: Option<String>,
    pub issuetype_name: Option<String>,
    pub issuetype_id: Option<String>,
}

impl CreateMetaFilter {
    fn query(&self) -> Vec<(&'static str, &str)> {
        let mut query: Vec<(&'static str, &str)> = [
            ("projectKeys", self.project_key.as_deref()),
            ("projectIds", self.project_id.as_deref()),
            ("issuetypeNames", self.issuetype_name.as_deref()),
            ("issuetypeIds", self.issuetype_id.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|value| !value.is_empty()).map(|value| (name, value)))
        .collect();
        query.push(("expand", CREATE_META_EXPAND));
        query
    }
}

impl JiraClient {
    /// `GET /search` with a JQL query.
    pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Value, DispatchError> {
        let request = self
            .request(Method::GET, "/search")
            .query(&[("jql", jql.to_string()), ("maxResults", max_results.to_string())]);
        self.execute_json(JiraOperation::SearchIssues, request).await
    }

    /// `GET /issue/{key}` with every expansion except comments and changelog.
    pub async fn issue_details(&self, issue_key: &str) -> Result<Value, DispatchError> {
        let request = self
            .request(Method::GET, &issue_path(issue_key))
            .query(&[("expand", ISSUE_DETAIL_EXPAND)]);
        self.execute_json(JiraOperation::GetIssueDetails, request).await
    }

    /// Plain `GET /issue/{key}`, used to read back an edited issue.
    pub async fn issue(&self, issue_key: &str) -> Result<Value, DispatchError> {
        let request = self.request(Method::GET, &issue_path(issue_key));
        self.execute_json(JiraOperation::EditIssue, request).await
    }

    /// `GET /issue/createmeta`.
    pub async fn create_metadata(&self, filter: &CreateMetaFilter) -> Result<Value, DispatchError> {
        let request = self.request(Method::GET, "/issue/createmeta").query(&filter.query());
        self.execute_json(JiraOperation::GetCreateMetadata, request).await
    }

    /// `POST /issue` with `{fields}`.
    pub async fn create_issue(&self, fields: &Map<String, Value>) -> Result<Value, DispatchError> {
        let request = self.request(Method::POST, "/issue").json(&json!({ "fields": fields }));
        self.execute_json(JiraOperation::CreateIssue, request).await
    }

    /// `PUT /issue/{key}` with `{fields}`. JIRA answers 204 with no body.
    pub async fn edit_issue(&self, issue_key: &str, fields: &Map<String, Value>) -> Result<(), DispatchError> {
        let request = self
            .request(Method::PUT, &issue_path(issue_key))
            .json(&json!({ "fields": fields }));
        self.execute(JiraOperation::EditIssue, request).await.map(|_| ())
    }

    /// `GET /issue/{key}/comment`.
    pub async fn issue_comments(&self, issue_key: &str, max_results: u32) -> Result<Value, DispatchError> {
        let request = self
            .request(Method::GET, &format!("{}/comment", issue_path(issue_key)))
            .query(&[("maxResults", max_results)]);
        self.execute_json(JiraOperation::GetIssueComments, request).await
    }

    /// `POST /issue/{key}/comment` with `{body}`.
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<Value, DispatchError> {
        let request = self
            .request(Method::POST, &format!("{}/comment", issue_path(issue_key)))
            .json(&json!({ "body": body }));
        self.execute_json(JiraOperation::AddComment, request).await
    }
}

fn issue_path(issue_key: &str) -> String {
    format!("/issue/{}", encode_path_segment(issue_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, MockJira, unreachable_base_url};
    use hcc_util::Credentials;

    fn client_for(base_url: &str) -> JiraClient {
        JiraClient::new(&Credentials::new(base_url, "test-token-123")).expect("client")
    }

    #[test]
    fn max_results_defaults_and_clamps() {
        assert_eq!(clamp_max_results(None), 50);
        assert_eq!(clamp_max_results(Some(25)), 25);
        assert_eq!(clamp_max_results(Some(100)), 100);
        assert_eq!(clamp_max_results(Some(500)), 100);
    }

    #[test]
    fn create_meta_query_skips_missing_filters() {
        let filter = CreateMetaFilter {
            project_key: Some("RHCLOUD".into()),
            issuetype_name: Some("Bug".into()),
            ..CreateMetaFilter::default()
        };
        assert_eq!(
            filter.query(),
            vec![
                ("projectKeys", "RHCLOUD"),
                ("issuetypeNames", "Bug"),
                ("expand", "projects.issuetypes.fields"),
            ]
        );
    }

    #[tokio::test]
    async fn search_sends_authenticated_request() {
        let server = MockJira::start(vec![CannedResponse::json(200, json!({"issues": [], "total": 0}))]).await;
        let client = client_for(&server.base_url);

        let page = client.search_issues("project = RHCLOUD", 25).await.expect("search");

        assert_eq!(page["total"], 0);
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/rest/api/2/search");
        assert!(request.query.contains("jql=project+%3D+RHCLOUD"));
        assert!(request.query.contains("maxResults=25"));
        assert_eq!(request.header("authorization").as_deref(), Some("Bearer test-token-123"));
        assert_eq!(request.header("accept").as_deref(), Some("application/json"));
        assert_eq!(request.header("content-type").as_deref(), Some("application/json"));
        assert!(request.header("user-agent").is_some_and(|agent| agent.starts_with("hcc-jira-mcp/")));
    }

    #[tokio::test]
    async fn issue_keys_are_path_encoded() {
        let server = MockJira::start(vec![CannedResponse::json(200, json!({"key": "A B"}))]).await;
        let client = client_for(&server.base_url);

        client.issue_details("A B/1").await.expect("details");

        let request = &server.requests()[0];
        assert_eq!(request.path, "/rest/api/2/issue/A%20B%2F1");
        assert_eq!(
            request.query,
            "expand=renderedFields%2Cnames%2Cschema%2Ctransitions%2Coperations%2Ceditmeta"
        );
    }

    #[tokio::test]
    async fn non_success_status_includes_body() {
        let server = MockJira::start(vec![CannedResponse::text(404, r#"{"errorMessages":["X"]}"#)]).await;
        let client = client_for(&server.base_url);

        let error = client.issue_comments("RHCLOUD-1", 50).await.expect_err("404");

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            "Failed to get JIRA issue comments: 404 Not Found\n{\"errorMessages\":[\"X\"]}"
        );
    }

    #[tokio::test]
    async fn network_failure_uses_progressive_phrase() {
        let client = client_for(&unreachable_base_url().await);

        let error = client.search_issues("project = RHCLOUD", 50).await.expect_err("network");

        assert!(matches!(error, DispatchError::Transport { .. }));
        assert!(error.to_string().starts_with("Error searching JIRA issues: "));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_decode_error() {
        let server = MockJira::start(vec![CannedResponse::text(200, "<html>login</html>")]).await;
        let client = client_for(&server.base_url);

        let error = client.create_metadata(&CreateMetaFilter::default()).await.expect_err("decode");

        assert!(matches!(error, DispatchError::Decode { .. }));
        assert!(error.to_string().starts_with("Error getting JIRA create metadata: "));
    }

    #[tokio::test]
    async fn edit_accepts_empty_no_content_response() {
        let server = MockJira::start(vec![CannedResponse::empty(204)]).await;
        let client = client_for(&server.base_url);
        let mut fields = Map::new();
        fields.insert("summary".into(), json!("Updated"));

        client.edit_issue("RHCLOUD-1", &fields).await.expect("edit");

        let request = &server.requests()[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.json_body(), json!({"fields": {"summary": "Updated"}}));
    }
}
