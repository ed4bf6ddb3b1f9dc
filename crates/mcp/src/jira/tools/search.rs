use hcc_jira_api::{JiraClient, clamp_max_results};
use rmcp::model::ErrorData;
use serde_json::{Value, json};

use crate::jira::schemas::SearchIssuesRequest;
use crate::server::errors::upstream_error;

/// `search_jira_issues`: run a JQL search.
pub(crate) async fn search_issues(client: &JiraClient, request: &SearchIssuesRequest) -> Result<Value, ErrorData> {
    let max_results = clamp_max_results(request.max_results);
    let result = client
        .search_issues(&request.jql, max_results)
        .await
        .map_err(|error| upstream_error(&error))?;

    let issues = result.get("issues").cloned().unwrap_or_else(|| json!([]));
    let total = result
        .get("total")
        .cloned()
        .unwrap_or_else(|| json!(issues.as_array().map_or(0, Vec::len)));

    Ok(json!({
        "jql": request.jql,
        "total": total,
        "maxResults": max_results,
        "issues": issues,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::tools::test_client;
    use hcc_jira_api::test_support::{CannedResponse, MockJira};

    fn request(jql: &str, max_results: Option<u32>) -> SearchIssuesRequest {
        SearchIssuesRequest {
            jql: jql.into(),
            max_results,
        }
    }

    #[tokio::test]
    async fn returns_upstream_issues_with_query_echo() {
        let server = MockJira::start(vec![CannedResponse::json(
            200,
            json!({
                "total": 1,
                "issues": [{"key": "RHCLOUD-12345", "fields": {"summary": "Test Issue", "status": {"name": "Open"}}}]
            }),
        )])
        .await;

        let payload = search_issues(&test_client(&server.base_url), &request("issuekey=RHCLOUD-12345", Some(50)))
            .await
            .expect("payload");

        assert_eq!(payload["jql"], "issuekey=RHCLOUD-12345");
        assert_eq!(payload["total"], 1);
        assert_eq!(payload["maxResults"], 50);
        assert_eq!(payload["issues"][0]["fields"]["status"]["name"], "Open");

        let requests = server.requests();
        assert_eq!(requests[0].path, "/rest/api/2/search");
        assert_eq!(
            requests[0].header("authorization").as_deref(),
            Some("Bearer test-token-123")
        );
    }

    #[tokio::test]
    async fn clamps_oversized_pages() {
        let server = MockJira::start(vec![CannedResponse::json(200, json!({"total": 500, "issues": []}))]).await;

        let payload = search_issues(&test_client(&server.base_url), &request("project=RHCLOUD", Some(1000)))
            .await
            .expect("payload");

        assert_eq!(payload["maxResults"], 100);
        assert_eq!(payload["total"], 500);
        assert!(server.requests()[0].query.contains("maxResults=100"));
    }

    #[tokio::test]
    async fn defaults_page_size() {
        let server = MockJira::start(vec![CannedResponse::json(200, json!({"total": 0, "issues": []}))]).await;

        let payload = search_issues(&test_client(&server.base_url), &request("project=RHCLOUD", None))
            .await
            .expect("payload");

        assert_eq!(payload["maxResults"], 50);
        assert!(server.requests()[0].query.contains("maxResults=50"));
    }

    #[tokio::test]
    async fn upstream_rejection_carries_status_and_body() {
        let server = MockJira::start(vec![CannedResponse::text(400, "Error in JQL")]).await;

        let error = search_issues(&test_client(&server.base_url), &request("bogus ===", None))
            .await
            .expect_err("rejected");

        assert_eq!(error.message, "Failed to search JIRA issues: 400 Bad Request\nError in JQL");
    }
}
