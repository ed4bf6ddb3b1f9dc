use std::sync::Arc;

use hcc_jira_api::JiraClient;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;
use serde_json::Value;

use crate::jira::schemas::{
    AddCommentRequest, CreateIssueRequest, CreateMetadataRequest, EditIssueRequest, IssueCommentsRequest, IssueKeyRequest,
    SearchIssuesRequest,
};
use crate::jira::tools::{comments, issues, metadata, search};
use crate::server::json_text_result;
use crate::server::log_payload::emit_tool_log;

/// MCP handler exposing the JIRA tools over a shared client.
#[derive(Clone)]
pub struct JiraMcpCore {
    tool_router: ToolRouter<Self>,
    client: Arc<JiraClient>,
}

#[tool_router]
impl JiraMcpCore {
    pub fn new(client: Arc<JiraClient>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            client,
        }
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Search for JIRA issues using JQL (JIRA Query Language). Use 'issuekey = KEY' to fetch a single issue. Returns matching issues with their fields, the total number of matches, and the applied maxResults (default: 50, max: 100)."
    )]
    async fn search_jira_issues(&self, param: Parameters<SearchIssuesRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = search::search_issues(&self.client, &param.0).await;
        finish("search_jira_issues", &param.0, outcome)
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Get comprehensive details for a specific JIRA issue. Returns all fields including description, attachments, subtasks, links, and available transitions. Use this when working on a specific issue and need full information. Note: For comments use get_jira_issue_comments tool instead."
    )]
    async fn get_jira_issue_details(&self, param: Parameters<IssueKeyRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = issues::issue_details(&self.client, &param.0).await;
        finish("get_jira_issue_details", &param.0, outcome)
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Get metadata about creating issues in JIRA. Returns information about available projects, issue types, and required/optional fields for issue creation. Use this to understand what fields are needed before creating an issue."
    )]
    async fn get_jira_create_metadata(&self, param: Parameters<CreateMetadataRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = metadata::create_metadata(&self.client, &param.0).await;
        finish("get_jira_create_metadata", &param.0, outcome)
    }

    #[tool(
        annotations(open_world_hint = true),
        description = "Create a new JIRA issue. Requires project, summary, and issue type. Can include description, assignee, priority, labels, custom fields, and more. Returns the created issue key and details."
    )]
    async fn create_jira_issue(&self, param: Parameters<CreateIssueRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = issues::create_issue(&self.client, &param.0).await;
        finish("create_jira_issue", &param.0, outcome)
    }

    #[tool(
        annotations(open_world_hint = true),
        description = "Edit/update fields on a JIRA issue. Can update summary, description, assignee, priority, labels, custom fields, and more. Note: To change issue status, use transitions instead. Returns the updated field values."
    )]
    async fn edit_jira_issue(&self, param: Parameters<EditIssueRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = issues::edit_issue(&self.client, &param.0).await;
        finish("edit_jira_issue", &param.0, outcome)
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Get comments from a JIRA issue. Returns all comments with author, creation time, and comment body."
    )]
    async fn get_jira_issue_comments(&self, param: Parameters<IssueCommentsRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = comments::issue_comments(&self.client, &param.0).await;
        finish("get_jira_issue_comments", &param.0, outcome)
    }

    #[tool(
        annotations(open_world_hint = true),
        description = "Add a comment to a JIRA issue. Posts a new comment with the provided text."
    )]
    async fn add_jira_issue_comment(&self, param: Parameters<AddCommentRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = comments::add_comment(&self.client, &param.0).await;
        finish("add_jira_issue_comment", &param.0, outcome)
    }
}

/// Wrap a handler payload as the tool result and log the call.
fn finish<R: Serialize>(tool_name: &str, request: &R, payload: Result<Value, ErrorData>) -> Result<CallToolResult, ErrorData> {
    let outcome = payload.and_then(|payload| json_text_result(&payload));
    emit_tool_log(tool_name, serde_json::to_value(request).ok(), &outcome);
    outcome
}

#[tool_handler]
impl ServerHandler for JiraMcpCore {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "HCC JIRA MCP Server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("HCC JIRA MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(format!(
                "You are a Model Context Protocol (MCP) server for JIRA integration. You provide comprehensive assistance \
                 with JIRA operations, including getting detailed issue information, searching for issues, getting issue \
                 creation metadata, creating new issues, editing issue fields, retrieving comments, and posting comments.\n\n\
                 Connected to JIRA instance: {}",
                self.client.base_url()
            )),
        }
    }
}
