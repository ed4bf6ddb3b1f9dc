//! Request execution and failure normalization.

use crate::JiraClient;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Upstream operations, each carrying the phrases used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JiraOperation {
    SearchIssues,
    GetIssueDetails,
    GetCreateMetadata,
    CreateIssue,
    EditIssue,
    GetIssueComments,
    AddComment,
}

impl JiraOperation {
    /// Imperative phrase, as in "Failed to search JIRA issues".
    pub fn action(self) -> &'static str {
        match self {
            JiraOperation::SearchIssues => "search JIRA issues",
            JiraOperation::GetIssueDetails => "get JIRA issue details",
            JiraOperation::GetCreateMetadata => "get JIRA create metadata",
            JiraOperation::CreateIssue => "create JIRA issue",
            JiraOperation::EditIssue => "edit JIRA issue",
            JiraOperation::GetIssueComments => "get JIRA issue comments",
            JiraOperation::AddComment => "add comment to JIRA issue",
        }
    }

    /// Progressive phrase, as in "Error searching JIRA issues".
    pub fn doing(self) -> &'static str {
        match self {
            JiraOperation::SearchIssues => "searching JIRA issues",
            JiraOperation::GetIssueDetails => "getting JIRA issue details",
            JiraOperation::GetCreateMetadata => "getting JIRA create metadata",
            JiraOperation::CreateIssue => "creating JIRA issue",
            JiraOperation::EditIssue => "editing JIRA issue",
            JiraOperation::GetIssueComments => "getting JIRA issue comments",
            JiraOperation::AddComment => "adding comment to JIRA issue",
        }
    }
}

impl fmt::Display for JiraOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Failure of a single upstream call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The server answered with a non-success status.
    #[error("Failed to {}: {status} {status_text}\n{body}", .operation.action())]
    Status {
        operation: JiraOperation,
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never produced a response.
    #[error("Error {}: {message}", .operation.doing())]
    Transport { operation: JiraOperation, message: String },

    /// A success response whose body could not be decoded.
    #[error("Error {}: {message}", .operation.doing())]
    Decode { operation: JiraOperation, message: String },
}

impl DispatchError {
    pub fn operation(&self) -> JiraOperation {
        match self {
            DispatchError::Status { operation, .. }
            | DispatchError::Transport { operation, .. }
            | DispatchError::Decode { operation, .. } => *operation,
        }
    }

    /// Upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl JiraClient {
    /// Send a request and fail on any non-success status.
    pub async fn execute(&self, operation: JiraOperation, request: RequestBuilder) -> Result<Response, DispatchError> {
        let response = request.send().await.map_err(|error| DispatchError::Transport {
            operation,
            message: error.to_string(),
        })?;

        let status = response.status();
        debug!(%operation, status = status.as_u16(), "received response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Status {
            operation,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    /// Send a request and decode its JSON body.
    pub async fn execute_json<T>(&self, operation: JiraOperation, request: RequestBuilder) -> Result<T, DispatchError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(operation, request).await?;
        response.json::<T>().await.map_err(|error| DispatchError::Decode {
            operation,
            message: error.to_string(),
        })
    }
}
