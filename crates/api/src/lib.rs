//! JIRA REST client utilities.
//!
//! This crate provides a lightweight client for the JIRA REST API v2. It
//! focuses on:
//!
//! - Constructing an HTTP client with bearer authentication and JSON headers
//! - Validating the configured base URL
//! - Dispatching one request per operation and normalizing failures into
//!   [`DispatchError`]
//!
//! The primary entry point is [`JiraClient`]. Create one from stored or
//! environment [`Credentials`](hcc_util::Credentials), then call the typed
//! operations in [`endpoints`].
//!
//! # Example
//!
//! ```ignore
//! use hcc_jira_api::JiraClient;
//! use hcc_util::Credentials;
//!
//! async fn run() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("https://issues.example.com", "token");
//!     let client = JiraClient::new(&credentials)?;
//!     let page = client.search_issues("project = RHCLOUD", 25).await?;
//!     println!("{}", page["total"]);
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod endpoints;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::env;

use anyhow::{Context, Result, anyhow};
use hcc_util::Credentials;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, Url, header};
use tracing::debug;

pub use dispatch::{DispatchError, JiraOperation};
pub use endpoints::{CreateMetaFilter, DEFAULT_MAX_RESULTS, MAX_RESULTS_CEILING, clamp_max_results};

/// Characters escaped when a value is placed in a URL path segment.
///
/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )` is encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Prefix shared by every REST endpoint.
pub const REST_API_PREFIX: &str = "/rest/api/2";

/// Thin wrapper around a configured `reqwest::Client` for JIRA access.
///
/// The client pre-configures bearer authentication and JSON headers, and
/// builds requests against a validated base URL. No timeout is configured;
/// each request is a single attempt.
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl JiraClient {
    /// Construct a [`JiraClient`] from credentials.
    ///
    /// Trailing slashes on the base URL are trimmed so paths can be appended
    /// directly.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let base_url = credentials.base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", credentials.api_token))
            .context("JIRA API token contains characters that are not valid in a header")?;
        authorization.set_sensitive(true);

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("hcc-jira-mcp/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Human-facing link to an issue.
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.base_url, issue_key)
    }

    /// Build a `reqwest::RequestBuilder` for a method and a path relative to
    /// [`REST_API_PREFIX`].
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, REST_API_PREFIX, path);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Percent-encode a value for use as a single URL path segment.
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Validate that a base URL is usable: it must parse, use http(s), and name a host.
fn validate_base_url(base: &str) -> Result<()> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid JIRA base URL '{}': {}", base, e))?;

    if !matches!(parsed_base_url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "JIRA base URL must use http or https; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    if parsed_base_url.host_str().is_none() {
        return Err(anyhow!("JIRA base URL must include a host"));
    }

    Ok(())
}
