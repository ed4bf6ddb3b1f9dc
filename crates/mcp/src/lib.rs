//! Model Context Protocol (MCP) tool servers for the HCC frontend tooling.
//!
//! Two servers live here:
//!
//! - [`jira::JiraMcpCore`] proxies a JIRA instance (search, issue details,
//!   create/edit, comments, create metadata).
//! - [`feo::FeoMcpCore`] validates and scaffolds Frontend Operator
//!   `frontend.yaml` documents against a cached JSON Schema.
//!
//! Both are plain `rmcp` handlers; [`server`] hosts them over stdio or a
//! loopback streamable-HTTP endpoint.

pub mod feo;
pub mod jira;
pub mod server;

pub use feo::{FeoMcpCore, HttpSchemaSource, SchemaCache, SchemaCacheError, SchemaSource};
pub use jira::JiraMcpCore;
pub use server::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address, serve_stdio};
