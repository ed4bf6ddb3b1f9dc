mod content;
pub(crate) mod errors;
mod http;
pub(crate) mod log_payload;
mod stdio;

pub(crate) use content::{json_text_result, markdown_result};
#[cfg(test)]
pub(crate) use content::first_text;
pub use http::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use stdio::serve_stdio;
