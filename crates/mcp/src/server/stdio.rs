use anyhow::{Context, Result};
use rmcp::{ServerHandler, ServiceExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve `handler` over stdin/stdout until the client disconnects or SIGINT.
///
/// On SIGINT the service is cancelled, which closes the transport, and the
/// call returns `Ok`.
pub async fn serve_stdio<S>(handler: S) -> Result<()>
where
    S: ServerHandler,
{
    let cancellation_token = CancellationToken::new();
    let service = handler
        .serve_with_ct(rmcp::transport::stdio(), cancellation_token.clone())
        .await
        .context("failed to start MCP stdio transport")?;
    info!("MCP server running on stdio");

    let interrupt = tokio::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received interrupt, closing MCP transport");
                cancellation_token.cancel();
            }
        }
    });

    let reason = service.waiting().await.context("MCP service task failed")?;
    interrupt.abort();
    info!(?reason, "MCP server stopped");
    Ok(())
}
