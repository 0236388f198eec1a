use anyhow::Context;
use axum::{routing::get, Json, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};

use crate::upstream::server::Huddle01Engine;

/// Router with the MCP endpoint mounted at `mcp_path` and a `/healthz` liveness route.
pub fn build_router(engine: Huddle01Engine, mcp_path: &str) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(engine.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/healthz", get(health_check))
        .nest_service(mcp_path, mcp)
}

/// Liveness only; never touches the Huddle01 API.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve MCP over streamable HTTP until Ctrl-C.
pub async fn serve_http(engine: Huddle01Engine, bind: &str, port: u16, mcp_path: &str) -> anyhow::Result<()> {
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, path = %mcp_path, "Serving MCP over streamable HTTP");

    axum::serve(listener, build_router(engine, mcp_path))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Stopping Huddle01 MCP Server...");
    Ok(())
}

/// Serve MCP over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(engine: Huddle01Engine) -> anyhow::Result<()> {
    tracing::info!("Serving MCP over stdio");
    let running = rmcp::service::serve_server(engine, rmcp::transport::stdio())
        .await
        .context("MCP stdio initialization failed")?;
    let reason = running.waiting().await?;
    tracing::info!(reason = ?reason, "Stopping Huddle01 MCP Server...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, stopping server...");
}
