pub mod config;
pub mod core;
pub mod huddle01;
pub mod providers;
pub mod upstream;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ProviderContext, TransportKind};
use crate::huddle01::Huddle01Client;
use crate::upstream::server::Huddle01Engine;

fn main() {
    // 1. Read configuration (file, then environment)
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("huddle01-mcp: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);
    tracing::info!("Starting Huddle01 MCP Server...");
    match &config.source {
        Some(path) => tracing::info!(path = %path.display(), "Loaded config file"),
        None => tracing::info!("No config file found, using environment and defaults"),
    }

    // 2. Credentials are checked once; nothing is served without them
    let context = match ProviderContext::from_config(&config.huddle01) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(base_url = %context.base_url(), "Configuration validated successfully");

    // 3. Build the runtime and serve until shutdown
    let runtime = match build_runtime(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build async runtime");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config, context)) {
        tracing::error!("Failed to start server: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config, context: ProviderContext) -> anyhow::Result<()> {
    let client = Arc::new(Huddle01Client::new(context)?);
    let registry = Arc::new(providers::build_registry(client));
    tracing::info!(tools = registry.list_tools().len(), "Tool catalog registered");

    let engine = Huddle01Engine::new(registry);
    match config.server.transport {
        TransportKind::Http => {
            upstream::serve::serve_http(
                engine,
                &config.server.bind,
                config.server.port,
                &config.server.path,
            )
            .await
        }
        TransportKind::Stdio => upstream::serve::serve_stdio(engine).await,
    }
}

fn build_runtime(config: &Config) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = config.server.workers {
        builder.worker_threads(workers.max(1));
    }
    builder.enable_all().build()
}

/// RUST_LOG wins over the configured level. Logs go to stderr so the stdio
/// transport keeps stdout for protocol frames.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
