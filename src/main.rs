//! devserve binary entry point.
//!
//! Startup order: parse CLI, validate configuration, bind the listener,
//! print the reachable URL, then serve until interrupted.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devserve::cli::Cli;
use devserve::config::ServerConfig;
use devserve::http::HttpServer;
use devserve::net;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devserve=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Arc::new(ServerConfig::from_cli(&cli)?);

    tracing::info!(
        port = config.listener.port,
        directory = %config.static_dir.display(),
        proxies = config.proxy.len(),
        cgi = config.cgi,
        "Configuration loaded"
    );

    let listener = net::bind(config.listener.bind.as_deref(), config.listener.port)?;
    let local_addr = listener.local_addr()?;
    let url = net::reachable_url(&local_addr);

    println!(
        "Serving HTTP on {} port {} ({}) ...",
        local_addr.ip(),
        local_addr.port(),
        url
    );

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "Failed to open browser");
        }
    }

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
