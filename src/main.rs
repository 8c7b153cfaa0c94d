use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use presence_relay::adapters::http::build_router;
use presence_relay::adapters::registry::InMemoryConnectionRegistry;
use presence_relay::application::RealtimeServices;
use presence_relay::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Defaults < .env < environment
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server)?;

    tracing::info!(
        environment = ?config.server.environment,
        outbound_buffer = config.realtime.outbound_buffer,
        "presence-relay v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let services = RealtimeServices::new(Arc::new(InMemoryConnectionRegistry::new()));
    let app = build_router(&services, &config);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured directive.
fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&server.log_level)?,
    };

    if server.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
