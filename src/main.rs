use std::error::Error;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maitri::adapters::http::build_router;
use maitri::application::{AppContext, EventSimulator};
use maitri::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let shutdown = CancellationToken::new();
    let ctx = AppContext::with_default_providers(config.streaming.clone())?
        .with_shutdown(shutdown.clone());
    tracing::info!(providers = ctx.registry.len(), "Providers registered");

    let simulator = if config.simulator.enabled {
        let simulator = EventSimulator::new(&ctx, config.simulator.clone());
        Some(tokio::spawn(simulator.run(shutdown.clone())))
    } else {
        None
    };

    let app = build_router(ctx.clone(), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    ctx.connections.disconnect_all().await;
    if let Some(simulator) = simulator {
        simulator.await?;
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
