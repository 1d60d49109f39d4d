mod cli;
mod telemetry;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use clipper_gateway::{App, AppState};
use clipper_generator::RandomGenerator;
use clipper_service::ShortenerService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format)?;

    let storage = config.storage_config();
    info!(
        server_address = %config.server_address,
        base_url = %config.base_url,
        storage_backend = %storage,
        slug_length = config.slug_length,
        "starting gateway server"
    );

    let repository = clipper_storage::open(&storage)
        .await
        .with_context(|| format!("failed to open {storage} storage"))?;
    let generator = RandomGenerator::alphanumeric(config.slug_length)?;
    let service = ShortenerService::new(Arc::clone(&repository), generator, config.base_url);

    let router = App::router(AppState::new(Arc::new(service)));
    let listener = tokio::net::TcpListener::bind(config.server_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server_address))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repository.close().await;
    info!("gateway server stopped");
    Ok(served?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
