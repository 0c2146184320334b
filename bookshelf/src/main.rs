use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bookshelf::{
    backend::StoreBackendBuilder, catalog::Catalog, config::Config, http, memory::InMemoryStore,
};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    if let Err(err) = run(config).await {
        error!(error = %err, "bookshelf stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let backend = InMemoryStore::builder().build().await?;
    let catalog = Arc::new(Catalog::new(backend));

    http::serve(catalog, &config.bind, shutdown_signal()).await?;
    info!("bookshelf shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }

    info!("ctrl-c received, shutting down");
}
