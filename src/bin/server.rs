use std::sync::Arc;

use foundation_backend::api;
use foundation_backend::app;
use foundation_backend::config::Config;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!(namespace = %config.namespace, seed = config.seed_sample_data, "opening backend");
    let api = Arc::new(app::open(&config)?);

    api::serve(api, &config.bind_addr).await?;
    Ok(())
}
