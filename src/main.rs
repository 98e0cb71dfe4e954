//! Server binary.
//!
//! Installs the tracing subscriber and runs the gateway. No `metrics`
//! recorder is installed here, so the `search_*_total` counters are no-ops
//! until one is set with `metrics::set_global_recorder` before
//! [`server::run`].

use anyhow::Result;
use product_search_gateway::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.print_summary();

    server::run(config).await
}
