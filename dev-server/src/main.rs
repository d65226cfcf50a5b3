//! Development server for the market back office UI
//!
//! Runs the mock API with a seeded dataset so the UI can be developed without
//! the real backend.
//!
//! Environment variables (a .env file in the project root also works):
//! - IP_ADDRESS: bind address, defaults to 127.0.0.1
//! - PORT: defaults to 8090, the UI's default backend port
//! - ALLOWED_ORIGINS: CORS origins, "*" by default
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use test_helpers::mock::DevDataset;
use test_helpers::server::Config;
use test_helpers::telemetry::{get_subscriber, init_subscriber, log_error};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = get_subscriber("info");
    init_subscriber(subscriber);

    info!("🚀 Starting market development server");
    let app = test_helpers::spawn_app_with(Config::from_env()).await;
    info!("✅ Mock API running on {}", app.base_url());

    info!("📊 Setting up development data...");
    let dataset = match DevDataset::create(&app).await {
        Ok(dataset) => dataset,
        Err(e) => {
            log_error(e);
            anyhow::bail!("could not seed the development dataset");
        }
    };

    info!("🎯 Development server ready!");
    info!("   API: {}", app.base_url());
    info!(
        "   UI:  cd ui && BACKEND_URL={} trunk serve",
        app.base_url()
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
