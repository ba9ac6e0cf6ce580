// src/main.rs
use models::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod email_scraper;
mod export;
mod models;
mod places;
mod screenshot;
mod server;

use config::{load_config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let (config, config_error) = match load_config("config.yml").await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("lead_finder={}", config.logging.level).parse()?),
        )
        .init();

    // The subscriber has to exist before this warning can be seen.
    if let Some(e) = config_error {
        warn!("Failed to load config.yml: {}. Using defaults.", e);
    }

    let api_key = std::env::var("PLACES_API_KEY")
        .map_err(|_| "PLACES_API_KEY environment variable is required")?;
    let webdriver_url = std::env::var("WEBDRIVER_URL").ok();

    let rocket = server::build_rocket(config, api_key, webdriver_url)?;
    let _ = rocket.launch().await?;

    Ok(())
}
