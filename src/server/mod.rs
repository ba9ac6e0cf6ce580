// src/server/mod.rs
use crate::api::*;
use crate::config::Config;
use crate::email_scraper::EmailScraper;
use crate::models::Result;
use crate::places::PlacesClient;
use crate::screenshot::ScreenshotCapturer;
use rocket::{routes, Build, Rocket};

pub mod routes;

pub struct ServerState {
    pub config: Config,
    pub places: PlacesClient,
    pub email_scraper: EmailScraper,
    pub capturer: Option<ScreenshotCapturer>,
}

pub fn build_rocket(
    config: Config,
    api_key: String,
    webdriver_url: Option<String>,
) -> Result<Rocket<Build>> {
    let places = PlacesClient::new(api_key, config.search.clone())?;
    let email_scraper = EmailScraper::new(config.scraping.clone())?;

    let capturer = if config.screenshots.enabled {
        let url =
            webdriver_url.ok_or("WEBDRIVER_URL is required when screenshots are enabled")?;
        Some(ScreenshotCapturer::new(url, config.screenshots.clone()))
    } else {
        None
    };

    let state = ServerState {
        config,
        places,
        email_scraper,
        capturer,
    };

    Ok(rocket::build().manage(state).mount(
        "/",
        routes![
            routes::health::health_check,
            routes::health::index,
            crate::api::search::search,
            crate::api::export::download_csv,
        ],
    ))
}
