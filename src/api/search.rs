// src/api/search.rs
use crate::models::Business;
use crate::server::ServerState;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{post, State};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub location: Option<String>,
    pub keyword: Option<String>,
}

#[post("/search", data = "<request>")]
pub async fn search(
    state: &State<ServerState>,
    request: Json<SearchRequest>,
) -> status::Custom<Json<Value>> {
    let location = request.location.as_deref().unwrap_or("").trim().to_string();
    let keyword = request.keyword.as_deref().unwrap_or("").trim().to_string();

    if location.is_empty() || keyword.is_empty() {
        return status::Custom(
            Status::BadRequest,
            Json(json!({ "error": "Location and keyword are required" })),
        );
    }

    let places = match state.places.search(&location, &keyword).await {
        Ok(places) => places,
        Err(e) => {
            error!("Search error: {}", e);
            return status::Custom(
                Status::InternalServerError,
                Json(json!({ "error": e.to_string() })),
            );
        }
    };

    if places.is_empty() {
        return status::Custom(
            Status::NotFound,
            Json(json!({ "error": "No results found" })),
        );
    }

    let mut businesses: Vec<Business> = places.iter().map(Business::from_place).collect();

    // Optional enrichment, one business at a time. Emails fan out to at most
    // three contact pages internally; screenshots hold a driver session and
    // must not overlap.
    for business in businesses.iter_mut() {
        let Some(website) = business.website.clone() else {
            continue;
        };
        if state.config.scraping.scrape_emails {
            business.emails = state.email_scraper.scrape(&website).await;
        }
        if let Some(capturer) = &state.capturer {
            business.screenshot = capturer.capture(&website).await;
        }
    }

    info!(
        "Returning {} businesses for {:?} in {:?}",
        businesses.len(),
        keyword,
        location
    );
    status::Custom(
        Status::Ok,
        Json(json!({ "success": true, "businesses": businesses })),
    )
}
