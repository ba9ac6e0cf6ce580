// src/places/geocoder.rs
use crate::models::{GeoPoint, Result};
use crate::places::types::GeocodeResponse;
use reqwest::Client;
use tracing::debug;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub struct Geocoder {
    client: Client,
    api_key: String,
}

impl Geocoder {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Resolve a free-text location to coordinates. `Ok(None)` means the
    /// geocoder answered but knows no such place; transport and decode
    /// failures are errors.
    pub async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>> {
        let response = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", location), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: GeocodeResponse = response.json().await?;
        let center = body.results.into_iter().next().map(|result| GeoPoint {
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
        });

        debug!("Geocoded {:?} to {:?}", location, center);
        Ok(center)
    }
}
