// src/places/search.rs
use crate::config::SearchConfig;
use crate::models::{GeoPoint, Result, USER_AGENT};
use crate::places::geocoder::Geocoder;
use crate::places::types::{Place, TextSearchResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.websiteUri,places.internationalPhoneNumber,places.nationalPhoneNumber,nextPageToken";

/// The two remote calls the aggregator depends on.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>>;

    async fn text_search(
        &self,
        query: &str,
        point: GeoPoint,
        page_token: Option<&str>,
    ) -> Result<TextSearchResponse>;
}

/// Live implementation against the geocoding and text-search endpoints.
pub struct GooglePlacesApi {
    client: Client,
    geocoder: Geocoder,
    api_key: String,
    radius_meters: f64,
}

impl GooglePlacesApi {
    pub fn new(api_key: String, radius_meters: f64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            geocoder: Geocoder::new(client.clone(), api_key.clone()),
            client,
            api_key,
            radius_meters,
        })
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesApi {
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>> {
        self.geocoder.geocode(location).await
    }

    async fn text_search(
        &self,
        query: &str,
        point: GeoPoint,
        page_token: Option<&str>,
    ) -> Result<TextSearchResponse> {
        let mut body = serde_json::json!({
            "textQuery": query,
            "locationBias": {
                "circle": {
                    "center": { "latitude": point.lat, "longitude": point.lng },
                    "radius": self.radius_meters,
                }
            }
        });
        if let Some(token) = page_token {
            body["pageToken"] = serde_json::Value::String(token.to_string());
        }

        let response = self
            .client
            .post(SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(format!("places api error {}: {}", status, message).into());
        }

        Ok(response.json().await?)
    }
}

pub struct PlacesClient {
    api: Box<dyn PlacesApi>,
    config: SearchConfig,
}

impl PlacesClient {
    pub fn new(api_key: String, config: SearchConfig) -> Result<Self> {
        let api = GooglePlacesApi::new(api_key, config.radius_meters)?;
        Ok(Self::with_api(Box::new(api), config))
    }

    pub fn with_api(api: Box<dyn PlacesApi>, config: SearchConfig) -> Self {
        Self { api, config }
    }

    /// Run the five-point aggregated search. Returns an empty list when the
    /// location cannot be geocoded, without issuing any point queries;
    /// per-point search failures are skipped.
    pub async fn search(&self, location: &str, keyword: &str) -> Result<Vec<Place>> {
        let center = match self.api.geocode(location).await? {
            Some(center) => center,
            None => {
                info!("No geocoding results for {:?}, skipping search", location);
                return Ok(Vec::new());
            }
        };

        let query = format!("{} in {}", keyword, location);
        let points = search_points(center, self.config.point_offset_degrees);
        let mut seen_ids = HashSet::new();
        let mut results = Vec::new();

        for (i, point) in points.iter().enumerate() {
            self.search_point(&query, *point, &mut seen_ids, &mut results)
                .await;

            if i < points.len() - 1 {
                tokio::time::sleep(Duration::from_millis(self.config.point_delay_ms)).await;
            }
        }

        results.truncate(self.config.max_results);
        info!(
            "Search for {:?} in {:?} returned {} unique places",
            keyword,
            location,
            results.len()
        );
        Ok(results)
    }

    /// Query one grid point, following continuation tokens while the
    /// aggregate stays under the follow threshold. Errors are logged and
    /// end this point only.
    async fn search_point(
        &self,
        query: &str,
        point: GeoPoint,
        seen_ids: &mut HashSet<String>,
        results: &mut Vec<Place>,
    ) {
        let mut page_token: Option<String> = None;

        loop {
            match self
                .api
                .text_search(query, point, page_token.as_deref())
                .await
            {
                Ok(page) => {
                    let added = merge_unique(page.places, seen_ids, results);
                    debug!(
                        "Point ({}, {}) page added {} places ({} total)",
                        point.lat,
                        point.lng,
                        added,
                        results.len()
                    );

                    page_token = page.next_page_token;
                    if page_token.is_none() || results.len() >= self.config.page_follow_threshold {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
                }
                Err(e) => {
                    warn!("Search failed at point ({}, {}): {}", point.lat, point.lng, e);
                    break;
                }
            }
        }
    }
}

/// Center plus the four cardinal offsets, in degrees.
pub fn search_points(center: GeoPoint, offset: f64) -> [GeoPoint; 5] {
    [
        center,
        GeoPoint { lat: center.lat + offset, lng: center.lng },
        GeoPoint { lat: center.lat - offset, lng: center.lng },
        GeoPoint { lat: center.lat, lng: center.lng + offset },
        GeoPoint { lat: center.lat, lng: center.lng - offset },
    ]
}

/// Append places whose id has not been seen yet; first occurrence wins.
/// Returns how many were added.
pub fn merge_unique(
    places: Vec<Place>,
    seen_ids: &mut HashSet<String>,
    results: &mut Vec<Place>,
) -> usize {
    let mut added = 0;
    for place in places {
        if seen_ids.insert(place.id.clone()) {
            results.push(place);
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::types::LocalizedText;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn place(id: &str, name: &str) -> Place {
        Place {
            id: id.to_string(),
            display_name: Some(LocalizedText {
                text: name.to_string(),
            }),
            formatted_address: Some("1 Main St".to_string()),
            website_uri: None,
            international_phone_number: None,
            national_phone_number: None,
        }
    }

    fn fast_config() -> SearchConfig {
        SearchConfig {
            radius_meters: 50_000.0,
            point_offset_degrees: 0.05,
            max_results: 500,
            page_follow_threshold: 100,
            point_delay_ms: 0,
            page_delay_ms: 0,
        }
    }

    /// Canned remote: a fixed geocode answer and the same place list for
    /// every point query, with a call counter.
    struct StubApi {
        center: Option<GeoPoint>,
        places_per_point: Vec<Place>,
        text_search_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlacesApi for StubApi {
        async fn geocode(&self, _location: &str) -> Result<Option<GeoPoint>> {
            Ok(self.center)
        }

        async fn text_search(
            &self,
            _query: &str,
            _point: GeoPoint,
            _page_token: Option<&str>,
        ) -> Result<TextSearchResponse> {
            self.text_search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(TextSearchResponse {
                places: self.places_per_point.clone(),
                next_page_token: None,
            })
        }
    }

    #[tokio::test]
    async fn unknown_location_short_circuits_without_point_queries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = PlacesClient::with_api(
            Box::new(StubApi {
                center: None,
                places_per_point: vec![place("p1", "Springfield Bakery")],
                text_search_calls: calls.clone(),
            }),
            fast_config(),
        );

        let results = client.search("Nowhereville", "bakery").await.unwrap();

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overlapping_points_collapse_to_one_business() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = PlacesClient::with_api(
            Box::new(StubApi {
                center: Some(GeoPoint { lat: 39.0, lng: -89.6 }),
                places_per_point: vec![place("p1", "Springfield Bakery")],
                text_search_calls: calls.clone(),
            }),
            fast_config(),
        );

        let results = client.search("Springfield", "bakery").await.unwrap();

        // One query per grid point, one surviving record.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p1");
        assert_eq!(
            results[0].display_name.as_ref().unwrap().text,
            "Springfield Bakery"
        );
    }

    fn assert_close(actual: GeoPoint, lat: f64, lng: f64) {
        assert!((actual.lat - lat).abs() < 1e-9, "lat {} != {}", actual.lat, lat);
        assert!((actual.lng - lng).abs() < 1e-9, "lng {} != {}", actual.lng, lng);
    }

    #[test]
    fn search_points_builds_center_and_cardinal_offsets() {
        let points = search_points(GeoPoint { lat: 39.0, lng: -89.6 }, 0.05);
        assert_close(points[0], 39.0, -89.6);
        assert_close(points[1], 39.05, -89.6);
        assert_close(points[2], 38.95, -89.6);
        assert_close(points[3], 39.0, -89.55);
        assert_close(points[4], 39.0, -89.65);
    }

    #[test]
    fn merge_keeps_first_occurrence_per_id() {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        merge_unique(
            vec![place("p1", "Springfield Bakery"), place("p2", "Other")],
            &mut seen,
            &mut results,
        );
        // The same place coming back from the four offset points.
        for _ in 0..4 {
            let added = merge_unique(
                vec![place("p1", "Springfield Bakery (dup)")],
                &mut seen,
                &mut results,
            );
            assert_eq!(added, 0);
        }

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "p1");
        assert_eq!(
            results[0].display_name.as_ref().unwrap().text,
            "Springfield Bakery"
        );
    }

    #[test]
    fn aggregate_caps_at_configured_maximum() {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let batch: Vec<Place> = (0..40).map(|i| place(&format!("p{}", i), "B")).collect();
        merge_unique(batch, &mut seen, &mut results);

        let max_results = 25;
        results.truncate(max_results);
        assert_eq!(results.len(), 25);

        let ids: HashSet<_> = results.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), results.len());
    }
}
