use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// User-agent for all outbound page and API fetches.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; LeadFinder/1.0)";

/// One geographic coordinate on the search-point grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Transport-encoded screenshot pair for one business homepage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotPair {
    pub full: String,
    pub thumbnail: String,
}

/// Flat business record as returned by `/search` and exported to CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub website: Option<String>,
    pub address: String,
    pub has_website: bool,
    pub phone: Option<String>,
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotPair>,
}
