// src/places/normalizer.rs
use crate::models::Business;
use crate::places::types::Place;
use url::Url;

/// Canonicalize a raw website value to its `scheme://host` origin.
/// Prepends `https://` when the scheme is missing; empty or unparseable
/// input yields `None`.
pub fn clean_website_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), host))
}

impl Business {
    /// Flatten a raw place record. Email and screenshot enrichment happen
    /// later, on the optional paths.
    pub fn from_place(place: &Place) -> Self {
        let website = place
            .website_uri
            .as_deref()
            .and_then(clean_website_url);
        let phone = place
            .international_phone_number
            .clone()
            .or_else(|| place.national_phone_number.clone())
            .filter(|p| !p.is_empty());

        Self {
            name: place
                .display_name
                .as_ref()
                .map(|n| n.text.clone())
                .unwrap_or_default(),
            has_website: place.website_uri.as_deref().is_some_and(|w| !w.is_empty()),
            website,
            address: place.formatted_address.clone().unwrap_or_default(),
            phone,
            emails: Vec::new(),
            screenshot: None,
        }
    }
}
