// src/email_scraper/scraper.rs
use crate::config::ScrapingConfig;
use crate::email_scraper::extractor::EmailExtractor;
use crate::models::{Result, USER_AGENT};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Link text / href substrings that mark a contact-like subpage.
const CONTACT_KEYWORDS: [&str; 7] = [
    "contact",
    "about",
    "about-us",
    "about us",
    "kontakt",
    "contacto",
    "contact-us",
];

pub struct EmailScraper {
    client: Client,
    extractor: EmailExtractor,
    config: ScrapingConfig,
}

impl EmailScraper {
    pub fn new(config: ScrapingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            extractor: EmailExtractor::new(),
            config,
        })
    }

    /// Scrape a website and its contact-like subpages for addresses.
    /// Failures never propagate: any page that cannot be fetched or parsed
    /// contributes nothing.
    pub async fn scrape(&self, url: &str) -> Vec<String> {
        match self.scrape_site(url).await {
            Ok(emails) => emails,
            Err(e) => {
                warn!("Failed to scrape {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn scrape_site(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetch_with_retry(url).await?;

        // The homepage document doubles as the link-discovery source, so it
        // is parsed once and never refetched.
        let mut emails = self.extractor.extract_from_page(&html, url);
        let links = contact_links(&html, url, self.config.max_contact_pages);
        debug!("Found {} contact-like subpages on {}", links.len(), url);

        let subpage_results: Vec<HashSet<String>> = stream::iter(links)
            .map(|link| self.scrape_subpage(link))
            .buffer_unordered(self.config.contact_page_workers)
            .collect()
            .await;
        for subpage_emails in subpage_results {
            emails.extend(subpage_emails);
        }

        let mut all: Vec<String> = emails.into_iter().collect();
        all.sort();
        info!("Scraped {} unique emails from {}", all.len(), url);
        Ok(all)
    }

    async fn scrape_subpage(&self, url: String) -> HashSet<String> {
        match self.fetch_with_retry(&url).await {
            Ok(html) => self.extractor.extract_from_page(&html, &url),
            Err(e) => {
                warn!("Failed to fetch contact page {}: {}", url, e);
                HashSet::new()
            }
        }
    }

    /// Plain page fetch with the transient-5xx retry policy: up to
    /// `retry_attempts` tries, doubling backoff.
    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut last_error: Option<Box<dyn std::error::Error + Send + Sync>> = None;

        for attempt in 1..=self.config.retry_attempts {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_server_error() => {
                    last_error = Some(format!("HTTP error: {}", response.status()).into());
                }
                Ok(response) => {
                    let response = response.error_for_status()?;
                    return Ok(response.text().await?);
                }
                Err(e) => {
                    last_error = Some(e.into());
                }
            }

            if attempt < self.config.retry_attempts {
                debug!("Retrying {} after attempt {}", url, attempt);
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| "request failed".into()))
    }
}

/// Pick up to `limit` contact-like links from a page, resolved against its
/// base URL. Only http(s) targets are kept, in first-seen order.
pub fn contact_links(html: &str, base_url: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let base = url::Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let href = anchor.value().attr("href").unwrap_or_default();
        let href_lower = href.to_lowercase();
        let text_lower = anchor.text().collect::<Vec<_>>().join(" ").to_lowercase();

        if !CONTACT_KEYWORDS
            .iter()
            .any(|kw| href_lower.contains(kw) || text_lower.contains(kw))
        {
            continue;
        }

        let resolved = match url::Url::parse(href) {
            Ok(absolute) => Some(absolute),
            Err(_) => base.as_ref().and_then(|b| b.join(href).ok()),
        };

        if let Some(resolved) = resolved {
            if matches!(resolved.scheme(), "http" | "https") {
                let resolved = resolved.to_string();
                if seen.insert(resolved.clone()) {
                    links.push(resolved);
                    if links.len() == limit {
                        break;
                    }
                }
            }
        }
    }

    links
}
