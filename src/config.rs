use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub scraping: ScrapingConfig,
    pub screenshots: ScreenshotConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub radius_meters: f64,
    pub point_offset_degrees: f64,
    pub max_results: usize,
    pub page_follow_threshold: usize,
    pub point_delay_ms: u64,
    pub page_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    pub scrape_emails: bool,
    pub fetch_timeout_seconds: u64,
    pub max_contact_pages: usize,
    pub contact_page_workers: usize,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScreenshotConfig {
    pub enabled: bool,
    pub page_load_timeout_seconds: u64,
    pub window_width: u32,
    pub window_height: u32,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                radius_meters: 50_000.0,
                point_offset_degrees: 0.05,
                max_results: 500,
                page_follow_threshold: 100,
                point_delay_ms: 1000,
                page_delay_ms: 2000,
            },
            scraping: ScrapingConfig {
                scrape_emails: false,
                fetch_timeout_seconds: 10,
                max_contact_pages: 3,
                contact_page_workers: 3,
                retry_attempts: 3,
                retry_backoff_ms: 100,
            },
            screenshots: ScreenshotConfig {
                enabled: false,
                page_load_timeout_seconds: 30,
                window_width: 1920,
                window_height: 1080,
                thumbnail_width: 480,
                thumbnail_height: 270,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_variant() {
        let config = Config::default();
        assert_eq!(config.search.radius_meters, 50_000.0);
        assert_eq!(config.search.max_results, 500);
        assert_eq!(config.scraping.contact_page_workers, 3);
        assert!(!config.scraping.scrape_emails);
        assert!(!config.screenshots.enabled);
    }

    #[test]
    fn parses_partial_overrides_on_top_of_yaml() {
        let yaml = r#"
search:
  radius_meters: 50000
  point_offset_degrees: 0.05
  max_results: 200
  page_follow_threshold: 100
  point_delay_ms: 1000
  page_delay_ms: 2000
scraping:
  scrape_emails: true
  fetch_timeout_seconds: 10
  max_contact_pages: 3
  contact_page_workers: 3
  retry_attempts: 3
  retry_backoff_ms: 100
screenshots:
  enabled: false
  page_load_timeout_seconds: 30
  window_width: 1920
  window_height: 1080
  thumbnail_width: 480
  thumbnail_height: 270
logging:
  level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.search.max_results, 200);
        assert!(config.scraping.scrape_emails);
        assert_eq!(config.logging.level, "debug");
    }
}
