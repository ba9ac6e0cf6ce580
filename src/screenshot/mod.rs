// src/screenshot/mod.rs
use crate::config::ScreenshotConfig;
use crate::models::{Result, ScreenshotPair};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::common::command::Command;
use thirtyfour::OptionRect;
use tracing::{debug, warn};

/// Captures a homepage as a full image plus thumbnail, both base64-encoded
/// PNG. Each capture opens its own WebDriver session and tears it down on
/// every exit path; nothing is shared between captures.
pub struct ScreenshotCapturer {
    webdriver_url: String,
    config: ScreenshotConfig,
}

impl ScreenshotCapturer {
    pub fn new(webdriver_url: String, config: ScreenshotConfig) -> Self {
        Self {
            webdriver_url,
            config,
        }
    }

    /// Non-fatal per item: any failure logs a warning and yields `None`.
    pub async fn capture(&self, url: &str) -> Option<ScreenshotPair> {
        match self.capture_session(url).await {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("Screenshot capture failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn capture_session(&self, url: &str) -> Result<ScreenshotPair> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()?;
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.set_disable_gpu()?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            self.config.window_width, self.config.window_height
        ))?;

        let driver = WebDriver::new(&self.webdriver_url, caps).await?;

        // The session must be quit no matter how the capture went.
        let result = self.capture_with_driver(&driver, url).await;
        if let Err(e) = driver.quit().await {
            warn!("Failed to quit WebDriver session: {}", e);
        }
        result
    }

    async fn capture_with_driver(&self, driver: &WebDriver, url: &str) -> Result<ScreenshotPair> {
        driver
            .set_page_load_timeout(Duration::from_secs(self.config.page_load_timeout_seconds))
            .await?;
        driver.goto(url).await?;

        let full_png = driver.screenshot_as_png().await?;
        debug!("Captured {} byte screenshot of {}", full_png.len(), url);

        driver
            .cmd(Command::SetWindowRect(
                OptionRect::new()
                    .with_size(self.config.thumbnail_width as i64, self.config.thumbnail_height as i64),
            ))
            .await?;
        let thumbnail_png = driver.screenshot_as_png().await?;

        Ok(ScreenshotPair {
            full: STANDARD.encode(&full_png),
            thumbnail: STANDARD.encode(&thumbnail_png),
        })
    }
}
