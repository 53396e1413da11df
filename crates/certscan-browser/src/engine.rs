use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::session::PageSession;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use tracing::{debug, warn};

/// Browser launch settings.
///
/// Headful is the default: the lookup site's challenge rejects headless
/// sessions far more often than windowed ones.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

/// Browser automation engine
///
/// Owns the Chromium process and hands out fingerprint-hardened page
/// sessions. One engine is shared by all workers; every fetch drives its
/// own exclusive session.
pub struct BrowserEngine {
    browser: Browser,
    fingerprint: FingerprintConfig,
}

impl BrowserEngine {
    /// Launch a browser with a randomized fingerprint.
    pub async fn launch(config: EngineConfig) -> Result<Self> {
        Self::launch_with_fingerprint(config, FingerprintConfig::randomized()).await
    }

    /// Launch a browser with a specific fingerprint.
    pub async fn launch_with_fingerprint(
        config: EngineConfig,
        fingerprint: FingerprintConfig,
    ) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(BrowserError::LaunchError)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::LaunchError(e.to_string()))?;

        // Drive CDP events until the browser goes away
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        debug!(headless = config.headless, "browser launched");

        Ok(Self {
            browser,
            fingerprint,
        })
    }

    /// Open a fresh page session with the engine's fingerprint applied.
    pub async fn new_session(&self) -> Result<PageSession> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        PageSession::prepare(page, &self.fingerprint).await
    }

    /// Shut the Chromium process down. Close failures are logged rather
    /// than propagated; the process reaps itself once the CDP connection
    /// drops.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("browser wait failed: {}", e);
        }
    }
}
