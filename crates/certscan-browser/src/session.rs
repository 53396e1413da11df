use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetTimezoneOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use std::time::Duration;
use tracing::{trace, warn};

/// One exclusive browser tab with the engine's fingerprint applied.
///
/// chromiumoxide pages hold CDP targets that are only released by an
/// explicit async `close()`. The drop path spawns that close on the runtime
/// handle captured at construction, so error paths cannot leak tabs.
pub struct PageSession {
    page: Option<Page>,
    runtime: tokio::runtime::Handle,
}

impl PageSession {
    pub(crate) async fn prepare(page: Page, fingerprint: &FingerprintConfig) -> Result<Self> {
        page.set_user_agent(SetUserAgentOverrideParams::new(
            fingerprint.user_agent.clone(),
        ))
        .await
        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(fingerprint.viewport_width))
            .height(i64::from(fingerprint.viewport_height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        page.execute(metrics)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        page.execute(SetTimezoneOverrideParams::new(fingerprint.timezone.clone()))
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            fingerprint.stealth_script(),
        ))
        .await
        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        Ok(Self {
            page: Some(page),
            runtime: tokio::runtime::Handle::current(),
        })
    }

    /// Navigate and wait for the main frame to land, bounded by `timeout`.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        let page = self.page();
        let navigation = async {
            page.goto(url)
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
            Ok(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Serialize the current DOM to an HTML string.
    pub async fn content(&self) -> Result<String> {
        self.page()
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    /// Explicitly close the tab, consuming the session.
    pub async fn close(mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            page.close()
                .await
                .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
            trace!("page session closed");
        }
        Ok(())
    }

    fn page(&self) -> &Page {
        // Always Some until close() consumes the session
        self.page.as_ref().expect("page session used after close")
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            self.runtime.spawn(async move {
                if let Err(e) = page.close().await {
                    warn!("page close failed in drop: {}", e);
                }
            });
        }
    }
}
