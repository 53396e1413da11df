//! Single-attempt certificate page fetching.
//!
//! A [`CertFetcher`] drives one browser session per attempt: open a fresh
//! fingerprinted page, navigate to the lookup URL, then poll the rendered
//! DOM until the certificate fields appear, a definitive not-found marker
//! shows up, or the content wait expires. The [`Fetcher`] trait is the seam
//! the retry policy works through, so attempt handling can be tested
//! without a browser.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certscan_browser::{BrowserEngine, PageSession};
use certscan_core::{CertId, CertRecord};
use tokio::time::Instant;

use crate::error::{FetchError, Result};
use crate::lookup::LookupUrlBuilder;
use crate::parser::{self, ParseOutcome};

/// How often the rendered DOM is re-checked during the content wait.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Delay after navigation before the first content check, giving the page's
/// scripts a chance to hydrate.
const DEFAULT_SETTLE: Duration = Duration::from_millis(1500);

/// Longer settle used when capturing a diagnostic page source.
const DEFAULT_SNAPSHOT_SETTLE: Duration = Duration::from_millis(2000);

/// One lookup attempt against the grading service.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Resolve a certificate ID to a record in a single attempt.
    ///
    /// Returns `Ok` for both successful lookups and definitive not-found
    /// pages; `Err` means the attempt failed transiently and may be retried.
    async fn fetch(&self, cert_id: &CertId) -> Result<CertRecord>;

    /// Capture the raw page source for a certificate, for diagnostics.
    async fn page_source(&self, cert_id: &CertId) -> Result<String>;
}

/// Browser-backed [`Fetcher`] for the grading service's lookup pages.
pub struct CertFetcher {
    engine: Arc<BrowserEngine>,
    urls: LookupUrlBuilder,
    timeout: Duration,
    settle: Duration,
    snapshot_settle: Duration,
}

impl CertFetcher {
    /// Create a fetcher that waits up to `timeout` for certificate content.
    #[must_use]
    pub fn new(engine: Arc<BrowserEngine>, urls: LookupUrlBuilder, timeout: Duration) -> Self {
        Self {
            engine,
            urls,
            timeout,
            settle: DEFAULT_SETTLE,
            snapshot_settle: DEFAULT_SNAPSHOT_SETTLE,
        }
    }

    /// Set the post-navigation settle delay before the first content check.
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Set the settle delay used when capturing a diagnostic page source.
    #[must_use]
    pub fn with_snapshot_settle(mut self, settle: Duration) -> Self {
        self.snapshot_settle = settle;
        self
    }

    async fn resolve_on_page(&self, session: &PageSession, cert_id: &CertId) -> Result<CertRecord> {
        let url = self.urls.cert_url(cert_id);
        session.navigate(&url, self.timeout).await?;
        tokio::time::sleep(self.settle).await;

        let deadline = Instant::now() + self.timeout;
        let mut last = ParseOutcome::Blank;

        loop {
            let html = session.content().await?;
            match parser::classify(&html) {
                ParseOutcome::Found(cert) => {
                    tracing::debug!(
                        "Fetched certificate {}: {} - {}",
                        cert_id,
                        cert.card_name,
                        cert.grade
                    );
                    return Ok(CertRecord::found(cert_id.clone(), cert.card_name, cert.grade));
                }
                ParseOutcome::NotFound => {
                    tracing::debug!("Certificate {} not found on lookup page", cert_id);
                    return Ok(CertRecord::not_found(cert_id.clone()));
                }
                outcome => last = outcome,
            }

            if Instant::now() >= deadline {
                return Err(terminal_error(&last, self.timeout_ms()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn capture_source(&self, session: &PageSession, cert_id: &CertId) -> Result<String> {
        let url = self.urls.cert_url(cert_id);
        session.navigate(&url, self.timeout).await?;
        tokio::time::sleep(self.snapshot_settle).await;
        Ok(session.content().await?)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

#[async_trait]
impl Fetcher for CertFetcher {
    async fn fetch(&self, cert_id: &CertId) -> Result<CertRecord> {
        tracing::debug!("Fetching certificate {}", cert_id);
        let session = self.engine.new_session().await?;
        let outcome = self.resolve_on_page(&session, cert_id).await;
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close page for certificate {}: {}", cert_id, e);
        }
        outcome
    }

    async fn page_source(&self, cert_id: &CertId) -> Result<String> {
        let session = self.engine.new_session().await?;
        let source = self.capture_source(&session, cert_id).await;
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close page for certificate {}: {}", cert_id, e);
        }
        source
    }
}

/// Map the last non-terminal parse outcome at the deadline to the error
/// that best describes why the wait expired.
fn terminal_error(last: &ParseOutcome, timeout_ms: u64) -> FetchError {
    match last {
        ParseOutcome::Challenge => FetchError::Challenge,
        ParseOutcome::Unrecognized => FetchError::Unparseable,
        _ => FetchError::Timeout { timeout_ms },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_error_challenge() {
        let err = terminal_error(&ParseOutcome::Challenge, 15_000);
        assert!(matches!(err, FetchError::Challenge));
    }

    #[test]
    fn test_terminal_error_unrecognized() {
        let err = terminal_error(&ParseOutcome::Unrecognized, 15_000);
        assert!(matches!(err, FetchError::Unparseable));
    }

    #[test]
    fn test_terminal_error_blank_is_timeout() {
        let err = terminal_error(&ParseOutcome::Blank, 15_000);
        assert!(matches!(err, FetchError::Timeout { timeout_ms: 15_000 }));
    }
}
