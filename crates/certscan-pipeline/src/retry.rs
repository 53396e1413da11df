//! Retry policy for transient fetch failures.
//!
//! Each certificate lookup walks an explicit attempt state machine. Every
//! attempt first waits for the admission gate, so retries are spaced the
//! same way fresh lookups are. Failed attempts back off exponentially from
//! a base delay; once the attempt budget is spent, the final page state is
//! snapshotted best-effort and the lookup resolves to an error record.

use std::sync::Arc;
use std::time::Duration;

use certscan_core::{CertId, CertRecord};

use crate::fetcher::Fetcher;
use crate::observer::{NullObserver, ProgressObserver};
use crate::rate_limit::AdmissionGate;
use crate::snapshot::SnapshotRecorder;

/// Lifecycle of one certificate lookup under retry.
///
/// `Pending` moves to `Attempting` with attempt number 1. A failed attempt
/// moves to `Retrying` while budget remains, otherwise `Exhausted`.
/// `Succeeded` and `Exhausted` are terminal.
#[derive(Debug)]
pub enum AttemptState {
    /// No attempt started yet
    Pending,
    /// Attempt `attempt` (1-based) is executing
    Attempting {
        /// 1-based attempt number
        attempt: u32,
    },
    /// Attempt `attempt` failed; waiting `delay` before the next one
    Retrying {
        /// The attempt that just failed
        attempt: u32,
        /// Backoff before the next attempt
        delay: Duration,
    },
    /// A fetch resolved the lookup (found or definitively not found)
    Succeeded(CertRecord),
    /// The whole attempt budget failed
    Exhausted {
        /// Message from the final failed attempt
        last_error: String,
    },
}

/// Drives fetch attempts for one certificate at a time.
pub struct RetryPolicy {
    fetcher: Arc<dyn Fetcher>,
    gate: Arc<AdmissionGate>,
    snapshots: Arc<SnapshotRecorder>,
    observer: Arc<dyn ProgressObserver>,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with a total budget of `max_retries` attempts and an
    /// exponential backoff starting at `base_delay`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        gate: Arc<AdmissionGate>,
        snapshots: Arc<SnapshotRecorder>,
        max_retries: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            gate,
            snapshots,
            observer: Arc::new(NullObserver),
            max_retries,
            base_delay,
        }
    }

    /// Report attempt starts to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolve one certificate, retrying transient failures until the
    /// attempt budget is spent. Always produces a record.
    pub async fn execute(&self, cert_id: &CertId) -> CertRecord {
        let mut state = AttemptState::Pending;
        loop {
            state = match state {
                AttemptState::Pending => AttemptState::Attempting { attempt: 1 },
                AttemptState::Attempting { attempt } => self.run_attempt(cert_id, attempt).await,
                AttemptState::Retrying { attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    AttemptState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                AttemptState::Succeeded(record) => return record,
                AttemptState::Exhausted { last_error } => {
                    self.capture_snapshot(cert_id).await;
                    return CertRecord::error(cert_id.clone(), last_error);
                }
            };
        }
    }

    async fn run_attempt(&self, cert_id: &CertId, attempt: u32) -> AttemptState {
        self.observer.on_attempt(cert_id, attempt, self.max_retries);
        self.gate.acquire().await;

        match self.fetcher.fetch(cert_id).await {
            Ok(record) => AttemptState::Succeeded(record),
            Err(e) if attempt < self.max_retries => {
                let delay = self.backoff_delay(attempt);
                tracing::warn!(
                    "Fetch failed for certificate {} (attempt {}/{}), retrying in {:?}: {}",
                    cert_id,
                    attempt,
                    self.max_retries,
                    delay,
                    e
                );
                AttemptState::Retrying { attempt, delay }
            }
            Err(e) => {
                tracing::warn!(
                    "Fetch failed for certificate {} (attempt {}/{}), giving up: {}",
                    cert_id,
                    attempt,
                    self.max_retries,
                    e
                );
                AttemptState::Exhausted {
                    last_error: e.to_string(),
                }
            }
        }
    }

    /// Backoff after `failed_attempt`: `base_delay * 2^(failed_attempt - 1)`.
    fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        self.base_delay
            .mul_f64(2f64.powf(f64::from(failed_attempt - 1)))
    }

    /// Best-effort capture of the page state that exhausted the budget.
    async fn capture_snapshot(&self, cert_id: &CertId) {
        self.gate.acquire().await;
        match self.fetcher.page_source(cert_id).await {
            Ok(html) => self.snapshots.save(cert_id, &html).await,
            Err(e) => {
                tracing::warn!(
                    "Failed to capture page state for certificate {}: {}",
                    cert_id,
                    e
                );
            }
        }
    }
}
