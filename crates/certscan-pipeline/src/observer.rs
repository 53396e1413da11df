use certscan_core::{CertId, CertRecord, RunSummary};

/// Lightweight progress reporting for a lookup run.
///
/// Frontends implement this to surface status to users; the pipeline stays
/// free of console coupling. All methods default to no-ops.
pub trait ProgressObserver: Send + Sync {
    /// Called when an attempt for an identifier begins (including retries).
    fn on_attempt(&self, _cert_id: &CertId, _attempt: u32, _max_retries: u32) {}

    /// Called exactly once per identifier, when it resolves.
    fn on_resolved(&self, _record: &CertRecord, _completed: usize, _total: usize) {}

    /// Called once at the end of the run.
    fn on_summary(&self, _summary: &RunSummary) {}
}

/// A no-op progress sink.
pub struct NullObserver;

impl ProgressObserver for NullObserver {}
