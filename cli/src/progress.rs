//! Console progress reporting.

use certscan_core::{CertId, CertRecord};
use certscan_pipeline::ProgressObserver;
use tracing::info;

/// Logs per-identifier progress as lookups resolve.
pub struct ConsoleObserver;

impl ProgressObserver for ConsoleObserver {
    fn on_attempt(&self, cert_id: &CertId, attempt: u32, max_retries: u32) {
        if attempt > 1 {
            info!(
                "Retrying certificate {} (attempt {}/{})",
                cert_id, attempt, max_retries
            );
        }
    }

    fn on_resolved(&self, record: &CertRecord, completed: usize, total: usize) {
        info!(
            "[{}/{}] Certificate {}: {}",
            completed,
            total,
            record.cert_id,
            record.status.display_name()
        );
    }
}
