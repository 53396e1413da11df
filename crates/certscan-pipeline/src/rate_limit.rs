use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide admission gate spacing outbound fetches.
///
/// `acquire` returns only once at least `spacing` has elapsed since the
/// previous grant across all workers. The lock is held across the wait so
/// two callers can never read the same last-grant instant and both proceed
/// immediately; admission instants are strictly ordered.
#[derive(Debug)]
pub struct AdmissionGate {
    spacing: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl AdmissionGate {
    /// Create a gate enforcing `spacing` between fetch admissions. A zero
    /// spacing disables the wait.
    #[must_use]
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_grant: Mutex::new(None),
        }
    }

    /// Wait for this worker's turn to start a fetch.
    pub async fn acquire(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let mut last_grant = self.last_grant.lock().await;
        if let Some(previous) = *last_grant {
            let ready_at = previous + self.spacing;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_grant = Some(Instant::now());
    }
}
