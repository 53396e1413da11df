//! Concurrent scheduling of certificate lookups.
//!
//! The scheduler keeps up to `concurrency` lookups in flight at once: as
//! soon as one resolves, its slot is handed to the next pending identifier
//! rather than waiting for a whole batch to drain. Results are reassembled
//! in input order regardless of completion order.

use std::sync::Arc;

use certscan_core::{CertId, CertRecord, RunSummary};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::observer::{NullObserver, ProgressObserver};
use crate::retry::RetryPolicy;

/// Runs a batch of certificate lookups with bounded concurrency.
pub struct Scheduler {
    policy: Arc<RetryPolicy>,
    observer: Arc<dyn ProgressObserver>,
    concurrency: usize,
}

impl Scheduler {
    /// Create a scheduler running at most `concurrency` lookups at once.
    /// A zero concurrency is treated as one.
    #[must_use]
    pub fn new(policy: Arc<RetryPolicy>, concurrency: usize) -> Self {
        Self {
            policy,
            observer: Arc::new(NullObserver),
            concurrency: concurrency.max(1),
        }
    }

    /// Report per-identifier completion and the final summary to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolve every identifier and return records in input order.
    ///
    /// Each input identifier yields exactly one record, duplicates
    /// included. The observer sees one `on_resolved` per identifier and
    /// one `on_summary` at the end.
    pub async fn run(&self, cert_ids: Vec<CertId>) -> Vec<CertRecord> {
        let total = cert_ids.len();
        let mut slots: Vec<Option<CertRecord>> = Vec::new();
        slots.resize_with(total, || None);

        let mut futures = FuturesUnordered::new();
        let mut completed = 0usize;

        for (index, cert_id) in cert_ids.into_iter().enumerate() {
            futures.push(self.resolve_one(index, cert_id));

            // Respect concurrency limit
            while futures.len() >= self.concurrency {
                if let Some((slot, record)) = futures.next().await {
                    completed += 1;
                    self.observer.on_resolved(&record, completed, total);
                    slots[slot] = Some(record);
                }
            }
        }

        // Collect remaining results
        while let Some((slot, record)) = futures.next().await {
            completed += 1;
            self.observer.on_resolved(&record, completed, total);
            slots[slot] = Some(record);
        }

        let records: Vec<CertRecord> = slots.into_iter().flatten().collect();
        let summary = RunSummary::tally(&records);
        tracing::info!("Run complete: {}", summary);
        self.observer.on_summary(&summary);
        records
    }

    async fn resolve_one(&self, index: usize, cert_id: CertId) -> (usize, CertRecord) {
        tracing::debug!("Processing certificate {}", cert_id);
        let record = self.policy.execute(&cert_id).await;
        (index, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::fetcher::Fetcher;
    use crate::rate_limit::AdmissionGate;
    use crate::snapshot::SnapshotRecorder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Resolves every identifier to `Found`, sleeping longer for smaller
    /// IDs so completion order scrambles relative to input order.
    struct SleepyFetcher;

    #[async_trait]
    impl Fetcher for SleepyFetcher {
        async fn fetch(&self, cert_id: &CertId) -> Result<CertRecord> {
            let numeric: u64 = cert_id.as_str().parse().unwrap();
            tokio::time::sleep(Duration::from_millis(100 - numeric)).await;
            Ok(CertRecord::found(
                cert_id.clone(),
                format!("Card {numeric}"),
                "10",
            ))
        }

        async fn page_source(&self, _cert_id: &CertId) -> Result<String> {
            Ok(String::new())
        }
    }

    /// Tracks how many fetches are in flight at once.
    struct GaugeFetcher {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl GaugeFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for GaugeFetcher {
        async fn fetch(&self, cert_id: &CertId) -> Result<CertRecord> {
            let in_flight = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(in_flight, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(CertRecord::not_found(cert_id.clone()))
        }

        async fn page_source(&self, _cert_id: &CertId) -> Result<String> {
            Ok(String::new())
        }
    }

    struct CountingObserver {
        resolved: Mutex<Vec<(String, usize)>>,
        summaries: AtomicUsize,
    }

    impl ProgressObserver for CountingObserver {
        fn on_resolved(&self, record: &CertRecord, completed: usize, _total: usize) {
            self.resolved
                .lock()
                .unwrap()
                .push((record.cert_id.to_string(), completed));
        }

        fn on_summary(&self, _summary: &RunSummary) {
            self.summaries.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ids(raw: &[&str]) -> Vec<CertId> {
        raw.iter().map(|id| CertId::new(*id).unwrap()).collect()
    }

    fn scheduler_with(fetcher: Arc<dyn Fetcher>, concurrency: usize) -> (Scheduler, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let policy = RetryPolicy::new(
            fetcher,
            Arc::new(AdmissionGate::new(Duration::ZERO)),
            Arc::new(SnapshotRecorder::new(dir.path())),
            3,
            Duration::from_millis(10),
        );
        (Scheduler::new(Arc::new(policy), concurrency), dir)
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_come_back_in_input_order() {
        let (scheduler, _dir) = scheduler_with(Arc::new(SleepyFetcher), 4);

        let records = scheduler.run(ids(&["30", "10", "20", "40"])).await;

        let order: Vec<&str> = records.iter().map(|r| r.cert_id.as_str()).collect();
        assert_eq!(order, vec!["30", "10", "20", "40"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicates_resolve_independently() {
        let (scheduler, _dir) = scheduler_with(Arc::new(SleepyFetcher), 2);

        let records = scheduler.run(ids(&["7", "7", "7"])).await;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.cert_id.as_str() == "7"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_completes() {
        let (scheduler, _dir) = scheduler_with(Arc::new(SleepyFetcher), 5);
        let records = scheduler.run(Vec::new()).await;
        assert!(records.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_never_exceeds_concurrency() {
        for concurrency in [1usize, 5, 50] {
            let fetcher = GaugeFetcher::new();
            let (scheduler, _dir) = scheduler_with(Arc::clone(&fetcher) as Arc<dyn Fetcher>, concurrency);

            let raw: Vec<String> = (1..=8).map(|n| n.to_string()).collect();
            let cert_ids: Vec<CertId> = raw.iter().map(|id| CertId::new(id).unwrap()).collect();
            let records = scheduler.run(cert_ids).await;

            assert_eq!(records.len(), 8);
            assert_eq!(
                fetcher.peak(),
                concurrency.min(8),
                "peak in-flight for concurrency {concurrency}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_each_id_exactly_once() {
        let observer = Arc::new(CountingObserver {
            resolved: Mutex::new(Vec::new()),
            summaries: AtomicUsize::new(0),
        });
        let (scheduler, _dir) = scheduler_with(Arc::new(SleepyFetcher), 3);
        let scheduler = scheduler.with_observer(Arc::clone(&observer) as Arc<dyn ProgressObserver>);

        scheduler.run(ids(&["5", "15", "25", "35"])).await;

        let resolved = observer.resolved.lock().unwrap();
        let mut seen: Vec<&str> = resolved.iter().map(|(id, _)| id.as_str()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["15", "25", "35", "5"]);

        let counts: Vec<usize> = resolved.iter().map(|(_, completed)| *completed).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        assert_eq!(observer.summaries.load(Ordering::SeqCst), 1);
    }
}
