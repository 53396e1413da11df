//! Certscan Pipeline - Certificate lookup orchestration.
//!
//! This crate turns a list of certificate IDs into resolved grading records.
//! It coordinates browser automation, page parsing, and result assembly with
//! robust error handling including retry logic with exponential backoff,
//! bot-challenge detection, and a process-wide admission gate that spaces
//! outbound page loads.
//!
//! # Features
//!
//! - Concurrent lookups with configurable parallelism and input-order results
//! - Total-attempt retry budget with exponential backoff for transient failures
//! - Global rate limiting shared by every worker
//! - Best-effort HTML snapshots of pages that exhausted their retries
//!
//! # Example
//!
//! ```rust,ignore
//! use certscan_pipeline::{AdmissionGate, CertFetcher, RetryPolicy, Scheduler, SnapshotRecorder};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let fetcher = CertFetcher::new(engine, urls, Duration::from_millis(15_000));
//! let policy = RetryPolicy::new(
//!     Arc::new(fetcher),
//!     Arc::new(AdmissionGate::new(Duration::from_secs(1))),
//!     Arc::new(SnapshotRecorder::new("debug_snapshots")),
//!     3,
//!     Duration::from_secs(2),
//! );
//!
//! let records = Scheduler::new(Arc::new(policy), 5).run(cert_ids).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod fetcher;
#[allow(missing_docs)]
pub mod lookup;
pub mod observer;
#[allow(missing_docs)]
pub mod parser;
pub mod rate_limit;
pub mod retry;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use error::{FetchError, Result};
pub use fetcher::{CertFetcher, Fetcher};
pub use lookup::LookupUrlBuilder;
pub use observer::{NullObserver, ProgressObserver};
pub use parser::{ParseOutcome, ParsedCert};
pub use rate_limit::AdmissionGate;
pub use retry::{AttemptState, RetryPolicy};
pub use scheduler::Scheduler;
pub use snapshot::SnapshotRecorder;
