//! Certscan Core - Foundation crate for the certscan lookup pipeline.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the browser, pipeline, and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`CertId`, `CertRecord`, `RunSummary`)
//!
//! # Example
//!
//! ```rust
//! use certscan_core::{CertId, CertRecord, LookupStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = CertId::new("27002504")?;
//! let record = CertRecord::found(id, "Ace of Spades", "10");
//! assert_eq!(record.status, LookupStatus::Found);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, LookupConfig, ScanningConfig, SnapshotConfig};
pub use error::{CertScanError, ConfigError, ConfigResult, Result};
pub use types::{CertId, CertRecord, LookupStatus, RunSummary};
