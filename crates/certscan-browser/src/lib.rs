//! Browser automation engine for the JavaScript-heavy certificate lookup site.
//!
//! Provides Chromium control with anti-fingerprinting hardening. One engine
//! is shared across all workers; each lookup drives its own short-lived
//! page session.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod session;

pub use engine::{BrowserEngine, EngineConfig};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use session::PageSession;
