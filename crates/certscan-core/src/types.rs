//! Shared types used across the certscan pipeline.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::CertScanError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for certificate identifiers with validation.
///
/// Certificate IDs are opaque tokens supplied by the caller; validation only
/// guarantees they are printable, free of whitespace and path separators
/// (snapshot artifacts are named after them), and of sane length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertId(String);

impl CertId {
    /// Create a new `CertId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty, longer than 64 characters, or
    /// contains anything outside alphanumerics, `.`, `_` and `-`.
    pub fn new(id: impl Into<String>) -> Result<Self, CertScanError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate certificate ID format: 1-64 filesystem-safe characters.
    fn validate(id: &str) -> Result<(), CertScanError> {
        static CERT_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = CERT_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

        if id.is_empty() || id.len() > 64 {
            return Err(CertScanError::Validation(format!(
                "invalid certificate ID: must be 1-64 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(CertScanError::Validation(format!(
                "invalid certificate ID: must be alphanumeric with '.', '_' or '-', got '{id}'"
            )))
        }
    }
}

impl fmt::Display for CertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal outcome of one certificate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// The certificate page rendered with card name and grade present
    Found,
    /// The service definitively reported no such certificate
    NotFound,
    /// Every fetch attempt failed; see `error_detail`
    Error,
}

impl LookupStatus {
    /// Get a human-readable display name for the status.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Found => "Found",
            Self::NotFound => "Not Found",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One resolved lookup: exactly one of these exists per input identifier.
///
/// Records are created through the three constructors below, never mutated
/// afterwards, and handed to the output writer once the whole run resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertRecord {
    /// The identifier this record resolves
    pub cert_id: CertId,
    /// Terminal outcome
    pub status: LookupStatus,
    /// Card name, present only for `Found`
    pub card_name: Option<String>,
    /// Grade, present only for `Found`
    pub grade: Option<String>,
    /// Last error message, present only for `Error`
    pub error_detail: Option<String>,
}

impl CertRecord {
    /// Record a successful lookup with extracted card name and grade.
    #[must_use]
    pub fn found(cert_id: CertId, card_name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            cert_id,
            status: LookupStatus::Found,
            card_name: Some(card_name.into()),
            grade: Some(grade.into()),
            error_detail: None,
        }
    }

    /// Record a definitive "no such certificate" response.
    #[must_use]
    pub fn not_found(cert_id: CertId) -> Self {
        Self {
            cert_id,
            status: LookupStatus::NotFound,
            card_name: None,
            grade: None,
            error_detail: None,
        }
    }

    /// Record retry exhaustion with the last error observed.
    #[must_use]
    pub fn error(cert_id: CertId, detail: impl Into<String>) -> Self {
        Self {
            cert_id,
            status: LookupStatus::Error,
            card_name: None,
            grade: None,
            error_detail: Some(detail.into()),
        }
    }
}

/// Aggregate counts reported once at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Lookups that resolved `Found`
    pub found: usize,
    /// Lookups that resolved `NotFound`
    pub not_found: usize,
    /// Lookups that exhausted their retries
    pub errored: usize,
}

impl RunSummary {
    /// Tally a finished result set.
    #[must_use]
    pub fn tally(records: &[CertRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                LookupStatus::Found => summary.found += 1,
                LookupStatus::NotFound => summary.not_found += 1,
                LookupStatus::Error => summary.errored += 1,
            }
        }
        summary
    }

    /// Total number of resolved identifiers.
    #[must_use]
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.errored
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} found, {} not found, {} errored",
            self.found, self.not_found, self.errored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cert_id_valid() {
        let valid_ids = vec!["27002504", "A-123", "cert_99", "X", "12.5b"];

        for id in valid_ids {
            assert!(CertId::new(id).is_ok(), "Failed for: {id}");
        }
    }

    #[test]
    fn test_cert_id_invalid() {
        let too_long = "9".repeat(65);
        let invalid_ids = vec![
            "",                // Empty
            "123 456",         // Space
            "-123",            // Leading punctuation
            "a/b",             // Path separator
            "id\tx",           // Control character
            too_long.as_str(), // Too long
        ];

        for id in invalid_ids {
            assert!(CertId::new(id).is_err(), "Should fail for: {id:?}");
        }
    }

    #[test]
    fn test_cert_id_display() {
        let id = CertId::new("27002504").expect("valid cert ID");
        assert_eq!(id.to_string(), "27002504");
        assert_eq!(id.as_str(), "27002504");
    }

    #[test]
    fn test_record_found() {
        let id = CertId::new("111").expect("valid cert ID");
        let record = CertRecord::found(id, "Ace of Spades", "10");
        assert_eq!(record.status, LookupStatus::Found);
        assert_eq!(record.card_name.as_deref(), Some("Ace of Spades"));
        assert_eq!(record.grade.as_deref(), Some("10"));
        assert!(record.error_detail.is_none());
    }

    #[test]
    fn test_record_not_found() {
        let id = CertId::new("999").expect("valid cert ID");
        let record = CertRecord::not_found(id);
        assert_eq!(record.status, LookupStatus::NotFound);
        assert!(record.card_name.is_none());
        assert!(record.grade.is_none());
        assert!(record.error_detail.is_none());
    }

    #[test]
    fn test_record_error() {
        let id = CertId::new("222").expect("valid cert ID");
        let record = CertRecord::error(id, "navigation timeout");
        assert_eq!(record.status, LookupStatus::Error);
        assert_eq!(record.error_detail.as_deref(), Some("navigation timeout"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LookupStatus::Found.to_string(), "Found");
        assert_eq!(LookupStatus::NotFound.to_string(), "Not Found");
        assert_eq!(LookupStatus::Error.to_string(), "Error");
    }

    #[test]
    fn test_summary_tally() {
        let records = vec![
            CertRecord::found(CertId::new("1").expect("valid"), "Ace", "10"),
            CertRecord::found(CertId::new("2").expect("valid"), "Joker", "9"),
            CertRecord::not_found(CertId::new("3").expect("valid")),
            CertRecord::error(CertId::new("4").expect("valid"), "timeout"),
        ];

        let summary = RunSummary::tally(&records);
        assert_eq!(summary.found, 2);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            found: 5,
            not_found: 2,
            errored: 1,
        };
        assert_eq!(summary.to_string(), "5 found, 2 not found, 1 errored");
    }
}
