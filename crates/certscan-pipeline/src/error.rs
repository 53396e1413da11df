use thiserror::Error;

/// A failed fetch attempt. Every variant is transient: the retry policy
/// decides whether another attempt is made. A definitive "not found" page is
/// not an error and never appears here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("content wait exceeded {timeout_ms}ms without certificate fields")]
    Timeout { timeout_ms: u64 },

    #[error("bot challenge interstitial blocked the certificate page")]
    Challenge,

    #[error("page rendered without certificate fields or a not-found marker")]
    Unparseable,

    #[error("browser error: {0}")]
    Browser(#[from] certscan_browser::BrowserError),
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use certscan_browser::BrowserError;

    #[test]
    fn test_error_display() {
        let err = FetchError::Timeout { timeout_ms: 15_000 };
        assert_eq!(
            err.to_string(),
            "content wait exceeded 15000ms without certificate fields"
        );
    }

    #[test]
    fn test_error_from_browser() {
        let browser_err = BrowserError::NavigationError("connection refused".to_string());
        let err: FetchError = browser_err.into();
        assert!(matches!(err, FetchError::Browser(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
