use certscan_core::CertId;
use url::Url;

/// Builds certificate lookup URLs from a validated base.
#[derive(Debug, Clone)]
pub struct LookupUrlBuilder {
    base: Url,
}

impl LookupUrlBuilder {
    /// Parse and store the service base URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        Ok(Self { base })
    }

    /// URL of the lookup page for one certificate.
    #[must_use]
    pub fn cert_url(&self, cert_id: &CertId) -> String {
        format!(
            "{}/cert/{}",
            self.base.as_str().trim_end_matches('/'),
            cert_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cert_url() {
        let builder = LookupUrlBuilder::new("https://acegrading.com").expect("valid base URL");
        let id = CertId::new("27002504").expect("valid cert ID");
        assert_eq!(
            builder.cert_url(&id),
            "https://acegrading.com/cert/27002504"
        );
    }

    #[test]
    fn test_cert_url_trailing_slash() {
        let builder = LookupUrlBuilder::new("https://acegrading.com/").expect("valid base URL");
        let id = CertId::new("42").expect("valid cert ID");
        assert_eq!(builder.cert_url(&id), "https://acegrading.com/cert/42");
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(LookupUrlBuilder::new("not a url").is_err());
    }
}
