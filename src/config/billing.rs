//! Billing platform configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Billing platform (management API) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Management API base URL
    pub base_url: String,

    /// Organization all subscriptions belong to
    pub org_name: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl BillingConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.org_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__ORG_NAME"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BillingConfig {
        BillingConfig {
            base_url: "https://api.example.com/v1".to_string(),
            org_name: "acme".to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        assert_eq!(valid().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_missing_base_url() {
        let config = BillingConfig {
            base_url: String::new(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BILLING__BASE_URL"))
        );
    }

    #[test]
    fn test_validation_non_http_base_url() {
        let config = BillingConfig {
            base_url: "ftp://api.example.com".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_validation_blank_org_name() {
        let config = BillingConfig {
            org_name: "  ".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BILLING__ORG_NAME"))
        );
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = BillingConfig {
            request_timeout_secs: 0,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
