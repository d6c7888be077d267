use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::client::BanditClient;
use crate::error::{BanditError, Result};

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub account_id: i64,
    pub lab_id: String,
    pub base_url: Option<String>,
    pub cookie_domain: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let account_id = lookup("BANDIT_ACCOUNT_ID")
            .ok_or_else(|| BanditError::Config("BANDIT_ACCOUNT_ID must be set".into()))?
            .parse()
            .map_err(|_| BanditError::Config("BANDIT_ACCOUNT_ID must be a valid number".into()))?;

        let lab_id = lookup("BANDIT_LAB_ID")
            .filter(|lab| !lab.is_empty())
            .ok_or_else(|| BanditError::Config("BANDIT_LAB_ID must be set".into()))?;

        let timeout = lookup("BANDIT_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse().map(Duration::from_secs).map_err(|_| {
                    BanditError::Config("BANDIT_TIMEOUT_SECS must be a whole number of seconds".into())
                })
            })
            .transpose()?;

        Ok(Self {
            account_id,
            lab_id,
            base_url: lookup("BANDIT_BASE_URL"),
            cookie_domain: lookup("BANDIT_COOKIE_DOMAIN"),
            timeout,
        })
    }

    /// Build a client from this configuration.
    pub fn into_client(self) -> Result<BanditClient> {
        let mut client = BanditClient::new(self.account_id, self.lab_id);

        if let Some(url) = self.base_url {
            client = client.with_base_url(url);
        }
        if let Some(domain) = self.cookie_domain {
            client = client.with_domain(domain);
        }
        if let Some(timeout) = self.timeout {
            let http_client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| BanditError::Config(format!("failed to create HTTP client: {e}")))?;
            client = client.with_http_client(http_client);
        }

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config =
            ClientConfig::from_lookup(lookup(&[("BANDIT_ACCOUNT_ID", "123"), ("BANDIT_LAB_ID", "l1")]))
                .unwrap();

        assert_eq!(config.account_id, 123);
        assert_eq!(config.lab_id, "l1");
        assert_eq!(config.base_url, None);
        assert_eq!(config.timeout, None);

        let client = config.into_client().unwrap();
        assert_eq!(client.reward_cookie().name(), "iyR-l1");
        assert_eq!(client.base_url(), "https://bandits.incisive.ly/v1");
    }

    #[test]
    fn test_full_config() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BANDIT_ACCOUNT_ID", "9"),
            ("BANDIT_LAB_ID", "home"),
            ("BANDIT_BASE_URL", "http://localhost:8000/v1"),
            ("BANDIT_COOKIE_DOMAIN", ".example.com"),
            ("BANDIT_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));

        let client = config.into_client().unwrap();
        assert_eq!(
            client.suggestion_url(),
            "http://localhost:8000/v1/accounts/9/labs/home/suggest"
        );
        assert_eq!(client.user_cookie().domain(), Some(".example.com"));
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let err = ClientConfig::from_lookup(lookup(&[("BANDIT_LAB_ID", "l1")])).unwrap_err();
        assert!(err.to_string().contains("BANDIT_ACCOUNT_ID must be set"));

        let err = ClientConfig::from_lookup(lookup(&[
            ("BANDIT_ACCOUNT_ID", "abc"),
            ("BANDIT_LAB_ID", "l1"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("valid number"));

        let err = ClientConfig::from_lookup(lookup(&[("BANDIT_ACCOUNT_ID", "1")])).unwrap_err();
        assert!(err.to_string().contains("BANDIT_LAB_ID"));

        let err = ClientConfig::from_lookup(lookup(&[
            ("BANDIT_ACCOUNT_ID", "1"),
            ("BANDIT_LAB_ID", "l1"),
            ("BANDIT_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BanditError::Config(_)));
    }
}
