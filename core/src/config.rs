//! Client configuration: credentials, API host and retry policy.
//!
//! Built once at startup and shared read-only (`Arc<ClientConfig>`) by every
//! call.

use std::time::Duration;

pub const PRODUCTION_URL: &str = "https://api.trakt.tv";
pub const STAGING_URL: &str = "https://api-staging.trakt.tv";
pub const API_VERSION: &str = "2";

/// Bounds on the automatic rate-limit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Longest `retry-after` the executor will honour. A longer one ends
    /// the call with `RetryLimitExceeded` instead of re-sending early.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            max_delay: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub base_url: String,
    pub access_token: Option<String>,
    pub retry: RetryPolicy,
    /// Per-exchange timeout enforced by the transport.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            base_url: PRODUCTION_URL.to_string(),
            access_token: None,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn staging(self) -> Self {
        self.with_base_url(STAGING_URL)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from `TRAKT_*` environment variables.
    ///
    /// `TRAKT_CLIENT_ID` is required. `TRAKT_BASE_URL` wins over
    /// `TRAKT_STAGING=1`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let client_id = lookup("TRAKT_CLIENT_ID").ok_or(ConfigError::Missing("TRAKT_CLIENT_ID"))?;
        let client_secret = lookup("TRAKT_CLIENT_SECRET").unwrap_or_default();
        let redirect_uri = lookup("TRAKT_REDIRECT_URI").unwrap_or_default();
        let mut config = Self::new(&client_id, &client_secret, &redirect_uri);

        if let Some(token) = lookup("TRAKT_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_access_token(&token);
        }
        if let Some(staging) = lookup("TRAKT_STAGING") {
            match staging.as_str() {
                "1" | "true" => config = config.staging(),
                "0" | "false" | "" => {}
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "TRAKT_STAGING",
                        value: staging,
                    })
                }
            }
        }
        if let Some(url) = lookup("TRAKT_BASE_URL") {
            config = config.with_base_url(&url);
        }
        if let Some(retries) = lookup("TRAKT_MAX_RETRIES") {
            let max_retries = retries.parse().map_err(|_| ConfigError::Invalid {
                name: "TRAKT_MAX_RETRIES",
                value: retries.clone(),
            })?;
            config.retry.max_retries = max_retries;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::new("id", "secret", "urn:ietf:wg:oauth:2.0:oob");
        assert_eq!(config.base_url, PRODUCTION_URL);
        assert!(config.access_token.is_none());
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let config = ClientConfig::new("id", "", "").with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn env_requires_client_id() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TRAKT_CLIENT_ID")));
    }

    #[test]
    fn env_reads_staging_token_and_retries() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TRAKT_CLIENT_ID", "abc"),
            ("TRAKT_ACCESS_TOKEN", "tok"),
            ("TRAKT_STAGING", "1"),
            ("TRAKT_MAX_RETRIES", "2"),
        ]))
        .unwrap();
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.base_url, STAGING_URL);
        assert_eq!(config.retry.max_retries, 2);
    }

    #[test]
    fn env_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("TRAKT_CLIENT_ID", "abc"),
            ("TRAKT_MAX_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "TRAKT_MAX_RETRIES", .. }));
    }
}
