use std::time::Duration;

use crate::errors::{JiraError, JiraResult};

/// Fixed per-call timeout applied to every upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const BASE_URL_VAR: &str = "JIRA_BASE_URL";
pub const USERNAME_VAR: &str = "JIRA_USERNAME";
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";

/// Connection settings for the upstream Jira instance.
///
/// Loaded once at process start and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl JiraConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            api_token: api_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> JiraResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> JiraResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| JiraError::Config(format!("{} must be set", BASE_URL_VAR)))?;

        let username = lookup(USERNAME_VAR).unwrap_or_default();
        let api_token = lookup(API_TOKEN_VAR).unwrap_or_default();

        Ok(Self::new(base_url.trim(), username, api_token))
    }

    /// Root of the REST API all upstream paths hang off
    pub fn api_root(&self) -> String {
        format!("{}/rest/api/2", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = JiraConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://example.atlassian.net/"),
            (USERNAME_VAR, "dev@example.com"),
            (API_TOKEN_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://example.atlassian.net");
        assert_eq!(config.username, "dev@example.com");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.api_root(),
            "https://example.atlassian.net/rest/api/2"
        );
    }

    #[test]
    fn test_config_requires_base_url() {
        let result = JiraConfig::from_lookup(lookup_from(&[(USERNAME_VAR, "dev")]));
        assert!(matches!(result, Err(JiraError::Config(_))));
    }

    #[test]
    fn test_credentials_default_to_empty() {
        let config =
            JiraConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "http://localhost")])).unwrap();
        assert!(config.username.is_empty());
        assert!(config.api_token.is_empty());
    }
}
