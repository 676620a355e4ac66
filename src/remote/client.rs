use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::{ExpenseQuery, LedgerApi};
use crate::domain::{CurrentUser, ExpenseRecord};

pub const DEFAULT_BASE_URL: &str = "https://secure.splitwise.com/api/v3.0";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Connection settings for [`SplitwiseClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the Splitwise REST API.
pub struct SplitwiseClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct CurrentUserResponse {
    user: CurrentUser,
}

#[derive(Deserialize)]
struct ExpensesResponse {
    #[serde(default)]
    expenses: Vec<ExpenseRecord>,
}

impl SplitwiseClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, ?params, "GET");

        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", path))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Malformed response from {}", path))
    }
}

impl LedgerApi for SplitwiseClient {
    async fn current_user(&self) -> Result<CurrentUser> {
        let payload: CurrentUserResponse = self.get_json("/get_current_user", &[]).await?;
        Ok(payload.user)
    }

    async fn expense_page(&self, query: &ExpenseQuery, offset: u32) -> Result<Vec<ExpenseRecord>> {
        let payload: ExpensesResponse = self
            .get_json("/get_expenses", &query.params(offset))
            .await?;
        Ok(payload.expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let mut config = ClientConfig::new("secret");
        config.base_url = "http://localhost:8080/api/".to_string();
        let client = SplitwiseClient::new(config).unwrap();
        assert_eq!(client.url("/get_expenses"), "http://localhost:8080/api/get_expenses");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(printed.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_expenses_response_missing_key_is_empty() {
        let payload: ExpensesResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.expenses.is_empty());
    }

    #[test]
    fn test_current_user_response() {
        let payload: CurrentUserResponse =
            serde_json::from_str(r#"{"user": {"id": 5, "first_name": "Sam"}}"#).unwrap();
        assert_eq!(payload.user.id, 5);
    }
}
