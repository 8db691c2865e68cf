use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::AccountError;

/// Where the account endpoints live.
#[derive(Clone, Debug)]
pub struct AccountConfig {
    /// `http(s)://host[:port]/` base of the account API.
    pub http_base: Url,
}

/// Envelope every account endpoint answers with.
///
/// `status` is the operation verdict; `content` carries endpoint-specific
/// detail (a session's client id, an error message, availability flags).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub status: bool,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP client for the account endpoints. No retries; every error is
/// surfaced to the caller.
#[derive(Clone)]
pub struct AccountService {
    client: Client,
    config: AccountConfig,
}

impl AccountService {
    #[must_use]
    pub fn new(config: AccountConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/account/{path}",
            self.config.http_base.as_str().trim_end_matches('/')
        )
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, AccountError> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        if !response.status().is_success() {
            return Err(AccountError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, AccountError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AccountError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Check whether a stored client id still names a live session.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` when the request fails or the service answers
    /// with a non-success status code.
    pub async fn validate_session(&self, client_id: &str) -> Result<ApiResponse, AccountError> {
        self.get(&format!("validate-session/{client_id}")).await
    }

    /// # Errors
    ///
    /// Returns `AccountError` when the request fails or the service answers
    /// with a non-success status code.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ApiResponse, AccountError> {
        self.post("login", &Credentials { username, password }).await
    }

    /// Promote the current anonymous session to a named account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` when the request fails or the service answers
    /// with a non-success status code.
    pub async fn register(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<ApiResponse, AccountError> {
        #[derive(Serialize)]
        struct Registration<'a> {
            client_id: &'a str,
            username: &'a str,
            password: &'a str,
        }
        self.post(
            "register",
            &Registration {
                client_id,
                username,
                password,
            },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `AccountError` when the request fails or the service answers
    /// with a non-success status code.
    pub async fn logout(&self, client_id: &str) -> Result<ApiResponse, AccountError> {
        self.get(&format!("logout/{client_id}")).await
    }

    /// # Errors
    ///
    /// Returns `AccountError` when the request fails or the service answers
    /// with a non-success status code.
    pub async fn username_available(&self, username: &str) -> Result<ApiResponse, AccountError> {
        self.get(&format!("username-available/{username}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let service = AccountService::new(AccountConfig {
            http_base: Url::parse("http://localhost:8000/").unwrap(),
        });
        assert_eq!(
            service.endpoint("validate-session/abc"),
            "http://localhost:8000/account/validate-session/abc"
        );
    }

    #[test]
    fn api_response_parses_missing_content() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(parsed.status);
        assert_eq!(parsed.content, Value::Null);
    }

    #[test]
    fn api_response_parses_object_content() {
        let parsed: ApiResponse =
            serde_json::from_str(r#"{"status": false, "content": {"reason": "taken"}}"#).unwrap();
        assert!(!parsed.status);
        assert_eq!(parsed.content["reason"], "taken");
    }
}
