use crate::domain::model::{Credentials, ErrorKind, ExchangeError, TokenResponse};
use crate::domain::ports::{ConfigProvider, CredentialExchange};
use crate::utils::error::Result;
use crate::utils::validation;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

const TOKEN_PATH: &str = "token/";
const MAX_RAW_MESSAGE_CHARS: usize = 200;

/// Exchanges credentials for tokens at `{base_url}/token/`.
///
/// Holds no per-exchange state; one instance can serve any number of
/// submissions.
#[derive(Debug, Clone)]
pub struct HttpCredentialExchanger {
    client: Client,
    token_url: String,
    timeout: Duration,
}

impl HttpCredentialExchanger {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validation::validate_url("endpoint.base_url", base_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            token_url: token_url(base_url),
            timeout,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn transport_error(&self, err: reqwest::Error) -> ExchangeError {
        let message = if err.is_timeout() {
            format!("Request timed out after {}s", self.timeout.as_secs_f32())
        } else if err.is_connect() {
            format!("Unable to connect to {}: {}", self.token_url, err)
        } else {
            format!("Request to {} failed: {}", self.token_url, err)
        };
        ExchangeError::transport(message)
    }
}

#[async_trait]
impl CredentialExchange for HttpCredentialExchanger {
    async fn exchange(&self, credentials: &Credentials) -> std::result::Result<TokenResponse, ExchangeError> {
        credentials.validate()?;

        tracing::debug!(
            url = %self.token_url,
            username = %credentials.username,
            "Requesting access token"
        );

        let response = self
            .client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .json(&credentials.to_request_body())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        tracing::debug!("Token endpoint response status: {}", status);

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            serde_json::from_str::<TokenResponse>(&body).map_err(|e| ExchangeError {
                kind: ErrorKind::Server,
                status: Some(status.as_u16()),
                message: format!("Malformed token response: {}", e),
            })
        } else {
            Err(ExchangeError::from_status(
                status.as_u16(),
                extract_error_message(status, &body),
            ))
        }
    }
}

fn token_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), TOKEN_PATH)
}

/// Picks the most useful human-readable message out of an error response body.
pub(crate) fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = message_from_json(&value) {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<') {
        return trimmed.chars().take(MAX_RAW_MESSAGE_CHARS).collect();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn message_from_json(value: &Value) -> Option<String> {
    if let Some(message) = first_string(value) {
        return Some(message);
    }

    let obj = value.as_object()?;
    for key in ["detail", "error_description", "error", "message"] {
        if let Some(message) = obj.get(key).and_then(first_string) {
            return Some(message);
        }
    }

    if let Some(message) = obj.get("non_field_errors").and_then(first_string) {
        return Some(message);
    }

    // Field validation errors: {"username": ["This field is required."]}
    obj.iter()
        .find_map(|(field, v)| first_string(v).map(|message| format!("{}: {}", field, message)))
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}
