use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username/password pair read from the login form at submission time.
///
/// The password is kept behind [`SecretString`] so that `Debug` output and
/// log lines never contain it.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password: String = password.into();
        Self {
            username: username.into(),
            password: SecretString::from(password),
        }
    }

    /// Fails with a validation error when either field is empty.
    ///
    /// A whitespace-only username counts as empty; the password is taken as-is.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.username.trim().is_empty() {
            return Err(ExchangeError::validation("Username is required"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ExchangeError::validation("Password is required"));
        }
        Ok(())
    }

    pub(crate) fn to_request_body(&self) -> TokenRequest<'_> {
        TokenRequest {
            username: &self.username,
            password: self.password.expose_secret(),
        }
    }
}

/// Wire body of `POST {base}/token/`.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful token endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenResponse {
    /// Value for an `Authorization` header on follow-up API calls.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required credential was missing; raised before any request.
    Validation,
    /// No HTTP response was received (DNS, connect, timeout).
    Transport,
    /// The server answered 4xx.
    Authentication,
    /// The server answered 5xx, another non-2xx, or an unreadable 2xx body.
    Server,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "transport",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Server => "server",
        };
        f.write_str(name)
    }
}

/// Failed credential exchange.
///
/// `status` is only present when the server actually answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} error (HTTP {}): {}", self.kind, status, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ExchangeError {}

impl ExchangeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status: None,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    /// Classifies a non-2xx status: 4xx is an authentication failure, the rest
    /// are server failures.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = if (400..500).contains(&status) {
            ErrorKind::Authentication
        } else {
            ErrorKind::Server
        };
        Self {
            kind,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Text suitable for showing next to the login form.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation | ErrorKind::Authentication => self.message.clone(),
            ErrorKind::Transport => {
                "Unable to reach server. Check your connection and try again.".to_string()
            }
            ErrorKind::Server => {
                "The server could not complete the login. Please try again later.".to_string()
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport | ErrorKind::Server)
    }
}

/// Lifecycle of the most recent exchange started from a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExchangePhase {
    Idle = 0,
    Pending = 1,
    Succeeded = 2,
    Failed = 3,
}

impl ExchangePhase {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ExchangePhase::Pending,
            2 => ExchangePhase::Succeeded,
            3 => ExchangePhase::Failed,
            _ => ExchangePhase::Idle,
        }
    }
}
