use crate::domain::model::{ErrorKind, ExchangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Login form '{form_id}' not found")]
    FormNotFound { form_id: String },

    #[error("A login from form '{form_id}' is already in progress")]
    SubmitInProgress { form_id: String },

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Authentication,
    Server,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl LoginError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoginError::ConfigValidationError { .. }
            | LoginError::InvalidConfigValueError { .. }
            | LoginError::FormNotFound { .. } => ErrorCategory::Configuration,
            LoginError::SubmitInProgress { .. } => ErrorCategory::Input,
            LoginError::IoError(_) | LoginError::ClientError(_) | LoginError::SerializationError(_) => {
                ErrorCategory::System
            }
            LoginError::Exchange(e) => match e.kind {
                ErrorKind::Validation => ErrorCategory::Input,
                ErrorKind::Transport => ErrorCategory::Network,
                ErrorKind::Authentication => ErrorCategory::Authentication,
                ErrorKind::Server => ErrorCategory::Server,
            },
        }
    }

    /// Medium means a manual retry may succeed.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Authentication => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LoginError::Exchange(e) => e.user_message(),
            LoginError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            LoginError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            LoginError::SubmitInProgress { .. } => {
                "A login is already in progress".to_string()
            }
            LoginError::FormNotFound { form_id } => {
                format!("No login form with id '{}'", form_id)
            }
            LoginError::IoError(e) => format!("File access failed: {}", e),
            LoginError::ClientError(e) => format!("Could not initialise HTTP client: {}", e),
            LoginError::SerializationError(e) => format!("Could not encode output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        if let LoginError::SubmitInProgress { .. } = self {
            return "Wait for the current login to finish";
        }
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the config file and command-line flags (base URL must be http or https)"
            }
            ErrorCategory::Input => "Provide both a username and a password",
            ErrorCategory::Network => "Verify the base URL and that the server is running",
            ErrorCategory::Authentication => "Check the username and password",
            ErrorCategory::Server => "Wait a moment and try again",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }
}

pub type Result<T> = std::result::Result<T, LoginError>;
