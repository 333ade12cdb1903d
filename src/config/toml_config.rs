use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LoginError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_form_id")]
    pub id: String,
    #[serde(default = "default_username_field")]
    pub username_field: String,
    #[serde(default = "default_password_field")]
    pub password_field: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"debug"` or `"token_login=trace,info"`.
    pub level: Option<String>,
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_form_id() -> String {
    "login-form".to_string()
}

fn default_username_field() -> String {
    "username".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id: default_form_id(),
            username_field: default_username_field(),
            password_field: default_password_field(),
        }
    }
}

impl LoginConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LoginError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LoginError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("endpoint.base_url", &self.endpoint.base_url)?;
        validation::validate_range(
            "endpoint.timeout_seconds",
            self.endpoint.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        if let Some(level) = &self.logging.level {
            validation::validate_filter_directive("logging.level", level)?;
        }
        validation::validate_non_empty_string("form.id", &self.form.id)?;
        validation::validate_non_empty_string("form.username_field", &self.form.username_field)?;
        validation::validate_non_empty_string("form.password_field", &self.form.password_field)?;
        validation::validate_distinct(
            "form.username_field",
            &self.form.username_field,
            "form.password_field",
            &self.form.password_field,
        )?;
        Ok(())
    }
}

impl ConfigProvider for LoginConfig {
    fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_seconds)
    }

    fn form_id(&self) -> &str {
        &self.form.id
    }

    fn username_field(&self) -> &str {
        &self.form.username_field
    }

    fn password_field(&self) -> &str {
        &self.form.password_field
    }
}

impl Validate for LoginConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[endpoint]
base_url = "https://auth.example.com/api"
timeout_seconds = 10

[form]
id = "signin"
username_field = "email"
password_field = "pass"

[logging]
level = "debug"
verbose = true
format = "json"
"#;

        let config = LoginConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://auth.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.form_id(), "signin");
        assert_eq!(config.username_field(), "email");
        assert_eq!(config.password_field(), "pass");
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_logging_level_is_rejected() {
        let config = LoginConfig::from_toml_str(
            r#"
[logging]
level = "token_login=loud"
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let config = LoginConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.form_id(), "login-form");
        assert_eq!(config.username_field(), "username");
        assert_eq!(config.password_field(), "password");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TOKEN_LOGIN_TEST_BASE_URL", "https://test.example.com/api");

        let toml_content = r#"
[endpoint]
base_url = "${TOKEN_LOGIN_TEST_BASE_URL}"
"#;

        let config = LoginConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.endpoint.base_url, "https://test.example.com/api");

        std::env::remove_var("TOKEN_LOGIN_TEST_BASE_URL");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[endpoint]
base_url = "${TOKEN_LOGIN_TEST_UNSET_VARIABLE}"
"#;

        let config = LoginConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.endpoint.base_url, "${TOKEN_LOGIN_TEST_UNSET_VARIABLE}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = LoginConfig::from_toml_str(
            r#"
[endpoint]
base_url = "http://localhost/8000/api"
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = LoginConfig::from_toml_str(
            r#"
[form]
username_field = "login"
password_field = "login"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = LoginConfig::from_toml_str("[endpoint\nbase_url = 1").unwrap_err();
        assert!(matches!(err, LoginError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[endpoint]
base_url = "https://file.example.com/api"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = LoginConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "https://file.example.com/api");
    }
}
