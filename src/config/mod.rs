pub mod toml_config;

pub use toml_config::LoginConfig;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "token-login")]
#[command(about = "Log in against a token endpoint and print the issued tokens")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base API URL; the token endpoint is `<base-url>/token/`
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long, env = "TOKEN_LOGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Id of the login form to bind to
    #[arg(long)]
    pub form_id: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("form_id", &self.form_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("verbose", &self.verbose)
            .field("log_format", &self.log_format)
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (if any) and applies command-line overrides on top.
    pub fn resolve(&self) -> crate::utils::error::Result<LoginConfig> {
        let mut config = match &self.config {
            Some(path) => LoginConfig::from_file(path)?,
            None => LoginConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut LoginConfig) {
        if let Some(base_url) = &self.base_url {
            config.endpoint.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.endpoint.timeout_seconds = timeout;
        }
        if let Some(form_id) = &self.form_id {
            config.form.id = form_id.clone();
        }
        if self.verbose {
            config.logging.verbose = Some(true);
        }
        if let Some(format) = self.log_format {
            config.logging.format = Some(format);
        }
    }
}
