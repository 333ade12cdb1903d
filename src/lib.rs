pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::LoginConfig;

pub use adapters::form::{MemoryDocument, MemoryForm};
pub use crate::core::exchanger::HttpCredentialExchanger;
pub use crate::core::interceptor::{FormFields, FormInterceptor, SubmitOutcome};
pub use domain::model::{Credentials, ErrorKind, ExchangeError, ExchangePhase, TokenResponse};
pub use domain::ports::{ConfigProvider, CredentialExchange, Document, FormElement, SubmitEvent};
pub use utils::error::{LoginError, Result};
