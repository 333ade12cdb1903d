pub mod exchanger;
pub mod interceptor;

pub use crate::domain::model::{Credentials, ErrorKind, ExchangeError, ExchangePhase, TokenResponse};
pub use crate::domain::ports::{ConfigProvider, CredentialExchange, Document, FormElement, SubmitEvent};
pub use crate::utils::error::Result;
