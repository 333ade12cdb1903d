use crate::domain::model::{Credentials, ExchangeError, TokenResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Sends credentials to a token-issuing endpoint. One attempt per call.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn exchange(&self, credentials: &Credentials) -> Result<TokenResponse, ExchangeError>;
}

/// The login form as seen by the interceptor.
pub trait FormElement: Send + Sync {
    /// Current value of the named input, `None` if the form has no such field.
    fn field_value(&self, name: &str) -> Option<String>;
    fn set_submit_enabled(&self, enabled: bool);
    /// Displays an inline error next to the form.
    fn show_error(&self, message: &str);
    fn clear_error(&self);
}

/// Lookup of form elements by id.
pub trait Document {
    type Form: FormElement;

    fn form_by_id(&self, id: &str) -> Option<Self::Form>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn form_id(&self) -> &str;
    fn username_field(&self) -> &str;
    fn password_field(&self) -> &str;
}

/// A form submission. The default action is a full-page navigation unless
/// a handler calls [`SubmitEvent::prevent_default`].
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
