use crate::domain::model::{Credentials, ErrorKind, ExchangeError, ExchangePhase, TokenResponse};
use crate::domain::ports::{ConfigProvider, CredentialExchange, Document, FormElement, SubmitEvent};
use std::sync::atomic::{AtomicU8, Ordering};

/// Field names used to read credentials out of the bound form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub username: String,
    pub password: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            username: "username".to_string(),
            password: "password".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(TokenResponse),
    Failed(ExchangeError),
    /// Another exchange from this form was still pending.
    Ignored,
}

impl SubmitOutcome {
    pub fn into_result(self) -> Option<Result<TokenResponse, ExchangeError>> {
        match self {
            SubmitOutcome::Succeeded(token) => Some(Ok(token)),
            SubmitOutcome::Failed(err) => Some(Err(err)),
            SubmitOutcome::Ignored => None,
        }
    }
}

/// Handles submissions of one login form, turning each into a credential
/// exchange instead of a page navigation.
pub struct FormInterceptor<F: FormElement, E: CredentialExchange> {
    form_id: String,
    form: F,
    fields: FormFields,
    exchanger: E,
    phase: AtomicU8,
}

impl<F: FormElement, E: CredentialExchange> FormInterceptor<F, E> {
    /// Binds to the form with `form_id`, or returns `None` if the document has
    /// no such form.
    pub fn attach<D>(document: &D, form_id: &str, fields: FormFields, exchanger: E) -> Option<Self>
    where
        D: Document<Form = F>,
    {
        let Some(form) = document.form_by_id(form_id) else {
            tracing::debug!(form_id, "Login form not present, nothing to bind");
            return None;
        };

        tracing::debug!(form_id, "Bound submit handler to login form");
        Some(Self {
            form_id: form_id.to_string(),
            form,
            fields,
            exchanger,
            phase: AtomicU8::new(ExchangePhase::Idle as u8),
        })
    }

    pub fn attach_with_config<D, C>(document: &D, config: &C, exchanger: E) -> Option<Self>
    where
        D: Document<Form = F>,
        C: ConfigProvider,
    {
        let fields = FormFields {
            username: config.username_field().to_string(),
            password: config.password_field().to_string(),
        };
        Self::attach(document, config.form_id(), fields, exchanger)
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn phase(&self) -> ExchangePhase {
        ExchangePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Submit handler. The event's default action is always suppressed.
    pub async fn handle_submit(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        let Some(_pending) = PendingGuard::enter(&self.phase, &self.form) else {
            tracing::warn!(form_id = %self.form_id, "Login already in progress, ignoring submit");
            return SubmitOutcome::Ignored;
        };

        self.form.clear_error();

        let result = match self.read_credentials() {
            Ok(credentials) => self.exchanger.exchange(&credentials).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(token) => {
                self.phase.store(ExchangePhase::Succeeded as u8, Ordering::Release);
                tracing::info!(
                    form_id = %self.form_id,
                    has_refresh = token.refresh.is_some(),
                    "Login succeeded"
                );
                SubmitOutcome::Succeeded(token)
            }
            Err(err) => {
                self.phase.store(ExchangePhase::Failed as u8, Ordering::Release);
                log_failure(&self.form_id, &err);
                self.form.show_error(&err.user_message());
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn read_credentials(&self) -> Result<Credentials, ExchangeError> {
        let username = self.required_field(&self.fields.username, "Username")?;
        let password = self.required_field(&self.fields.password, "Password")?;
        let credentials = Credentials::new(username, password);
        credentials.validate()?;
        Ok(credentials)
    }

    fn required_field(&self, name: &str, label: &str) -> Result<String, ExchangeError> {
        self.form
            .field_value(name)
            .ok_or_else(|| ExchangeError::validation(format!("{} is required", label)))
    }
}

fn log_failure(form_id: &str, err: &ExchangeError) {
    match err.kind {
        ErrorKind::Validation => {
            tracing::warn!(form_id, "Login form incomplete: {}", err.message)
        }
        ErrorKind::Authentication => {
            tracing::warn!(form_id, status = ?err.status, "Login rejected: {}", err.message)
        }
        ErrorKind::Transport | ErrorKind::Server => {
            tracing::error!(form_id, status = ?err.status, "Login failed: {}", err)
        }
    }
}

/// Marks the form as pending for the lifetime of one exchange.
///
/// Only one guard can exist per form at a time. Dropping it re-enables the
/// submit control, and resets the phase to idle if no outcome was recorded.
struct PendingGuard<'a, F: FormElement> {
    phase: &'a AtomicU8,
    form: &'a F,
}

impl<'a, F: FormElement> PendingGuard<'a, F> {
    fn enter(phase: &'a AtomicU8, form: &'a F) -> Option<Self> {
        let current = phase.load(Ordering::Acquire);
        if current == ExchangePhase::Pending as u8 {
            return None;
        }
        phase
            .compare_exchange(
                current,
                ExchangePhase::Pending as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()?;
        form.set_submit_enabled(false);
        Some(Self { phase, form })
    }
}

impl<F: FormElement> Drop for PendingGuard<'_, F> {
    fn drop(&mut self) {
        let _ = self.phase.compare_exchange(
            ExchangePhase::Pending as u8,
            ExchangePhase::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.form.set_submit_enabled(true);
    }
}
