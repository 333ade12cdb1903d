use crate::domain::ports::{Document, FormElement};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct FormState {
    fields: HashMap<String, String>,
    submit_enabled: bool,
    error: Option<String>,
    submit_toggles: usize,
}

/// In-memory login form. Clones share the same state, so a handle kept by the
/// caller observes what the interceptor does to the form.
#[derive(Debug, Clone)]
pub struct MemoryForm {
    id: String,
    state: Arc<Mutex<FormState>>,
}

impl MemoryForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Arc::new(Mutex::new(FormState {
                fields: HashMap::new(),
                submit_enabled: true,
                error: None,
                submit_toggles: 0,
            })),
        }
    }

    pub fn with_field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_field(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().fields.insert(name.into(), value.into());
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.lock().submit_enabled
    }

    /// How many times the submit control changed state.
    pub fn submit_toggles(&self) -> usize {
        self.lock().submit_toggles
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FormElement for MemoryForm {
    fn field_value(&self, name: &str) -> Option<String> {
        self.lock().fields.get(name).cloned()
    }

    fn set_submit_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        if state.submit_enabled != enabled {
            state.submit_enabled = enabled;
            state.submit_toggles += 1;
        }
    }

    fn show_error(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    fn clear_error(&self) {
        self.lock().error = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    forms: HashMap<String, MemoryForm>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, form: MemoryForm) -> Self {
        self.forms.insert(form.id.clone(), form);
        self
    }
}

impl Document for MemoryDocument {
    type Form = MemoryForm;

    fn form_by_id(&self, id: &str) -> Option<MemoryForm> {
        self.forms.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let form = MemoryForm::new("login-form").with_field("username", "alice");
        let document = MemoryDocument::new().with_form(form.clone());

        let found = document.form_by_id("login-form").unwrap();
        found.set_submit_enabled(false);
        found.show_error("nope");

        assert!(!form.is_submit_enabled());
        assert_eq!(form.error().as_deref(), Some("nope"));
        assert_eq!(form.field_value("username").as_deref(), Some("alice"));
        assert_eq!(form.field_value("password"), None);
    }

    #[test]
    fn test_missing_form() {
        let document = MemoryDocument::new().with_form(MemoryForm::new("login-form"));
        assert!(document.form_by_id("signup-form").is_none());
    }

    #[test]
    fn test_submit_toggle_counting() {
        let form = MemoryForm::new("f");
        form.set_submit_enabled(true);
        assert_eq!(form.submit_toggles(), 0);
        form.set_submit_enabled(false);
        form.set_submit_enabled(true);
        assert_eq!(form.submit_toggles(), 2);
    }
}
