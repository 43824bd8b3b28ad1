use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pixie_common::{FormError, Nonce};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use crate::definition::FormDefinition;

type Outcome = Result<Value, FormError>;

struct RegisteredForm {
    definition: FormDefinition,
    completion: oneshot::Sender<Outcome>,
}

/// Forms waiting for the user, keyed by nonce.
#[derive(Default)]
pub struct FormRegistry {
    forms: Mutex<HashMap<Nonce, RegisteredForm>>,
}

/// Resolves once the form is submitted or cancelled.
#[derive(Debug)]
pub struct PendingForm {
    nonce: Nonce,
    receiver: oneshot::Receiver<Outcome>,
}

impl PendingForm {
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Wait for the submitted values.
    pub async fn wait(self) -> Outcome {
        self.receiver.await.unwrap_or_else(|_| {
            Err(FormError::Cancelled(format!(
                "form {} was unregistered",
                self.nonce
            )))
        })
    }
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn forms(&self) -> MutexGuard<'_, HashMap<Nonce, RegisteredForm>> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a form. Registering the same nonce again replaces the
    /// earlier form, whose waiter then fails as cancelled.
    pub fn register_form(&self, nonce: Nonce, definition: FormDefinition) -> PendingForm {
        let (completion, receiver) = oneshot::channel();
        let replaced = self.forms().insert(
            nonce.clone(),
            RegisteredForm {
                definition,
                completion,
            },
        );
        if replaced.is_some() {
            debug!(%nonce, "replaced registered form");
        }
        PendingForm { nonce, receiver }
    }

    pub fn form_definition(&self, nonce: &Nonce) -> Result<FormDefinition, FormError> {
        self.forms()
            .get(nonce)
            .map(|form| form.definition.clone())
            .ok_or_else(|| FormError::NotFound(nonce.to_string()))
    }

    /// Complete the form with the user's values and unregister it.
    pub fn resolve_form(&self, nonce: &Nonce, values: Value) -> Result<(), FormError> {
        self.complete(nonce, Ok(values))
    }

    /// Fail the form's waiter as cancelled by the user and unregister it.
    pub fn cancel_form(&self, nonce: &Nonce) -> Result<(), FormError> {
        self.complete(
            nonce,
            Err(FormError::Cancelled("User cancelled the action".into())),
        )
    }

    fn complete(&self, nonce: &Nonce, outcome: Outcome) -> Result<(), FormError> {
        let form = self
            .forms()
            .remove(nonce)
            .ok_or_else(|| FormError::NotFound(nonce.to_string()))?;
        if form.completion.send(outcome).is_err() {
            // Waiter already gone; nothing left to notify.
            debug!(%nonce, "form completed after its waiter was dropped");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.forms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms().is_empty()
    }
}
