//! Messenger surface for modal forms.

use pixie_common::Nonce;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definition::FormDefinition;
use crate::registry::FormRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormRequest {
    /// Show a form and answer once the user submits or cancels it.
    RegisterForm {
        nonce: Nonce,
        definition: FormDefinition,
    },
    GetFormDefinition {
        nonce: Nonce,
    },
    ResolveForm {
        nonce: Nonce,
        values: Value,
    },
    CancelForm {
        nonce: Nonce,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FormResponse {
    Ok,
    Definition { definition: FormDefinition },
    Submitted { values: Value },
    Error { message: String },
}

impl FormRegistry {
    pub async fn dispatch(&self, request: FormRequest) -> FormResponse {
        let result = match request {
            FormRequest::RegisterForm { nonce, definition } => self
                .register_form(nonce, definition)
                .wait()
                .await
                .map(|values| FormResponse::Submitted { values }),
            FormRequest::GetFormDefinition { nonce } => self
                .form_definition(&nonce)
                .map(|definition| FormResponse::Definition { definition }),
            FormRequest::ResolveForm { nonce, values } => {
                self.resolve_form(&nonce, values).map(|()| FormResponse::Ok)
            }
            FormRequest::CancelForm { nonce } => self.cancel_form(&nonce).map(|()| FormResponse::Ok),
        };

        result.unwrap_or_else(|e| FormResponse::Error {
            message: e.to_string(),
        })
    }
}
