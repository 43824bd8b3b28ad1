//! Modal forms shown by the content script.
//!
//! A brick registers a form under a nonce and waits; the form frame fetches
//! the definition by nonce and later submits or cancels it.

pub mod definition;
pub mod protocol;
pub mod registry;

pub use definition::FormDefinition;
pub use protocol::{FormRequest, FormResponse};
pub use registry::{FormRegistry, PendingForm};
