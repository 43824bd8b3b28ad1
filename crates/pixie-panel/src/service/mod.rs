//! Background operations exposed to the content script, the panel frame
//! and the toolbar action.

use std::sync::Arc;

use pixie_config::BackgroundConfig;

use crate::forwarder::{Forwarder, PanelTimings};
use crate::host::{ErrorReporter, PanelHost, TracingReporter};
use crate::origin::OriginGuard;
use crate::session::SessionStore;

mod browser_action;
mod lifecycle;


pub use browser_action::{ERR_BROWSER_ACTION_TOGGLE, ERR_BROWSER_ACTION_TOGGLE_WEBSTORE};

/// Owns the panel sessions and the collaborators the operations call into.
#[derive(Clone)]
pub struct ActionFrameService {
    store: SessionStore,
    host: Arc<dyn PanelHost>,
    reporter: Arc<dyn ErrorReporter>,
    forwarder: Forwarder,
    origins: OriginGuard,
}

impl ActionFrameService {
    pub fn new(host: Arc<dyn PanelHost>, timings: PanelTimings, origins: OriginGuard) -> Self {
        let store = SessionStore::new();
        Self {
            forwarder: Forwarder::new(store.clone(), Arc::clone(&host), timings),
            store,
            host,
            reporter: Arc::new(TracingReporter),
            origins,
        }
    }

    pub fn from_config(host: Arc<dyn PanelHost>, config: &BackgroundConfig) -> Self {
        Self::new(
            host,
            PanelTimings::from(&config.forwarding),
            OriginGuard::from(&config.origins),
        )
    }

    /// Route unawaited errors somewhere other than the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }
}
