use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pixie_common::{FrameId, HostError, Nonce, PanelError, TabId};

use crate::host::{DevtoolsEvent, ErrorReporter, PanelHost};
use crate::message::FrameMessage;

/// Host calls other than frame sends, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
    EnsureContentScript(TabId, FrameId),
    Toggle(TabId, FrameId),
    Show(TabId, FrameId),
    Hide(TabId, FrameId),
    OpenOptions,
    ShowError(String, Option<u32>),
}

#[derive(Default)]
pub(crate) struct FakeHost {
    attempts: Mutex<Vec<(TabId, FrameId, FrameMessage)>>,
    delivered: Mutex<Vec<FrameMessage>>,
    send_failures: Mutex<VecDeque<HostError>>,
    send_stalls: Mutex<VecDeque<Duration>>,
    always_unreachable: AtomicBool,
    calls: Mutex<Vec<HostCall>>,
    devtools: Mutex<Vec<DevtoolsEvent>>,
    nonces: Mutex<VecDeque<Nonce>>,
    panel_failure: Mutex<Option<HostError>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_next_send(&self, error: HostError) {
        self.send_failures.lock().unwrap().push_back(error);
    }

    /// Make the next send hang for `delay` before it completes.
    pub(crate) fn stall_next_send(&self, delay: Duration) {
        self.send_stalls.lock().unwrap().push_back(delay);
    }

    pub(crate) fn set_always_unreachable(&self, value: bool) {
        self.always_unreachable.store(value, Ordering::SeqCst);
    }

    /// Nonce returned by the next show/toggle.
    pub(crate) fn queue_nonce(&self, nonce: &str) {
        self.nonces.lock().unwrap().push_back(Nonce::from(nonce));
    }

    /// Make the next show/hide/toggle fail.
    pub(crate) fn fail_panel_call(&self, error: HostError) {
        *self.panel_failure.lock().unwrap() = Some(error);
    }

    pub(crate) fn sent(&self) -> Vec<(TabId, FrameId, FrameMessage)> {
        self.attempts.lock().unwrap().clone()
    }

    pub(crate) fn send_attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub(crate) fn delivered(&self) -> Vec<FrameMessage> {
        self.delivered.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn devtools_events(&self) -> Vec<DevtoolsEvent> {
        self.devtools.lock().unwrap().clone()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn panel_result(&self) -> Result<(), HostError> {
        match self.panel_failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn next_nonce(&self) -> Option<Nonce> {
        self.nonces.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl PanelHost for FakeHost {
    async fn send_to_frame(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: &FrameMessage,
    ) -> Result<(), HostError> {
        self.attempts
            .lock()
            .unwrap()
            .push((tab_id, frame_id, message.clone()));

        let stall = self.send_stalls.lock().unwrap().pop_front();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        if self.always_unreachable.load(Ordering::SeqCst) {
            return Err(HostError::Unreachable("receiving end does not exist".into()));
        }
        if let Some(error) = self.send_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn ensure_content_script(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<(), HostError> {
        self.record(HostCall::EnsureContentScript(tab_id, frame_id));
        Ok(())
    }

    async fn toggle_panel(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<Option<Nonce>, HostError> {
        self.record(HostCall::Toggle(tab_id, frame_id));
        self.panel_result()?;
        Ok(self.next_nonce())
    }

    async fn show_panel(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<Option<Nonce>, HostError> {
        self.record(HostCall::Show(tab_id, frame_id));
        self.panel_result()?;
        Ok(self.next_nonce())
    }

    async fn hide_panel(&self, tab_id: TabId, frame_id: FrameId) -> Result<(), HostError> {
        self.record(HostCall::Hide(tab_id, frame_id));
        self.panel_result()
    }

    async fn open_options_page(&self) -> Result<(), HostError> {
        self.record(HostCall::OpenOptions);
        Ok(())
    }

    async fn show_error_in_options(
        &self,
        code: &str,
        tab_index: Option<u32>,
    ) -> Result<(), HostError> {
        self.record(HostCall::ShowError(code.to_string(), tab_index));
        Ok(())
    }

    fn emit_devtools(&self, event: DevtoolsEvent) {
        self.devtools.lock().unwrap().push(event);
    }
}

/// Keeps every reported error's message.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    reported: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn reported(&self) -> Vec<String> {
        self.reported.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &PanelError) {
        self.reported.lock().unwrap().push(error.to_string());
    }
}
