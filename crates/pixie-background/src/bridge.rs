//! Stdio bridge: messenger requests and host replies in, responses and host
//! calls out.
//!
//! Every platform call gets a `call_id` and waits for the matching
//! `host_reply` line. Lines going out are queued to one writer task that owns
//! stdout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pixie_common::{FrameId, HostError, Nonce, TabId};
use pixie_forms::{FormRequest, FormResponse};
use pixie_panel::{BackgroundRequest, BackgroundResponse, DevtoolsEvent, FrameMessage, MessageSender, PanelHost};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};

/// How long a host call waits for its reply.
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// One line read from stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Incoming {
    Request {
        id: u64,
        sender: MessageSender,
        request: Request,
    },
    HostReply {
        call_id: u64,
        reply: HostReply,
    },
}

/// Requests are told apart by their `type` tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Panel(BackgroundRequest),
    Form(FormRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Panel(BackgroundResponse),
    Form(FormResponse),
}

/// Outcome of a platform call as reported by the other end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostReply {
    Ok {
        #[serde(default)]
        nonce: Option<Nonce>,
    },
    Unreachable {
        message: String,
    },
    PermissionDenied {
        message: String,
    },
    Rejected {
        message: String,
    },
}

impl HostReply {
    fn into_result(self) -> Result<Option<Nonce>, HostError> {
        match self {
            HostReply::Ok { nonce } => Ok(nonce),
            HostReply::Unreachable { message } => Err(HostError::Unreachable(message)),
            HostReply::PermissionDenied { message } => Err(HostError::PermissionDenied(message)),
            HostReply::Rejected { message } => Err(HostError::Rejected(message)),
        }
    }
}

/// Platform operations, as written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCall<'a> {
    SendToFrame {
        tab_id: TabId,
        frame_id: FrameId,
        message: &'a FrameMessage,
    },
    EnsureContentScript {
        tab_id: TabId,
        frame_id: FrameId,
    },
    TogglePanel {
        tab_id: TabId,
        frame_id: FrameId,
    },
    ShowPanel {
        tab_id: TabId,
        frame_id: FrameId,
    },
    HidePanel {
        tab_id: TabId,
        frame_id: FrameId,
    },
    OpenOptionsPage,
    ShowErrorInOptions {
        code: &'a str,
        tab_index: Option<u32>,
    },
}

/// One line written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outgoing<'a> {
    Response { id: u64, response: Reply },
    HostCall { call_id: u64, call: HostCall<'a> },
    Devtools { event: &'a DevtoolsEvent },
}

/// Host that forwards every platform call over stdout and waits for the
/// reply that comes back on stdin.
pub struct StdioHost {
    out: mpsc::UnboundedSender<String>,
    pending: Mutex<HashMap<u64, oneshot::Sender<HostReply>>>,
    next_call_id: AtomicU64,
    reply_timeout: Duration,
}

impl StdioHost {
    /// Create the host and the receiving end of its output queue, to be
    /// drained by `write_lines`.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (out, lines) = mpsc::unbounded_channel();
        let host = Self {
            out,
            pending: Mutex::new(HashMap::new()),
            next_call_id: AtomicU64::new(1),
            reply_timeout: REPLY_TIMEOUT,
        };
        (host, lines)
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<HostReply>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a line for stdout.
    pub fn emit(&self, line: &Outgoing<'_>) -> Result<(), String> {
        let encoded = serde_json::to_string(line).map_err(|e| e.to_string())?;
        self.out
            .send(encoded)
            .map_err(|_| "stdout writer closed".to_string())
    }

    /// Hand a reply to the call waiting on `call_id`.
    pub fn resolve(&self, call_id: u64, reply: HostReply) {
        let Some(waiter) = self.pending().remove(&call_id) else {
            tracing::warn!(call_id, "reply for unknown or expired host call");
            return;
        };
        if waiter.send(reply).is_err() {
            tracing::debug!(call_id, "host call gave up before its reply arrived");
        }
    }

    /// Fail every call still waiting for a reply.
    pub fn abandon_pending(&self) {
        let abandoned = std::mem::take(&mut *self.pending());
        if !abandoned.is_empty() {
            tracing::debug!(count = abandoned.len(), "abandoning host calls without reply");
        }
    }

    async fn call(&self, call: HostCall<'_>) -> Result<Option<Nonce>, HostError> {
        let call_id = self.next_call_id.fetch_add(1, Ordering::Relaxed);
        let (waiter, reply) = oneshot::channel();
        self.pending().insert(call_id, waiter);
        let _pending = PendingCall {
            host: self,
            call_id,
        };

        self.emit(&Outgoing::HostCall { call_id, call })
            .map_err(HostError::Unreachable)?;

        match tokio::time::timeout(self.reply_timeout, reply).await {
            Ok(Ok(reply)) => reply.into_result(),
            Ok(Err(_)) => Err(HostError::Unreachable(format!(
                "host call {call_id} abandoned"
            ))),
            Err(_) => Err(HostError::Unreachable(format!(
                "no reply to host call {call_id} in {}ms",
                self.reply_timeout.as_millis()
            ))),
        }
    }
}

/// Unregisters a call's waiter however the call ends.
struct PendingCall<'a> {
    host: &'a StdioHost,
    call_id: u64,
}

impl Drop for PendingCall<'_> {
    fn drop(&mut self) {
        self.host.pending().remove(&self.call_id);
    }
}

/// Write queued lines until every sender is gone.
pub async fn write_lines<W>(mut lines: mpsc::UnboundedReceiver<String>, mut out: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }
    Ok(())
}

#[async_trait]
impl PanelHost for StdioHost {
    async fn send_to_frame(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: &FrameMessage,
    ) -> Result<(), HostError> {
        self.call(HostCall::SendToFrame {
            tab_id,
            frame_id,
            message,
        })
        .await
        .map(drop)
    }

    async fn ensure_content_script(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<(), HostError> {
        self.call(HostCall::EnsureContentScript { tab_id, frame_id })
            .await
            .map(drop)
    }

    async fn toggle_panel(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<Option<Nonce>, HostError> {
        self.call(HostCall::TogglePanel { tab_id, frame_id }).await
    }

    async fn show_panel(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> Result<Option<Nonce>, HostError> {
        self.call(HostCall::ShowPanel { tab_id, frame_id }).await
    }

    async fn hide_panel(&self, tab_id: TabId, frame_id: FrameId) -> Result<(), HostError> {
        self.call(HostCall::HidePanel { tab_id, frame_id })
            .await
            .map(drop)
    }

    async fn open_options_page(&self) -> Result<(), HostError> {
        self.call(HostCall::OpenOptionsPage).await.map(drop)
    }

    async fn show_error_in_options(
        &self,
        code: &str,
        tab_index: Option<u32>,
    ) -> Result<(), HostError> {
        self.call(HostCall::ShowErrorInOptions { code, tab_index })
            .await
            .map(drop)
    }

    fn emit_devtools(&self, event: DevtoolsEvent) {
        if let Err(e) = self.emit(&Outgoing::Devtools { event: &event }) {
            tracing::warn!(error = %e, "failed to emit devtools event");
        }
    }
}
