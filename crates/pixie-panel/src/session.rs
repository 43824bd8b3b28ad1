//! Per-tab panel session state.

use std::collections::HashMap;
use std::sync::Arc;

use pixie_common::{FrameId, Nonce, TabId};
use tokio::sync::futures::Notified;
use tokio::sync::{Notify, RwLock};

/// What the background knows about the panel in one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSession {
    /// Frame currently hosting the panel UI.
    pub frame_id: Option<FrameId>,
    /// Nonce returned by the last show/toggle.
    pub nonce: Option<Nonce>,
    /// Highest sequence number delivered to `frame_id`.
    pub cursor: Option<u64>,
    /// Highest sequence number claimed by a send that has not finished yet.
    pub in_flight: Option<u64>,
}

impl TabSession {
    fn is_empty(&self) -> bool {
        self.frame_id.is_none()
            && self.nonce.is_none()
            && self.cursor.is_none()
            && self.in_flight.is_none()
    }
}

struct Inner {
    sessions: RwLock<HashMap<TabId, TabSession>>,
    frame_bound: Notify,
}

/// Shared handle to the per-tab sessions. Clones point at the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: RwLock::new(HashMap::new()),
                frame_bound: Notify::new(),
            }),
        }
    }

    async fn update<R>(&self, tab_id: TabId, f: impl FnOnce(&mut TabSession) -> R) -> R {
        let mut map = self.inner.sessions.write().await;
        let session = map.entry(tab_id).or_default();
        let out = f(session);
        if session.is_empty() {
            map.remove(&tab_id);
        }
        out
    }

    /// Current state for a tab (all fields empty when unknown).
    pub async fn snapshot(&self, tab_id: TabId) -> TabSession {
        self.inner
            .sessions
            .read()
            .await
            .get(&tab_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn frame_id(&self, tab_id: TabId) -> Option<FrameId> {
        self.inner
            .sessions
            .read()
            .await
            .get(&tab_id)
            .and_then(|s| s.frame_id)
    }

    pub async fn nonce(&self, tab_id: TabId) -> Option<Nonce> {
        self.inner
            .sessions
            .read()
            .await
            .get(&tab_id)
            .and_then(|s| s.nonce.clone())
    }

    pub async fn cursor(&self, tab_id: TabId) -> Option<u64> {
        self.inner
            .sessions
            .read()
            .await
            .get(&tab_id)
            .and_then(|s| s.cursor)
    }

    /// Bind the panel frame for a tab. Sequence tracking starts over, and
    /// anyone blocked in `wait_frame_id` is woken.
    pub async fn bind_frame(&self, tab_id: TabId, frame_id: FrameId) {
        self.update(tab_id, |s| {
            s.frame_id = Some(frame_id);
            s.cursor = None;
            s.in_flight = None;
        })
        .await;
        self.inner.frame_bound.notify_waiters();
    }

    /// Forget the frame and the sequence cursor together.
    pub async fn invalidate_frame(&self, tab_id: TabId) {
        self.update(tab_id, |s| {
            s.frame_id = None;
            s.cursor = None;
            s.in_flight = None;
        })
        .await;
    }

    pub async fn clear_frame(&self, tab_id: TabId) {
        self.update(tab_id, |s| s.frame_id = None).await;
    }

    pub async fn set_nonce(&self, tab_id: TabId, nonce: Option<Nonce>) {
        self.update(tab_id, |s| s.nonce = nonce).await;
    }

    pub async fn clear_nonce(&self, tab_id: TabId) {
        self.update(tab_id, |s| s.nonce = None).await;
    }

    pub async fn clear_cursor(&self, tab_id: TabId) {
        self.update(tab_id, |s| {
            s.cursor = None;
            s.in_flight = None;
        })
        .await;
    }

    /// Claim the right to send message `seq` to the tab's frame.
    ///
    /// Fails with the number that makes `seq` obsolete: a delivered cursor at
    /// or above it, or a newer message already being sent. A send that holds
    /// the claim for `seq` may claim it again on retry.
    pub async fn claim_delivery(&self, tab_id: TabId, seq: u64) -> Result<(), u64> {
        self.update(tab_id, |s| {
            if let Some(current) = s.cursor.filter(|c| *c >= seq) {
                return Err(current);
            }
            if let Some(newer) = s.in_flight.filter(|n| *n > seq) {
                return Err(newer);
            }
            s.in_flight = Some(seq);
            Ok(())
        })
        .await
    }

    /// Give up the claim for `seq`, advancing the cursor when it was delivered.
    pub async fn finish_delivery(&self, tab_id: TabId, seq: u64, delivered: bool) {
        self.update(tab_id, |s| {
            if s.in_flight == Some(seq) {
                s.in_flight = None;
            }
            if delivered && s.cursor.map_or(true, |c| c < seq) {
                s.cursor = Some(seq);
            }
        })
        .await;
    }

    /// Future resolving on the next `bind_frame` for any tab.
    pub(crate) fn frame_bound(&self) -> Notified<'_> {
        self.inner.frame_bound.notified()
    }

    /// Number of tabs with any panel state.
    pub async fn count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn deliver(store: &SessionStore, tab_id: TabId, seq: u64) {
        store.claim_delivery(tab_id, seq).await.unwrap();
        store.finish_delivery(tab_id, seq, true).await;
    }

    #[tokio::test]
    async fn unknown_tab_is_empty() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(TabId(1)).await, TabSession::default());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn bind_frame_resets_cursor() {
        let store = SessionStore::new();
        store.bind_frame(TabId(1), FrameId(4)).await;
        deliver(&store, TabId(1), 3).await;

        store.bind_frame(TabId(1), FrameId(5)).await;
        let session = store.snapshot(TabId(1)).await;
        assert_eq!(session.frame_id, Some(FrameId(5)));
        assert_eq!(session.cursor, None);
    }

    #[tokio::test]
    async fn cursor_is_monotonic() {
        let store = SessionStore::new();
        deliver(&store, TabId(2), 5).await;
        store.finish_delivery(TabId(2), 3, true).await;
        assert_eq!(store.cursor(TabId(2)).await, Some(5));
        deliver(&store, TabId(2), 6).await;
        assert_eq!(store.cursor(TabId(2)).await, Some(6));
    }

    #[tokio::test]
    async fn equal_sequence_is_obsolete() {
        let store = SessionStore::new();
        deliver(&store, TabId(3), 2).await;
        assert_eq!(store.claim_delivery(TabId(3), 1).await, Err(2));
        assert_eq!(store.claim_delivery(TabId(3), 2).await, Err(2));
        assert_eq!(store.claim_delivery(TabId(3), 3).await, Ok(()));
    }

    #[tokio::test]
    async fn nonce_is_independent_of_frame() {
        let store = SessionStore::new();
        store.set_nonce(TabId(1), Some(Nonce::from("n1"))).await;
        store.bind_frame(TabId(1), FrameId(2)).await;
        store.invalidate_frame(TabId(1)).await;

        let session = store.snapshot(TabId(1)).await;
        assert_eq!(session.frame_id, None);
        assert_eq!(session.nonce, Some(Nonce::from("n1")));
    }

    #[tokio::test]
    async fn empty_sessions_are_pruned() {
        let store = SessionStore::new();
        store.bind_frame(TabId(1), FrameId(0)).await;
        store.set_nonce(TabId(2), Some(Nonce::new())).await;
        assert_eq!(store.count().await, 2);

        store.clear_frame(TabId(1)).await;
        store.clear_nonce(TabId(2)).await;
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn tabs_are_isolated() {
        let store = SessionStore::new();
        store.bind_frame(TabId(1), FrameId(1)).await;
        deliver(&store, TabId(1), 10).await;
        assert_eq!(store.frame_id(TabId(2)).await, None);
        assert_eq!(store.cursor(TabId(2)).await, None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.bind_frame(TabId(9), FrameId(3)).await;
        assert_eq!(other.frame_id(TabId(9)).await, Some(FrameId(3)));
    }

    #[tokio::test]
    async fn claim_rejects_delivered_and_newer_in_flight() {
        let store = SessionStore::new();
        assert_eq!(store.claim_delivery(TabId(1), 3).await, Ok(()));
        assert_eq!(store.claim_delivery(TabId(1), 3).await, Ok(()));
        assert_eq!(store.claim_delivery(TabId(1), 2).await, Err(3));
        assert_eq!(store.claim_delivery(TabId(1), 4).await, Ok(()));

        store.finish_delivery(TabId(1), 4, true).await;
        assert_eq!(store.claim_delivery(TabId(1), 4).await, Err(4));
        // The overtaken claim for 3 no longer counts as in flight.
        let session = store.snapshot(TabId(1)).await;
        assert_eq!(session.cursor, Some(4));
        assert_eq!(session.in_flight, None);
    }

    #[tokio::test]
    async fn failed_delivery_releases_claim_without_advancing() {
        let store = SessionStore::new();
        store.claim_delivery(TabId(2), 5).await.unwrap();
        store.finish_delivery(TabId(2), 5, false).await;

        assert_eq!(store.snapshot(TabId(2)).await, TabSession::default());
        assert_eq!(store.count().await, 0);
        assert_eq!(store.claim_delivery(TabId(2), 1).await, Ok(()));
    }

    #[tokio::test]
    async fn rebinding_drops_in_flight_claim() {
        let store = SessionStore::new();
        store.bind_frame(TabId(3), FrameId(1)).await;
        store.claim_delivery(TabId(3), 9).await.unwrap();

        store.bind_frame(TabId(3), FrameId(2)).await;
        assert_eq!(store.claim_delivery(TabId(3), 1).await, Ok(()));
    }
}
