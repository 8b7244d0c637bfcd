
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::check::CheckList;
use crate::component::{Component, IoMode};
use crate::state::GatheringState;

/// Groups the [`Component`]s that share one local/remote ufrag+pwd pair and
/// are gathered/checked together (spec.md §3, "Stream"). Most applications
/// use exactly one stream with one or two components (RTP/RTCP), but the
/// coordinator supports any number. The check list lives here rather than
/// per-component because RFC 5245 §5.7.4 unfreezing and §8.1.2 pruning
/// operate across every component's pairs for one stream at once.
pub struct Stream {
    pub id: u16,
    pub name: String,
    components: Mutex<HashMap<u16, Arc<Component>>>,
    gathering_state: AtomicU8,
    pub check_list: Mutex<CheckList>,
    pub local_ufrag: Mutex<String>,
    pub local_password: Mutex<String>,
    pub remote_ufrag: Mutex<String>,
    pub remote_password: Mutex<String>,
    /// IP Type-of-Service value applied to sockets gathered for this
    /// stream (spec.md §3).
    pub tos: u8,
    /// Set once the first inbound Binding request has been seen for any
    /// component of this stream, per RFC 8445 §12's "early media" allowance
    /// for answering before the full check list completes.
    initial_binding_request_received: AtomicBool,
    io_mode: IoMode,
}

impl Stream {
    #[must_use]
    pub fn new(id: u16, component_ids: &[u16], io_mode: IoMode) -> Self {
        Self::new_named(id, String::new(), component_ids, io_mode)
    }

    #[must_use]
    pub fn new_named(id: u16, name: String, component_ids: &[u16], io_mode: IoMode) -> Self {
        let components = component_ids
            .iter()
            .map(|&cid| (cid, Arc::new(Component::new(cid, io_mode))))
            .collect();
        Self {
            id,
            name,
            components: Mutex::new(components),
            gathering_state: AtomicU8::new(GatheringState::New as u8),
            check_list: Mutex::new(CheckList::new()),
            local_ufrag: Mutex::new(String::new()),
            local_password: Mutex::new(String::new()),
            remote_ufrag: Mutex::new(String::new()),
            remote_password: Mutex::new(String::new()),
            tos: 0,
            initial_binding_request_received: AtomicBool::new(false),
            io_mode,
        }
    }

    pub async fn component(&self, id: u16) -> Option<Arc<Component>> {
        self.components.lock().await.get(&id).cloned()
    }

    /// Returns the component for `id`, creating it (with this stream's
    /// default `io_mode`) if it doesn't exist yet. Components are created
    /// lazily as candidates/pairs referencing their id appear, since the
    /// public API doesn't require declaring component ids up front.
    pub async fn ensure_component(&self, id: u16) -> Arc<Component> {
        let mut components = self.components.lock().await;
        components
            .entry(id)
            .or_insert_with(|| Arc::new(Component::new(id, self.io_mode)))
            .clone()
    }

    pub async fn components(&self) -> Vec<Arc<Component>> {
        self.components.lock().await.values().cloned().collect()
    }

    #[must_use]
    pub fn gathering_state(&self) -> GatheringState {
        GatheringState::from(self.gathering_state.load(Ordering::SeqCst))
    }

    pub fn set_gathering_state(&self, s: GatheringState) {
        self.gathering_state.store(s as u8, Ordering::SeqCst);
    }

    pub fn initial_binding_request_received(&self) -> bool {
        self.initial_binding_request_received.load(Ordering::SeqCst)
    }

    pub fn mark_initial_binding_request_received(&self) {
        self.initial_binding_request_received
            .store(true, Ordering::SeqCst);
    }

    /// True once every component has either a selected pair or has
    /// permanently failed (spec.md §4.4, check-list completion).
    pub async fn all_components_settled(&self) -> bool {
        self.components
            .lock()
            .await
            .values()
            .all(|c| {
                matches!(
                    c.state(),
                    crate::state::ComponentState::Ready | crate::state::ComponentState::Failed
                )
            })
    }
}
