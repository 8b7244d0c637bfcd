#[cfg(test)]
mod component_test;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, Notify};

use crate::candidate::{Candidate, CandidatePair};
use crate::state::ComponentState;
use crate::stun_agent::StunAgent;
use crate::turn_client::TurnServer;

/// Matches libnice's `NICE_COMPONENT_MAX_VALID_CANDIDATES` (component.h):
/// the number of resolved pairs retained per component for diagnostics once
/// superseded by a better one.
pub(crate) const MAX_VALID_CANDIDATE_PAIRS: usize = 128;

/// How application data is delivered once a component has a selected pair
/// (spec.md §4.8/§4.9): `Pull` callers read via `Agent::read`, `Push`
/// callers are fed through a registered sink. Mirrors libnice's
/// `inputstream.c`/`outputstream.c` split between a pollable buffer and a
/// direct-callback mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IoMode {
    Pull,
    Push,
}

/// A connectivity check received before the component had a pair to match
/// it against, or one carrying USE-CANDIDATE ahead of its own check being
/// scheduled. Queued so `CheckList` scheduling can fold it in once the
/// pair exists, per RFC 5245 §7.2's "triggered checks from the network".
pub struct IncomingCheck {
    pub local: Arc<dyn Candidate + Send + Sync>,
    pub remote: Arc<dyn Candidate + Send + Sync>,
    pub use_candidate: bool,
    pub priority: u32,
}

/// One component of a [`crate::stream::Stream`] (e.g. RTP or RTCP). Owns the
/// component-level connectivity state, the bounded history of valid pairs,
/// and (when `reliable` is set on the owning stream) the pseudo-TCP engine
/// and its packet replay queue for data that arrived before a pair was
/// selected.
pub struct Component {
    pub id: u16,
    state: AtomicU8,
    selected_pair: ArcSwapOption<CandidatePair>,
    valid_candidates: Mutex<VecDeque<Arc<CandidatePair>>>,
    pub(crate) notify: Notify,
    io_mode: IoMode,
    /// Datagrams that arrived over the eventually-selected pair before
    /// selection completed; replayed to the reader once a pair is chosen.
    /// Grounded in libnice's `inputstream.c` pre-selection buffering.
    queued_tcp_packets: Mutex<VecDeque<Vec<u8>>>,
    /// Reliable-transport engine for this component, present once the
    /// owning stream is marked `reliable` (spec.md §4.8). `None` for
    /// ordinary unreliable (RTP/RTCP) components.
    pub pseudo_tcp: Mutex<Option<crate::pseudotcp::PseudoTcp>>,
    /// TURN servers this component may allocate a relay candidate against;
    /// shared with [`crate::discovery::CandidateDiscovery`].
    pub turn_servers: Mutex<Vec<Arc<TurnServer>>>,
    /// Inbound checks that arrived before a matching local candidate
    /// pair existed.
    pub incoming_checks: Mutex<VecDeque<IncomingCheck>>,
    /// The candidate to keep using across an ICE restart until the new
    /// check list produces a better one, so media doesn't glitch during
    /// renegotiation (spec.md §4.7).
    pub restart_candidate: ArcSwapOption<dyn Candidate + Send + Sync>,
    /// This component's relayed (TURN) local candidate, if one was
    /// allocated; kept distinct from `selected_pair` so refresh/teardown
    /// can find it even after a different pair is selected.
    pub turn_candidate: ArcSwapOption<dyn Candidate + Send + Sync>,
    /// Owns the STUN transaction table for every check this component has
    /// in flight (spec.md §8 invariant: every In-Progress pair has a live
    /// transaction in its owning component's table).
    pub stun_validator: Mutex<StunAgent>,
    pub min_port: u16,
    pub max_port: u16,
    /// Set once this component has fallen back to a `Compatibility`-specific
    /// connectivity path (e.g. Google's legacy non-ICE-CONTROLLING
    /// single-check mode) rather than full RFC 5245 checks.
    fallback_mode: AtomicBool,
}

impl Component {
    #[must_use]
    pub fn new(id: u16, io_mode: IoMode) -> Self {
        Self::new_with_ports(id, io_mode, 0, 0)
    }

    #[must_use]
    pub fn new_with_ports(id: u16, io_mode: IoMode, min_port: u16, max_port: u16) -> Self {
        Self {
            id,
            state: AtomicU8::new(ComponentState::Disconnected.as_u8()),
            selected_pair: ArcSwapOption::from(None),
            valid_candidates: Mutex::new(VecDeque::with_capacity(MAX_VALID_CANDIDATE_PAIRS)),
            notify: Notify::new(),
            io_mode,
            queued_tcp_packets: Mutex::new(VecDeque::new()),
            pseudo_tcp: Mutex::new(None),
            turn_servers: Mutex::new(Vec::new()),
            incoming_checks: Mutex::new(VecDeque::new()),
            restart_candidate: ArcSwapOption::from(None),
            turn_candidate: ArcSwapOption::from(None),
            stun_validator: Mutex::new(StunAgent::new()),
            min_port,
            max_port,
            fallback_mode: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_fallback_mode(&self) -> bool {
        self.fallback_mode.load(Ordering::SeqCst)
    }

    pub fn set_fallback_mode(&self, on: bool) {
        self.fallback_mode.store(on, Ordering::SeqCst);
    }

    #[must_use]
    pub fn state(&self) -> ComponentState {
        ComponentState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, s: ComponentState) {
        self.state.store(s.as_u8(), Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn io_mode(&self) -> IoMode {
        self.io_mode
    }

    #[must_use]
    pub fn selected_pair(&self) -> Option<Arc<CandidatePair>> {
        self.selected_pair.load_full()
    }

    /// Installs `pair` as selected and records it in the bounded history,
    /// evicting the oldest entry past [`MAX_VALID_CANDIDATE_PAIRS`].
    pub async fn set_selected_pair(&self, pair: Arc<CandidatePair>) {
        self.selected_pair.store(Some(pair.clone()));
        let mut history = self.valid_candidates.lock().await;
        if history.len() >= MAX_VALID_CANDIDATE_PAIRS {
            history.pop_front();
        }
        history.push_back(pair);
        self.notify.notify_waiters();
    }

    pub async fn valid_candidates_stats(&self) -> Vec<Arc<CandidatePair>> {
        self.valid_candidates.lock().await.iter().cloned().collect()
    }

    pub async fn queue_packet(&self, data: Vec<u8>) {
        self.queued_tcp_packets.lock().await.push_back(data);
    }

    pub async fn drain_queued_packets(&self) -> Vec<Vec<u8>> {
        let mut q = self.queued_tcp_packets.lock().await;
        q.drain(..).collect()
    }
}
