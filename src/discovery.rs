
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::candidate::CandidateType;
use crate::turn_client::TurnServer;

/// spec.md §4.5: periodic work item resolving one server-reflexive or
/// relayed candidate. Host candidates need no discovery step (their address
/// is known from the interface enumeration), so only `ServerReflexive` and
/// `Relayed` discoveries are ever constructed.
pub struct CandidateDiscovery {
    pub candidate_type: CandidateType,
    pub component_id: u16,
    pub server_addr: SocketAddr,
    pub turn_server: Option<Arc<TurnServer>>,
    pub interval: Duration,
    done: AtomicBool,
}

impl CandidateDiscovery {
    #[must_use]
    pub fn new_server_reflexive(component_id: u16, server_addr: SocketAddr, interval: Duration) -> Self {
        Self {
            candidate_type: CandidateType::ServerReflexive,
            component_id,
            server_addr,
            turn_server: None,
            interval,
            done: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn new_relayed(
        component_id: u16,
        server_addr: SocketAddr,
        turn_server: Arc<TurnServer>,
        interval: Duration,
    ) -> Self {
        Self {
            candidate_type: CandidateType::Relay,
            component_id,
            server_addr,
            turn_server: Some(turn_server),
            interval,
            done: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    pub fn mark_done(&self) {
        self.done.store(true, Ordering::SeqCst);
    }
}
