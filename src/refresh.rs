
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::turn_client::{refresh_interval, TurnServer};

/// spec.md §4.6: reschedules a TURN Refresh request for a relayed candidate
/// before its allocation's lifetime expires. One `CandidateRefresh` exists
/// per relayed candidate, independent of the `TurnServer` it shares with
/// sibling candidates and discoveries.
pub struct CandidateRefresh {
    pub turn_server: Arc<TurnServer>,
    next_refresh: Instant,
    lifetime: Duration,
}

impl CandidateRefresh {
    #[must_use]
    pub fn new(turn_server: Arc<TurnServer>, lifetime: Duration, now: Instant) -> Self {
        Self {
            turn_server,
            next_refresh: now + refresh_interval(lifetime),
            lifetime,
        }
    }

    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        now >= self.next_refresh
    }

    /// Call once the Refresh request the caller sent in response to `due`
    /// succeeds, rearming the timer against the (possibly renewed)
    /// lifetime the TURN server granted.
    pub fn rearm(&mut self, lifetime: Duration, now: Instant) {
        self.lifetime = lifetime;
        self.next_refresh = now + refresh_interval(lifetime);
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
