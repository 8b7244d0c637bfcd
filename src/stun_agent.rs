
use std::collections::HashMap;
use std::time::{Duration, Instant};

use stun::agent::TransactionId;
use stun::message::Message;

use crate::error::{Error, Result};

/// RFC 5389 §7.2.1 default initial retransmission timeout.
pub const DEFAULT_RTO: Duration = Duration::from_millis(500);

/// spec.md §4.3: number of retransmits before a STUN transaction is
/// considered failed (matches the teacher's `DEFAULT_MAX_BINDING_REQUESTS`).
pub const DEFAULT_MAX_RETRANSMITS: u8 = 7;

struct PendingTransaction {
    request: Message,
    rto: Duration,
    retransmits: u8,
    deadline: Instant,
}

/// Tracks in-flight STUN transactions keyed by transaction id and drives
/// RFC 5389 §7.2.1 exponential-backoff retransmission, on top of the real
/// `stun` crate's message encode/validate pipeline
/// (`stun::message::Message`, `stun::agent::TransactionId`). Validation
/// itself (integrity, fingerprint) is delegated to `stun::message::Message::decode`
/// and the `stun::integrity`/`stun::fingerprint` checks at the call site;
/// this type owns only the transaction table and timers spec.md §4.3
/// describes.
#[derive(Default)]
pub struct StunAgent {
    transactions: HashMap<TransactionId, PendingTransaction>,
}

/// Outcome of advancing the agent's clock by one tick.
pub enum Tick {
    /// Nothing to do until the next deadline.
    Idle,
    /// Retransmit these requests now.
    Retransmit(Vec<(TransactionId, Message)>),
    /// These transactions exhausted their retry budget and failed.
    TimedOut(Vec<TransactionId>),
}

impl StunAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: TransactionId, request: Message, now: Instant) {
        self.transactions.insert(
            id,
            PendingTransaction {
                request,
                rto: DEFAULT_RTO,
                retransmits: 0,
                deadline: now + DEFAULT_RTO,
            },
        );
    }

    /// Call on every received STUN response; removes the transaction if it
    /// matches, returning `Ok(())`, or `Err(ErrUnmatchedResponse)` if no
    /// in-flight transaction has this id.
    pub fn complete(&mut self, id: &TransactionId) -> Result<()> {
        self.transactions
            .remove(id)
            .map(|_| ())
            .ok_or(Error::ErrUnmatchedResponse)
    }

    pub fn cancel(&mut self, id: &TransactionId) {
        self.transactions.remove(id);
    }

    pub fn is_pending(&self, id: &TransactionId) -> bool {
        self.transactions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Advances every pending transaction's timer, doubling RTO on
    /// retransmit (capped, per spec.md §4.3, at
    /// [`crate::agent::agent_config::MAX_BINDING_REQUEST_TIMEOUT`]) and
    /// failing any transaction past [`DEFAULT_MAX_RETRANSMITS`] retries.
    pub fn tick(&mut self, now: Instant, max_rto: Duration) -> Tick {
        let mut retransmit = Vec::new();
        let mut timed_out = Vec::new();

        for (id, txn) in &mut self.transactions {
            if now < txn.deadline {
                continue;
            }
            if txn.retransmits >= DEFAULT_MAX_RETRANSMITS {
                timed_out.push(*id);
                continue;
            }
            txn.retransmits += 1;
            txn.rto = std::cmp::min(txn.rto * 2, max_rto);
            txn.deadline = now + txn.rto;
            retransmit.push((*id, txn.request.clone()));
        }

        for id in &timed_out {
            self.transactions.remove(id);
        }

        if !timed_out.is_empty() {
            Tick::TimedOut(timed_out)
        } else if !retransmit.is_empty() {
            Tick::Retransmit(retransmit)
        } else {
            Tick::Idle
        }
    }
}
