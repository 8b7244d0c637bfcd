
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::candidate::{CandidatePair, CandidatePairState};
use crate::control::Role;

/// Default check pacing interval (`Ta`, RFC 5245 §16), matching the
/// teacher's `DEFAULT_CHECK_INTERVAL`.
pub const DEFAULT_TA: std::time::Duration = std::time::Duration::from_millis(200);

/// Owns one stream's check list: every candidate pair, its ordering, and
/// the freeze/unfreeze, triggered-check and pruning bookkeeping RFC 5245
/// §5.7-§5.8 describes. Grounded in the teacher's `ping_all_candidates`
/// and `agent_selector.rs`'s nomination path, generalized from the
/// teacher's four-state model to the full
/// Frozen/Waiting/InProgress/Succeeded/Failed/Cancelled/Discovered machine.
#[derive(Default)]
pub struct CheckList {
    pairs: Vec<Arc<CandidatePair>>,
    /// Pairs queued for an immediate check outside of normal pacing order,
    /// e.g. in response to an incoming request from a pair not yet checked
    /// (RFC 5245 §7.2.1.4, "triggered check queue").
    triggered: VecDeque<Arc<CandidatePair>>,
}

impl CheckList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pair(&mut self, pair: Arc<CandidatePair>) {
        self.pairs.push(pair);
    }

    #[must_use]
    pub fn pairs(&self) -> &[Arc<CandidatePair>] {
        &self.pairs
    }

    fn state_of(pair: &CandidatePair) -> CandidatePairState {
        CandidatePairState::from(pair.state.load(Ordering::SeqCst))
    }

    fn set_state(pair: &CandidatePair, s: CandidatePairState) {
        pair.state.store(s as u8, Ordering::SeqCst);
    }

    /// RFC 5245 §5.7.4: unfreezes exactly one pair per distinct foundation,
    /// preferring (within a foundation group) the highest-priority pair.
    /// Foundation grouping uses the *local* candidate's foundation, the
    /// same key the teacher's gathering logic assigns candidates under.
    pub fn unfreeze_initial(&mut self) {
        let mut seen_foundations: HashSet<String> = HashSet::new();
        let mut by_foundation: std::collections::HashMap<String, Vec<usize>> =
            std::collections::HashMap::new();
        for (idx, pair) in self.pairs.iter().enumerate() {
            by_foundation
                .entry(pair.local.foundation())
                .or_default()
                .push(idx);
        }
        for (foundation, idxs) in by_foundation {
            if seen_foundations.contains(&foundation) {
                continue;
            }
            seen_foundations.insert(foundation);
            if let Some(&best) = idxs
                .iter()
                .max_by_key(|&&i| self.pairs[i].priority())
            {
                Self::set_state(&self.pairs[best], CandidatePairState::Waiting);
            }
        }
    }

    /// Pushes `pair` onto the triggered-check queue, which the scheduler
    /// drains ahead of ordinary `Ta`-paced waiting pairs.
    pub fn trigger(&mut self, pair: Arc<CandidatePair>) {
        Self::set_state(&pair, CandidatePairState::Waiting);
        self.triggered.push_back(pair);
    }

    /// Picks the next pair to check this tick: triggered pairs first
    /// (FIFO), then the highest-priority `Waiting` pair, per RFC 5245
    /// §5.8's ordinary-check scheduling rule.
    pub fn next_to_check(&mut self) -> Option<Arc<CandidatePair>> {
        while let Some(pair) = self.triggered.pop_front() {
            if Self::state_of(&pair) == CandidatePairState::Waiting {
                Self::set_state(&pair, CandidatePairState::InProgress);
                return Some(pair);
            }
        }
        let best = self
            .pairs
            .iter()
            .filter(|p| Self::state_of(p) == CandidatePairState::Waiting)
            .max_by_key(|p| p.priority())
            .cloned();
        if let Some(ref pair) = best {
            Self::set_state(pair, CandidatePairState::InProgress);
        }
        best
    }

    /// RFC 5245 §5.7.4 / §7.1.2.2: when a pair in `foundation`'s group
    /// succeeds, unfreeze the best remaining Frozen pair in that same
    /// foundation group so it can be scheduled too. This is how a
    /// multi-component stream makes progress on every component's
    /// foundation group, not just the one that happened to succeed first.
    pub fn unfreeze_foundation(&mut self, foundation: &str) {
        let best = self
            .pairs
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.local.foundation() == foundation && Self::state_of(p) == CandidatePairState::Frozen
            })
            .max_by_key(|(_, p)| p.priority())
            .map(|(i, _)| i);
        if let Some(idx) = best {
            Self::set_state(&self.pairs[idx], CandidatePairState::Waiting);
        }
    }

    /// RFC 8445 §8.1.2 pruning on nomination: once `nominated` is chosen
    /// for `component`, every Frozen/Waiting pair is cancelled outright,
    /// and In-Progress pairs are cancelled unless their priority is at
    /// least as high as `h`, the highest priority seen among pairs already
    /// nominated. The component transitions to `Ready` once pruning
    /// completes. Grounded in the teacher's `agent_selector.rs`
    /// nomination path, which this replaces with list-wide pruning instead
    /// of leaving losing pairs to run to completion.
    pub fn prune_on_nomination(
        &mut self,
        nominated: &Arc<CandidatePair>,
        component: &crate::component::Component,
    ) {
        let h = self
            .pairs
            .iter()
            .filter(|p| p.nominated.load(Ordering::SeqCst))
            .map(|p| p.priority())
            .max()
            .unwrap_or_else(|| nominated.priority());

        for pair in &self.pairs {
            if Arc::ptr_eq(pair, nominated) {
                continue;
            }
            match Self::state_of(pair) {
                CandidatePairState::Frozen | CandidatePairState::Waiting => {
                    Self::set_state(pair, CandidatePairState::Cancelled);
                }
                CandidatePairState::InProgress if pair.priority() < h => {
                    Self::set_state(pair, CandidatePairState::Cancelled);
                }
                _ => {}
            }
        }

        component.set_state(crate::state::ComponentState::Ready);
    }

    /// RFC 5245 §7.1.2.2: after a role conflict flips the local role,
    /// every pair's G/D assignment (and therefore its priority ordering)
    /// must be recomputed against the new role before checks resume.
    pub fn recompute_priorities(&self, is_controlling: bool) {
        for pair in &self.pairs {
            pair.set_controlling(is_controlling);
        }
    }

    #[must_use]
    pub fn all_settled(&self) -> bool {
        self.pairs.iter().all(|p| {
            matches!(
                Self::state_of(p),
                CandidatePairState::Succeeded | CandidatePairState::Failed | CandidatePairState::Cancelled
            )
        })
    }
}

/// RFC 5245 §7.1.2.2 role-conflict resolution: decides whether the local
/// agent must switch role, based on comparing tie-breakers. Returns `true`
/// if the local agent should switch to the opposite role of `local_role`.
#[must_use]
pub fn resolve_role_conflict(local_role: Role, local_tie_breaker: u64, remote_tie_breaker: u64) -> bool {
    match local_role {
        Role::Controlling => remote_tie_breaker >= local_tie_breaker,
        Role::Controlled => remote_tie_breaker < local_tie_breaker,
        Role::Unspecified => false,
    }
}
