#[cfg(test)]
mod priority_test;

use stun::attributes::ATTR_PRIORITY;
use stun::checks::check_size;
use stun::message::*;

use crate::compatibility::Compatibility;

pub(crate) const PRIORITY_SIZE: usize = 4; // 32 bit

/// Represents the STUN PRIORITY attribute carried on every Binding request
/// (RFC 5245 §7.1.2.1).
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct PriorityAttr(pub u32);

impl Setter for PriorityAttr {
    fn add_to(&self, m: &mut Message) -> Result<(), stun::Error> {
        let mut v = vec![0; PRIORITY_SIZE];
        v.copy_from_slice(&self.0.to_be_bytes());
        m.add(ATTR_PRIORITY, &v);
        Ok(())
    }
}

impl Getter for PriorityAttr {
    fn get_from(&mut self, m: &Message) -> Result<(), stun::Error> {
        let v = m.get(ATTR_PRIORITY)?;
        check_size(ATTR_PRIORITY, v.len(), PRIORITY_SIZE)?;
        self.0 = u32::from_be_bytes([v[0], v[1], v[2], v[3]]);
        Ok(())
    }
}

/// Computes a candidate priority per RFC 5245 §4.1.2.1:
/// `priority = (2^24) * type_pref + (2^8) * local_pref + (2^0) * (256 - component_id)`.
#[must_use]
pub fn candidate_priority(type_preference: u16, local_preference: u16, component_id: u16) -> u32 {
    (u32::from(type_preference) << 24)
        + (u32::from(local_preference) << 8)
        + (256 - u32::from(component_id))
}

/// Computes the priority of a candidate pair per RFC 5245 §5.7.2:
/// `2^32 * min(G, D) + 2 * max(G, D) + (G > D ? 1 : 0)`, where G is the
/// controlling agent's candidate priority and D is the controlled agent's.
///
/// This matches spec.md's literal formula. The teacher crate computes the
/// equivalent `((1 << 32) - 1) * min + 2 * max + tie` (using `2^32 - 1`
/// instead of `2^32`); both orderings are isomorphic since the
/// `2 * max(G, D)` term is always strictly smaller than `2^32`, so no pair
/// can ever tie across the two formulas — but they are not numerically
/// identical. This crate follows spec.md's literal formula; see DESIGN.md.
#[must_use]
pub fn pair_priority(controlling_priority: u32, controlled_priority: u32) -> u64 {
    let g = u64::from(controlling_priority);
    let d = u64::from(controlled_priority);
    let (lo, hi) = if g < d { (g, d) } else { (d, g) };
    (1u64 << 32) * lo + 2 * hi + u64::from(g > d)
}

/// Type preference table (RFC 5245 §4.1.2.2), subject to compatibility-mode
/// adjustment for peer-reflexive candidates discovered mid-check.
#[must_use]
pub fn type_preference(candidate_type: crate::candidate::CandidateType, _compat: Compatibility) -> u16 {
    use crate::candidate::CandidateType;
    match candidate_type {
        CandidateType::Host => 126,
        CandidateType::PeerReflexive => 110,
        CandidateType::ServerReflexive => 100,
        CandidateType::Relayed | CandidateType::Unspecified => 0,
    }
}
