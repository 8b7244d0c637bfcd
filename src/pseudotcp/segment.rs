use crate::error::{Error, Result};

const HEADER_LEN: usize = 9;

bitflags::bitflags! {
    /// Pseudo-TCP segment flags, a small subset of RFC 793's control bits
    /// (SYN/ACK only — FIN/RST teardown is handled one layer up by the
    /// component closing its selected pair, matching spec.md §4.8's scope).
    pub struct Flags: u8 {
        const SYN = 0b0000_0001;
        const ACK = 0b0000_0010;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

/// One pseudo-TCP segment: a 4-byte sequence number, 4-byte cumulative ack,
/// a flags byte, and payload.
#[derive(Debug, Clone)]
pub struct Segment {
    pub seq: u32,
    pub ack: u32,
    pub flags: Flags,
    pub payload: Vec<u8>,
}

impl Segment {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.seq.to_be_bytes());
        out.extend_from_slice(&self.ack.to_be_bytes());
        out.push(self.flags.bits());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < HEADER_LEN {
            return Err(Error::ErrPseudoTcpShortSegment);
        }
        let seq = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let ack = u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]);
        let flags = Flags::from_bits_truncate(raw[8]);
        Ok(Self {
            seq,
            ack,
            flags,
            payload: raw[HEADER_LEN..].to_vec(),
        })
    }
}
