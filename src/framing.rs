
use crate::error::{Error, Result};

/// RFC 4571 frames any packet-oriented protocol (here, STUN/TURN/pseudo-TCP
/// segments) over a byte stream as a 16-bit big-endian length prefix
/// followed by that many bytes. Used for ICE-TCP candidates and
/// TURN-over-TCP control traffic (spec.md §4.9).
pub const LENGTH_PREFIX_SIZE: usize = 2;

pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Encodes one frame, prefixing `payload` with its big-endian u16 length.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(Error::ErrBadStunRequest);
    }
    let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Incrementally reassembles RFC 4571 frames out of a byte stream. Bytes
/// are fed in via [`Decoder::feed`] as they arrive from the underlying TCP
/// connection; complete frames are drained with [`Decoder::next_frame`].
/// Mirrors the buffering discipline in libnice's `inputstream.c`, which
/// keeps a partial-frame buffer across `recv` calls rather than assuming
/// one `recv` yields exactly one frame.
#[derive(Default)]
pub struct Decoder {
    buf: Vec<u8>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Returns the next complete frame's payload, consuming it from the
    /// internal buffer, or `None` if fewer than one full frame is
    /// currently buffered.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        if self.buf.len() < LENGTH_PREFIX_SIZE {
            return None;
        }
        let len = u16::from_be_bytes([self.buf[0], self.buf[1]]) as usize;
        if self.buf.len() < LENGTH_PREFIX_SIZE + len {
            return None;
        }
        let frame = self.buf[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + len].to_vec();
        self.buf.drain(..LENGTH_PREFIX_SIZE + len);
        Some(frame)
    }

    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }
}
