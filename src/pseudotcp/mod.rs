
pub mod segment;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use segment::{Flags, Segment};

use crate::error::{Error, Result};

/// Initial retransmission timeout and its ceiling, matching the magnitude
/// libnice's pseudo-TCP port uses for its RTO estimator.
const INITIAL_RTO: Duration = Duration::from_millis(300);
const MAX_RTO: Duration = Duration::from_secs(6);

/// Segments in flight before `send` starts returning
/// [`Error::ErrPseudoTcpWouldBlock`].
const SEND_WINDOW: usize = 64;

/// Whether reads reproduce the write-side message boundaries
/// (`Packetized`, one `recv` per `send`) or present a continuous byte
/// stream (`Bytestream`, RFC 793 semantics), matching libnice's
/// `inputstream.c`/`outputstream.c` split. Compatibility modes that
/// require message framing (spec.md §4.8,
/// [`crate::compatibility::Compatibility::forces_packetized_pseudotcp`])
/// force `Packetized`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecvMode {
    Bytestream,
    Packetized,
}

enum ConnState {
    Closed,
    SynSent,
    SynReceived,
    Established,
    Closing,
}

struct InFlight {
    segment: Segment,
    sent_at: Instant,
    retransmits: u8,
}

/// A sans-IO pseudo-TCP endpoint (spec.md §4.8). Contains no networking
/// code: the owner feeds in received datagrams via [`PseudoTcp::recv_segment`]
/// and drains outbound ones via [`PseudoTcp::poll_transmit`], and drives
/// time with [`PseudoTcp::on_timeout`]/[`PseudoTcp::poll_timeout`] — the
/// same `Endpoint`/`Association` split `sctp-proto` uses to keep protocol
/// logic free of `tokio::net` or `Instant::now()` calls.
pub struct PseudoTcp {
    state: ConnState,
    recv_mode: RecvMode,

    send_next: u32,
    send_una: u32,
    recv_next: u32,

    send_queue: VecDeque<InFlight>,
    unsent: VecDeque<Vec<u8>>,
    recv_buf: VecDeque<u8>,
    /// Packetized-mode message boundaries kept alongside `recv_buf`: each
    /// entry is the length of one still-buffered message.
    recv_msg_lens: VecDeque<usize>,

    rto: Duration,
    outbox: VecDeque<Vec<u8>>,
}

impl PseudoTcp {
    #[must_use]
    pub fn new(recv_mode: RecvMode) -> Self {
        Self {
            state: ConnState::Closed,
            recv_mode,
            send_next: 0,
            send_una: 0,
            recv_next: 0,
            send_queue: VecDeque::new(),
            unsent: VecDeque::new(),
            recv_buf: VecDeque::new(),
            recv_msg_lens: VecDeque::new(),
            rto: INITIAL_RTO,
            outbox: VecDeque::new(),
        }
    }

    /// Begins the active-open handshake (RFC 793 §3.4, simplified to a
    /// two-way SYN/SYN-ACK given ICE has already established reachability).
    pub fn connect(&mut self) {
        self.state = ConnState::SynSent;
        self.queue_control(Flags::SYN, self.send_next);
    }

    fn queue_control(&mut self, flags: Flags, seq: u32) {
        let seg = Segment {
            seq,
            ack: self.recv_next,
            flags,
            payload: Vec::new(),
        };
        self.outbox.push_back(seg.encode());
    }

    /// Queues `data` for transmission. Errors with
    /// [`Error::ErrPseudoTcpWouldBlock`] once [`SEND_WINDOW`] segments are
    /// unacknowledged, the caller's cue to wait for `poll_transmit`/`recv`
    /// progress before calling again.
    pub fn send(&mut self, data: &[u8]) -> Result<usize> {
        if !matches!(self.state, ConnState::Established) {
            return Err(Error::ErrPseudoTcpClosed);
        }
        if self.send_queue.len() >= SEND_WINDOW {
            return Err(Error::ErrPseudoTcpWouldBlock);
        }
        let len = data.len();
        self.unsent.push_back(data.to_vec());
        self.pump_unsent();
        Ok(len)
    }

    fn pump_unsent(&mut self) {
        while self.send_queue.len() < SEND_WINDOW {
            let Some(chunk) = self.unsent.pop_front() else {
                break;
            };
            let seg = Segment {
                seq: self.send_next,
                ack: self.recv_next,
                flags: Flags::ACK,
                payload: chunk,
            };
            self.send_next = self.send_next.wrapping_add(seg.payload.len().max(1) as u32);
            self.outbox.push_back(seg.encode());
            self.send_queue.push_back(InFlight {
                segment: seg,
                sent_at: Instant::now(),
                retransmits: 0,
            });
        }
    }

    /// Drains one outbound datagram the owner should hand to the selected
    /// candidate pair's socket.
    pub fn poll_transmit(&mut self) -> Option<Vec<u8>> {
        self.outbox.pop_front()
    }

    /// Feeds in one received datagram from the peer.
    pub fn recv_segment(&mut self, raw: &[u8]) -> Result<()> {
        let seg = Segment::decode(raw)?;

        if seg.flags.contains(Flags::SYN) {
            match self.state {
                ConnState::Closed => {
                    self.state = ConnState::SynReceived;
                    self.recv_next = seg.seq.wrapping_add(1);
                    self.queue_control(Flags::SYN | Flags::ACK, self.send_next);
                }
                ConnState::SynSent => {
                    self.state = ConnState::Established;
                    self.recv_next = seg.seq.wrapping_add(1);
                    self.queue_control(Flags::ACK, self.send_next);
                }
                _ => {}
            }
            return Ok(());
        }

        if matches!(self.state, ConnState::SynReceived) && seg.flags.contains(Flags::ACK) {
            self.state = ConnState::Established;
        }

        // Cumulative ack: drop every in-flight segment fully covered by it.
        while let Some(front) = self.send_queue.front() {
            let covered = front
                .segment
                .seq
                .wrapping_add(front.segment.payload.len().max(1) as u32)
                <= seg.ack;
            if !covered {
                break;
            }
            self.send_queue.pop_front();
        }
        self.pump_unsent();

        if !seg.payload.is_empty() && seg.seq == self.recv_next {
            self.recv_next = self.recv_next.wrapping_add(seg.payload.len() as u32);
            self.recv_msg_lens.push_back(seg.payload.len());
            self.recv_buf.extend(seg.payload);
            self.queue_control(Flags::ACK, self.send_next);
        }

        Ok(())
    }

    /// Reads up to `buf.len()` bytes. In [`RecvMode::Packetized`] mode,
    /// never returns bytes from more than one originally-sent `send` call.
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.recv_buf.is_empty() {
            return if matches!(self.state, ConnState::Closed) {
                Err(Error::ErrPseudoTcpEof)
            } else {
                Err(Error::ErrPseudoTcpWouldBlock)
            };
        }
        let take = match self.recv_mode {
            RecvMode::Bytestream => buf.len().min(self.recv_buf.len()),
            RecvMode::Packetized => {
                let msg_len = *self.recv_msg_lens.front().unwrap_or(&0);
                msg_len.min(buf.len())
            }
        };
        for (i, slot) in buf.iter_mut().take(take).enumerate() {
            *slot = self.recv_buf[i];
        }
        for _ in 0..take {
            self.recv_buf.pop_front();
        }
        if self.recv_mode == RecvMode::Packetized {
            if let Some(front) = self.recv_msg_lens.front_mut() {
                *front -= take;
                if *front == 0 {
                    self.recv_msg_lens.pop_front();
                }
            }
        }
        Ok(take)
    }

    /// Next deadline the owner should call [`PseudoTcp::on_timeout`] at, or
    /// `None` if nothing is outstanding.
    #[must_use]
    pub fn poll_timeout(&self) -> Option<Instant> {
        self.send_queue.front().map(|f| f.sent_at + self.rto)
    }

    /// Retransmits any segment whose RTO has elapsed as of `now`, doubling
    /// the RTO (capped at [`MAX_RTO`]) per segment retried.
    pub fn on_timeout(&mut self, now: Instant) {
        for inflight in &mut self.send_queue {
            if now < inflight.sent_at + self.rto {
                continue;
            }
            inflight.sent_at = now;
            inflight.retransmits += 1;
            self.rto = std::cmp::min(self.rto * 2, MAX_RTO);
            self.outbox.push_back(inflight.segment.encode());
        }
    }

    #[must_use]
    pub fn is_established(&self) -> bool {
        matches!(self.state, ConnState::Established)
    }
}
