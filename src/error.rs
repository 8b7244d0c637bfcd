use std::io;
use std::net;
use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the ICE core (spec.md §7). Variants are grouped by the
/// kind they belong to in a doc comment rather than split into sub-enums, to
/// keep `?` ergonomic across the crate the way the teacher crate does.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ---- InvalidArgument: malformed id, null buffer, out-of-range value.
    // Never mutates state. ----
    #[error("invalid stream id")]
    ErrInvalidStreamId,
    #[error("invalid component id")]
    ErrInvalidComponentId,
    #[error("local username fragment is less than 24 bits long")]
    ErrLocalUfragInsufficientBits,
    #[error("local password is less than 128 bits long")]
    ErrLocalPwdInsufficientBits,
    #[error("remote ufrag is empty")]
    ErrRemoteUfragEmpty,
    #[error("remote pwd is empty")]
    ErrRemotePwdEmpty,
    #[error("ice_udp and ice_tcp cannot both be disabled")]
    ErrNoTransportEnabled,
    #[error("min_port/max_port range is empty")]
    ErrInvalidPortRange,
    #[error("buffer is empty")]
    ErrEmptyBuffer,
    #[error("invalid transport for this candidate type")]
    ErrInvalidTransport,

    // ---- NotFound: no stream/component matches the id. ----
    #[error("unknown stream")]
    ErrUnknownStream,
    #[error("unknown component")]
    ErrUnknownComponent,
    #[error("no candidate pairs available")]
    ErrNoCandidatePairs,
    #[error("no such candidate")]
    ErrUnknownCandidate,

    // ---- WouldBlock: no data / no space right now; retryable. ----
    #[error("operation would block")]
    ErrWouldBlock,

    // ---- BrokenPipe: selected pair or stream is gone. ----
    #[error("no selected pair for component")]
    ErrNoSelectedPair,
    #[error("stream was removed")]
    ErrStreamRemoved,
    #[error("remote end closed the pseudo-tcp connection")]
    ErrPseudoTcpClosed,

    // ---- Closed: the endpoint itself is shutting down. ----
    #[error("the agent is closed")]
    ErrClosed,
    #[error("operation canceled")]
    ErrCanceled,

    // ---- AuthenticationFailed: STUN integrity / TURN 401 final. ----
    #[error("STUN message integrity check failed")]
    ErrMessageIntegrityMismatch,
    #[error("STUN username mismatch")]
    ErrMismatchUsername,
    #[error("TURN authentication failed")]
    ErrTurnAuthenticationFailed,

    // ---- StunProtocol: unparseable/unexpected STUN where a reply isn't
    // meaningful. ----
    #[error("not a STUN message")]
    ErrNotStun,
    #[error("incomplete STUN message")]
    ErrIncompleteStun,
    #[error("malformed STUN message")]
    ErrBadStunRequest,
    #[error("unmatched STUN transaction id")]
    ErrUnmatchedResponse,
    #[error("unknown mandatory STUN attribute")]
    ErrUnknownAttribute,

    // ---- SocketIO: lower-layer send/recv failure, not flow control. ----
    #[error("failed to send packet")]
    ErrSendPacket,
    #[error("socket read error")]
    ErrRead,
    #[error("socket write error")]
    ErrWriting,
    #[error("error closing connection")]
    ErrClosingConnection,

    // ---- Agent lifecycle / configuration errors (teacher-style). ----
    #[error("attempted to start agent twice")]
    ErrMultipleStart,
    #[error("ICE Agent can not be restarted when gathering")]
    ErrRestartWhenGathering,
    #[error("attempting to gather candidates during gathering state")]
    ErrMultipleGatherAttempted,
    #[error("no on_candidate handler provided")]
    ErrNoOnCandidateHandler,
    #[error("candidate foundation exceeds 32 ice-chars")]
    ErrFoundationTooLong,
    #[error("relay candidate requires a TURN server reference")]
    ErrRelayWithoutTurnServer,
    #[error("feature requires a socket transport not implemented by this crate: {0}")]
    ErrNotImplemented(&'static str),
    #[error("max_connectivity_checks must be >= 0")]
    ErrInvalidMaxConnectivityChecks,

    // ---- pseudo-TCP specific ----
    #[error("pseudo-tcp send window full")]
    ErrPseudoTcpWouldBlock,
    #[error("pseudo-tcp stream reached end of file")]
    ErrPseudoTcpEof,
    #[error("pseudo-tcp segment shorter than its header")]
    ErrPseudoTcpShortSegment,

    #[error("parse int: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("parse addr: {0}")]
    ParseIp(#[from] net::AddrParseError),
    #[error("{0}")]
    Io(#[source] IoError),
    #[error("{0}")]
    Stun(#[from] stun::Error),
    #[error("{0}")]
    Turn(#[from] turn::Error),
    #[error("{0}")]
    Util(#[from] util::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}

impl Error {
    /// Classifies an error as retryable ("would-block") flow control rather
    /// than a hard failure, per spec.md §7's propagation policy.
    #[must_use]
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::ErrWouldBlock | Error::ErrPseudoTcpWouldBlock)
    }
}
