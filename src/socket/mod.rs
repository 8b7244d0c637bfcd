#[cfg(test)]
mod socket_test;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Tagged-enum replacement for the virtual-dispatch `Conn` hierarchy a naive
/// port would reach for. Every transport this crate's check engine and
/// framing layer can drive is one variant; adding a transport means adding a
/// variant and a match arm, not a new trait implementor, so the compiler
/// enumerates every call site that needs updating.
///
/// Only [`Socket::UdpBsd`] and the TURN relay wrappers are backed by a real
/// transport in this crate: the others are structurally present (so
/// `Candidate`/`CandidatePair` plumbing doesn't need to special-case them)
/// but their `connect`/`send_to` paths return [`Error::ErrNotImplemented`].
/// They are documented seams for an embedder to complete, not partially
/// built features.
pub enum Socket {
    /// A plain, unconnected UDP socket (`tokio::net::UdpSocket`).
    UdpBsd(tokio::net::UdpSocket),
    /// An active (connecting) TCP candidate socket.
    TcpActive,
    /// A passive (listening) TCP candidate socket.
    TcpPassive,
    /// A UDP datagram channel relayed through a TURN allocation.
    UdpTurn(Arc<dyn util::Conn + Send + Sync>),
    /// TURN control/data multiplexed over a TCP connection to the relay
    /// (spec.md §4.9; only reachable when
    /// [`crate::compatibility::Compatibility::allows_turn_over_tcp`]).
    TurnOverTcp(Arc<dyn util::Conn + Send + Sync>),
    /// Pseudo-SSL-framed TCP, an OC2007 compatibility transport.
    PseudoSsl(Arc<dyn util::Conn + Send + Sync>),
    /// SOCKS5-proxied transport.
    Socks5(Arc<dyn util::Conn + Send + Sync>),
    /// HTTP CONNECT-proxied transport.
    Http(Arc<dyn util::Conn + Send + Sync>),
}

impl Socket {
    pub async fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize> {
        match self {
            Self::UdpBsd(sock) => Ok(sock.send_to(buf, target).await?),
            Self::UdpTurn(conn) | Self::TurnOverTcp(conn) => {
                Ok(conn.send_to(buf, target).await.map_err(Error::from)?)
            }
            Self::TcpActive => Err(Error::ErrNotImplemented("Socket::TcpActive")),
            Self::TcpPassive => Err(Error::ErrNotImplemented("Socket::TcpPassive")),
            Self::PseudoSsl(_) => Err(Error::ErrNotImplemented("Socket::PseudoSsl")),
            Self::Socks5(_) => Err(Error::ErrNotImplemented("Socket::Socks5")),
            Self::Http(_) => Err(Error::ErrNotImplemented("Socket::Http")),
        }
    }

    pub async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        match self {
            Self::UdpBsd(sock) => Ok(sock.recv_from(buf).await?),
            Self::UdpTurn(conn) | Self::TurnOverTcp(conn) => {
                Ok(conn.recv_from(buf).await.map_err(Error::from)?)
            }
            Self::TcpActive => Err(Error::ErrNotImplemented("Socket::TcpActive")),
            Self::TcpPassive => Err(Error::ErrNotImplemented("Socket::TcpPassive")),
            Self::PseudoSsl(_) => Err(Error::ErrNotImplemented("Socket::PseudoSsl")),
            Self::Socks5(_) => Err(Error::ErrNotImplemented("Socket::Socks5")),
            Self::Http(_) => Err(Error::ErrNotImplemented("Socket::Http")),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        match self {
            Self::UdpBsd(sock) => Ok(sock.local_addr()?),
            Self::UdpTurn(conn) | Self::TurnOverTcp(conn) => {
                Ok(conn.local_addr().map_err(Error::from)?)
            }
            _ => Err(Error::ErrNotImplemented("Socket::local_addr")),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UdpBsd(_) => "udp",
            Self::TcpActive => "tcp-active",
            Self::TcpPassive => "tcp-passive",
            Self::UdpTurn(_) => "udp-turn",
            Self::TurnOverTcp(_) => "turn-over-tcp",
            Self::PseudoSsl(_) => "pseudo-ssl",
            Self::Socks5(_) => "socks5",
            Self::Http(_) => "http",
        }
    }
}
