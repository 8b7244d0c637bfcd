use std::fmt;

/// Selects the STUN flavour, priority formula, authentication format and TURN
/// dialect an [`Agent`](crate::agent::Agent) uses.
///
/// Grounded in libnice's `NiceCompatibility` (`agent-priv.h`); the check
/// engine and gathering logic only branch on this where spec.md §4.2 and
/// §4.3 explicitly call it out (see Design Notes, "compatibility carve-out
/// confinement rule") — everything else lives in the STUN codec and socket
/// adapters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Compatibility {
    /// RFC 5245/8445 full ICE, RFC 5389 STUN.
    Rfc5245,
    /// Google's libjingle dialect: RFC 3489 fallback, no foundation sharing
    /// with Relayed candidates.
    Google,
    /// MSN Messenger dialect.
    Msn,
    /// Windows Live Messenger 2009 dialect.
    Wlm2009,
    /// Microsoft Office Communicator 2007.
    Oc2007,
    /// Microsoft Office Communicator 2007 R2.
    Oc2007R2,
}

impl Default for Compatibility {
    fn default() -> Self {
        Self::Rfc5245
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rfc5245 => "rfc5245",
            Self::Google => "google",
            Self::Msn => "msn",
            Self::Wlm2009 => "wlm2009",
            Self::Oc2007 => "oc2007",
            Self::Oc2007R2 => "oc2007r2",
        };
        write!(f, "{s}")
    }
}

impl Compatibility {
    /// MS-TURN variants keep a 4-byte magic cookie ahead of the STUN header
    /// on TCP-framed TURN control traffic (spec.md §4.9).
    #[must_use]
    pub fn ms_turn_framing(self) -> bool {
        matches!(self, Self::Oc2007 | Self::Oc2007R2 | Self::Msn | Self::Wlm2009)
    }

    /// Whether RFC 3489 (no magic cookie) STUN framing is used instead of
    /// RFC 5389.
    #[must_use]
    pub fn legacy_stun(self) -> bool {
        matches!(self, Self::Google | Self::Msn)
    }

    /// Whether Relayed candidates never share a foundation with anything
    /// else (spec.md §4.2 foundation rule carve-out).
    #[must_use]
    pub fn relayed_never_shares_foundation(self) -> bool {
        matches!(self, Self::Google)
    }

    /// Whether TCP-framed TURN (TURN-over-TCP) is usable at all for this
    /// compatibility mode (spec.md §4.2 step 2: "TCP TURN-over-TCP only for
    /// OC2007 variants").
    #[must_use]
    pub fn allows_turn_over_tcp(self) -> bool {
        matches!(self, Self::Oc2007 | Self::Oc2007R2)
    }

    /// Packetized pseudo-TCP reads are forced under this compatibility mode
    /// (spec.md §4.8).
    #[must_use]
    pub fn forces_packetized_pseudotcp(self) -> bool {
        matches!(self, Self::Msn | Self::Wlm2009)
    }
}
