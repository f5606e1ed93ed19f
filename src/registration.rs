impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::NotRegistering,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::OutOfCoverage,
            5 => Self::Roaming,
            // SMS only and CSFB not preferred
            6 | 9 => Self::Home,
            7 | 10 => Self::Roaming,
            // 8 is attached for emergency bearer services only
            _ => Self::None,
        }
    }
}

/// 3GPP registration state as reported by `+CREG`/`+CGREG`/`+CEREG`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Emergency only, or anything outside the standard range
    #[default]
    None,
    /// Idle, not searching
    NotRegistering,
    Home,
    Searching,
    Denied,
    /// Reported as "unknown" by the modem
    OutOfCoverage,
    Roaming,
}

/// CDMA1x or EV-DO registration state.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CdmaRegistrationState {
    #[default]
    Unknown,
    Registered,
    Home,
    Roaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationDomain {
    ThreeGpp,
    Cdma,
}

impl RegistrationDomain {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeGpp => "3GPP",
            Self::Cdma => "CDMA",
        }
    }
}

/// Why a bearer may not stay connected in a given domain.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionForbiddenReason {
    #[default]
    None,
    Unregistered,
    Roaming,
}

impl ConnectionForbiddenReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Unregistered => "unregistered",
            Self::Roaming => "roaming",
        }
    }
}

/// What the owner of a bearer has to do after a registration update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ForbiddenAction {
    /// Connection allowed, pending deferred disconnects must be cancelled
    Allow,
    /// Cancel pending deferred disconnects and disconnect right away
    DisconnectNow,
    /// Disconnect, deferred if the bearer is currently connected
    Unregistered(RegistrationDomain),
}

/// Tracks the forbidden reason of each registration domain.
///
/// With `mixed` set (a modem with both 3GPP and CDMA stacks), a forbidden
/// reason in one domain is ignored while the other domain has none.
#[derive(Debug, Clone)]
pub struct RegistrationTracker {
    allow_roaming: bool,
    mixed: bool,
    reason_3gpp: ConnectionForbiddenReason,
    reason_cdma: ConnectionForbiddenReason,
}

impl RegistrationTracker {
    pub const fn new(allow_roaming: bool, mixed: bool) -> Self {
        Self {
            allow_roaming,
            mixed,
            reason_3gpp: ConnectionForbiddenReason::None,
            reason_cdma: ConnectionForbiddenReason::None,
        }
    }

    pub fn reason(&self, domain: RegistrationDomain) -> ConnectionForbiddenReason {
        match domain {
            RegistrationDomain::ThreeGpp => self.reason_3gpp,
            RegistrationDomain::Cdma => self.reason_cdma,
        }
    }

    pub fn update_3gpp(&mut self, status: Status) -> ForbiddenAction {
        self.reason_3gpp = match status {
            Status::NotRegistering | Status::Denied | Status::OutOfCoverage | Status::None => {
                ConnectionForbiddenReason::Unregistered
            }
            Status::Home | Status::Searching => ConnectionForbiddenReason::None,
            Status::Roaming if self.allow_roaming => ConnectionForbiddenReason::None,
            Status::Roaming => ConnectionForbiddenReason::Roaming,
        };
        self.decide(RegistrationDomain::ThreeGpp)
    }

    pub fn update_cdma(
        &mut self,
        cdma1x: CdmaRegistrationState,
        evdo: CdmaRegistrationState,
    ) -> ForbiddenAction {
        use CdmaRegistrationState::*;

        self.reason_cdma = if cdma1x == Roaming || evdo == Roaming {
            if self.allow_roaming {
                ConnectionForbiddenReason::None
            } else {
                ConnectionForbiddenReason::Roaming
            }
        } else if cdma1x != Unknown || evdo != Unknown {
            ConnectionForbiddenReason::None
        } else {
            ConnectionForbiddenReason::Unregistered
        };
        self.decide(RegistrationDomain::Cdma)
    }

    fn decide(&self, domain: RegistrationDomain) -> ForbiddenAction {
        let (own, other) = match domain {
            RegistrationDomain::ThreeGpp => (self.reason_3gpp, self.reason_cdma),
            RegistrationDomain::Cdma => (self.reason_cdma, self.reason_3gpp),
        };

        if own == ConnectionForbiddenReason::None
            || (self.mixed && other == ConnectionForbiddenReason::None)
        {
            return ForbiddenAction::Allow;
        }

        match own {
            ConnectionForbiddenReason::Roaming => {
                debug!(
                    "Bearer not allowed to connect, registered in roaming {} network",
                    domain.as_str()
                );
                ForbiddenAction::DisconnectNow
            }
            _ => ForbiddenAction::Unregistered(domain),
        }
    }
}
