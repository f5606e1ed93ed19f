use core::fmt;

use heapless::{String, Vec};

use crate::modules::{Band, ModeCombination};
use crate::registration::{ConnectionForbiddenReason, RegistrationDomain};

/// Raw text of an explicit modem error reply, kept for diagnostics.
pub type ErrorText = String<64>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MobileEquipmentError {
    /// PDP activation failed with cause 27 or 33
    MissingOrUnknownApn,
    CallSetupFailed,
    SimNotReady,
}

impl MobileEquipmentError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingOrUnknownApn => "Missing or unknown APN",
            Self::CallSetupFailed => "Call setup failed",
            Self::SimNotReady => "SIM not ready",
        }
    }
}

/// Kernel interface or driver name, as reported by the port layer.
pub type PortName = String<16>;

/// Failure to map a network interface onto its control port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    NoSioPort(PortName),
    NoQmiPort(PortName),
    UnsupportedDriver { port: PortName, driver: PortName },
}

/// A request that the vendor command set cannot express.
#[derive(Debug, PartialEq, Clone)]
pub enum Unsupported {
    ModeCombination(ModeCombination),
    BandCombination(Vec<Band, 16>),
    SmsSetting {
        field: &'static str,
        preference: &'static [u8],
    },
    Operation(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The command channel itself failed.
    Transport(atat::Error),
    /// A single command did not get a reply in time.
    Timeout,
    /// The modem answered a well-formed command with an error.
    Rejected(ErrorText),
    MobileEquipment(MobileEquipmentError),
    Unsupported(Unsupported),
    /// An upper-bound gate or retry loop expired.
    OperationTimeout(&'static str),
    Cancelled,
    InProgress(&'static str),
    /// An operation could not be completed with what the modem reported.
    Failed(&'static str),
    Forbidden(RegistrationDomain, ConnectionForbiddenReason),
    Parse(&'static str),
    Overflow,
    SubscriberOverflow(embassy_sync::pubsub::Error),
    Port(PortError),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn rejected(reply: &str) -> Self {
        let mut text = ErrorText::new();
        for c in reply.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        Self::Rejected(text)
    }

    /// Errors a soft step is allowed to swallow.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::Rejected(_))
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Self::Timeout,
            atat::Error::Error => Self::rejected("ERROR"),
            atat::Error::Parse => Self::Parse("Couldn't parse modem reply"),
            e => Self::Transport(e),
        }
    }
}

impl From<embassy_sync::pubsub::Error> for Error {
    fn from(e: embassy_sync::pubsub::Error) -> Self {
        Self::SubscriberOverflow(e)
    }
}

impl From<atat::urc_channel::Error> for Error {
    fn from(e: atat::urc_channel::Error) -> Self {
        match e {
            atat::urc_channel::Error::MaximumSubscribersReached => {
                embassy_sync::pubsub::Error::MaximumSubscribersReached.into()
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Command channel failure: {:?}", e),
            Self::Timeout => f.write_str("Command timed out"),
            Self::Rejected(reply) => write!(f, "Modem rejected command: '{}'", reply),
            Self::MobileEquipment(e) => f.write_str(e.message()),
            Self::Unsupported(Unsupported::ModeCombination(mode)) => write!(
                f,
                "Requested mode (allowed: '{}', preferred: '{}') not supported by the modem.",
                mode.allowed, mode.preferred
            ),
            Self::Unsupported(Unsupported::BandCombination(bands)) => {
                f.write_str("The given band combination is not supported: '")?;
                for (i, band) in bands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", band)?;
                }
                f.write_str("'")
            }
            Self::Unsupported(Unsupported::SmsSetting { field, preference }) => {
                write!(f, "SMS settings don't accept {:?} <{}>", preference, field)
            }
            Self::Unsupported(Unsupported::Operation(msg)) => f.write_str(msg),
            Self::OperationTimeout(msg) => f.write_str(msg),
            Self::Cancelled => f.write_str("Operation cancelled"),
            Self::InProgress(msg) => f.write_str(msg),
            Self::Failed(msg) => f.write_str(msg),
            Self::Forbidden(domain, reason) => write!(
                f,
                "Not allowed to connect bearer in {} network: '{}'",
                domain.as_str(),
                reason.as_str()
            ),
            Self::Parse(msg) => f.write_str(msg),
            Self::Overflow => f.write_str("Command or response exceeds buffer capacity"),
            Self::SubscriberOverflow(_) => f.write_str("No free unsolicited message subscriber"),
            Self::Port(PortError::NoSioPort(port)) => {
                write!(f, "Couldn't find SIO port number for 'net/{}'", port)
            }
            Self::Port(PortError::NoQmiPort(port)) => {
                write!(f, "Couldn't find any QMI port for 'net/{}'", port)
            }
            Self::Port(PortError::UnsupportedDriver { port, driver }) => write!(
                f,
                "Unsupported QMI kernel driver for 'net/{}': {}",
                port, driver
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Transport(e) => defmt::write!(f, "Transport({:?})", e),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Rejected(reply) => defmt::write!(f, "Rejected({})", reply.as_str()),
            Self::MobileEquipment(e) => defmt::write!(f, "MobileEquipment({:?})", e),
            Self::Unsupported(_) => defmt::write!(f, "Unsupported"),
            Self::OperationTimeout(msg) => defmt::write!(f, "OperationTimeout({})", msg),
            Self::Cancelled => defmt::write!(f, "Cancelled"),
            Self::InProgress(msg) => defmt::write!(f, "InProgress({})", msg),
            Self::Failed(msg) => defmt::write!(f, "Failed({})", msg),
            Self::Forbidden(domain, reason) => {
                defmt::write!(f, "Forbidden({:?}, {:?})", domain, reason)
            }
            Self::Parse(msg) => defmt::write!(f, "Parse({})", msg),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::SubscriberOverflow(_) => defmt::write!(f, "SubscriberOverflow"),
            Self::Port(_) => defmt::write!(f, "Port"),
        }
    }
}
