//! Unsolicited result codes consumed by the vendor plugins.

use atat::atat_derive::{AtatResp, AtatUrc};
use atat::digest::parser::urc_helper;
use atat::nom::{branch, combinator::verify, sequence::preceded};
use heapless::String;

use super::parser::{fields, finish, number, tagged, text};
use crate::registration::Status;

/// `<stat>[,<lac>,<ci>[,<AcT>]]` of `+CREG`, `+CGREG` and `+CEREG`
#[derive(Debug, Clone, AtatResp)]
pub struct NetworkRegistration {
    #[at_arg(position = 0)]
    pub stat: u8,
    #[at_arg(position = 1)]
    pub lac: Option<String<8>>,
    #[at_arg(position = 2)]
    pub ci: Option<String<16>>,
    #[at_arg(position = 3)]
    pub act: Option<u8>,
}

/// SIMCom `+CNSMOD: <stat>`
#[derive(Debug, Clone, AtatResp)]
pub struct NetworkSystemModeChange {
    #[at_arg(position = 0)]
    pub stat: u8,
}

/// Samsung `%IPDPACT` context state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdpActivationStatus {
    Deactivated,
    Activated,
    Activating,
    ActivationFailed,
    Unknown(u32),
}

impl From<u32> for PdpActivationStatus {
    fn from(v: u32) -> Self {
        match v {
            0 => Self::Deactivated,
            1 => Self::Activated,
            2 => Self::Activating,
            3 => Self::ActivationFailed,
            v => Self::Unknown(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// +CREG: <stat>[,...]
    NetworkRegistration(Status),
    /// +CGREG: <stat>[,...]
    GprsNetworkRegistration(Status),
    /// +CEREG: <stat>[,...]
    EpsNetworkRegistration(Status),
    /// %IPDPACT: <cid>,<status>[,<x>]
    PdpActivation {
        cid: u32,
        status: PdpActivationStatus,
    },
    /// ^SHUTDOWN
    Shutdown,
    /// +CIEV: <indicator>,<value>
    IndicatorEvent {
        indicator: String<16>,
        value: u32,
    },
    /// +CNSMOD: <stat>
    NetworkSystemMode(u8),
}

#[derive(Debug, Clone, AtatUrc)]
enum UrcInner {
    #[at_urc("+CREG")]
    NetworkRegistration(NetworkRegistration),
    #[at_urc("+CGREG")]
    GprsNetworkRegistration(NetworkRegistration),
    #[at_urc("+CEREG")]
    EpsNetworkRegistration(NetworkRegistration),
    #[at_urc("+CNSMOD")]
    NetworkSystemMode(NetworkSystemModeChange),
    #[at_urc("^SHUTDOWN")]
    Shutdown,
}

impl From<UrcInner> for Urc {
    fn from(value: UrcInner) -> Self {
        match value {
            UrcInner::NetworkRegistration(r) => Urc::NetworkRegistration(r.stat.into()),
            UrcInner::GprsNetworkRegistration(r) => Urc::GprsNetworkRegistration(r.stat.into()),
            UrcInner::EpsNetworkRegistration(r) => Urc::EpsNetworkRegistration(r.stat.into()),
            UrcInner::NetworkSystemMode(m) => Urc::NetworkSystemMode(m.stat),
            UrcInner::Shutdown => Urc::Shutdown,
        }
    }
}

/// `%IPDPACT: <cid>,<status>[,<x>]`, the third field is optional.
fn parse_pdp_activation(resp: &[u8]) -> Option<Urc> {
    let args = finish(preceded(tagged("%IPDPACT:"), fields::<3>)(resp)).ok()?;
    let cid = finish(number(args.first()?)).ok()?;
    let status = finish(number(args.get(1)?)).ok()?;
    Some(Urc::PdpActivation {
        cid,
        status: status.into(),
    })
}

fn parse_indicator_event(resp: &[u8]) -> Option<Urc> {
    let args = finish(preceded(tagged("+CIEV:"), fields::<2>)(resp)).ok()?;
    let indicator = String::try_from(text(args.first()?).ok()?).ok()?;
    let value = finish(number(args.get(1)?)).ok()?;
    Some(Urc::IndicatorEvent { indicator, value })
}

impl atat::AtatUrc for Urc {
    type Response = Urc;

    fn parse(resp: &[u8]) -> Option<Self::Response> {
        if let Some(urc) = parse_pdp_activation(resp) {
            Some(urc)
        } else if let Some(urc) = parse_indicator_event(resp) {
            Some(urc)
        } else {
            <UrcInner as atat::AtatUrc>::parse(resp).map(Urc::from)
        }
    }
}

impl atat::Parser for Urc {
    fn parse(buf: &[u8]) -> Result<(&[u8], usize), atat::digest::ParseError> {
        let (_, r) = branch::alt((
            urc_helper("+CREG"),
            urc_helper("+CGREG"),
            urc_helper("+CEREG"),
            // The `+CNSMOD?` reply carries two values, the URC only one
            verify(urc_helper("+CNSMOD"), |(line, _): &(&[u8], usize)| {
                !line.contains(&b',')
            }),
            urc_helper("%IPDPACT"),
            urc_helper("+CIEV"),
            urc_helper("^SHUTDOWN"),
        ))(buf)?;
        Ok(r)
    }
}
