//! ### SIMCom network mode commands
use atat::atat_derive::{AtatCmd, AtatResp};

use super::NoResponse;
use crate::modules::AccessTechnology;

/// Preferred mode selection +CNMP
///
/// 2 = automatic, 13 = GSM only, 14 = WCDMA only.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNMP", NoResponse, timeout_ms = 3000)]
pub struct SetModePreference {
    #[at_arg(position = 0)]
    pub mode: u8,
}

/// Network acquisition order +CNAOP
///
/// 0 = automatic, 1 = GSM first, 2 = WCDMA first.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNAOP", NoResponse, timeout_ms = 3000)]
pub struct SetAcquisitionOrder {
    #[at_arg(position = 0)]
    pub order: u8,
}

#[derive(Clone, AtatCmd)]
#[at_cmd("+CNMP?", ModePreference, timeout_ms = 3000)]
pub struct GetModePreference;

#[derive(Clone, AtatCmd)]
#[at_cmd("+CNAOP?", AcquisitionOrder, timeout_ms = 3000)]
pub struct GetAcquisitionOrder;

#[derive(Debug, Clone, AtatResp)]
pub struct ModePreference {
    #[at_arg(position = 0)]
    pub mode: u8,
}

#[derive(Debug, Clone, AtatResp)]
pub struct AcquisitionOrder {
    #[at_arg(position = 0)]
    pub order: u8,
}

/// Network system mode +CNSMOD?
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNSMOD?", NetworkSystemMode, timeout_ms = 3000)]
pub struct GetNetworkSystemMode;

/// `+CNSMOD: <n>,<stat>`
#[derive(Debug, Clone, AtatResp)]
pub struct NetworkSystemMode {
    /// Whether the `+CNSMOD: <stat>` URC is enabled
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: u8,
}

/// Network system mode change URC +CNSMOD=<n>
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNSMOD", NoResponse, timeout_ms = 5000)]
pub struct SetNetworkSystemModeReporting {
    #[at_arg(position = 0)]
    pub enable: u8,
}

/// Automatic signal quality report +AUTOCSQ=<auto>[,<mode>]
///
/// Mode 1 reports on every change instead of every five seconds.
#[derive(Clone, AtatCmd)]
#[at_cmd("+AUTOCSQ", NoResponse, timeout_ms = 5000)]
pub struct SetAutoSignalQuality {
    #[at_arg(position = 0)]
    pub auto: u8,
    #[at_arg(position = 1)]
    pub mode: Option<u8>,
}

/// Access technology of a `+CNSMOD` `<stat>` value.
pub fn access_technology_from_cnsmod(stat: u8) -> AccessTechnology {
    match stat {
        1 => AccessTechnology::GSM,
        2 => AccessTechnology::GPRS,
        3 => AccessTechnology::EDGE,
        4 => AccessTechnology::UMTS,
        5 => AccessTechnology::HSDPA,
        6 => AccessTechnology::HSUPA,
        7 => AccessTechnology::HSPA,
        _ => AccessTechnology::UNKNOWN,
    }
}
