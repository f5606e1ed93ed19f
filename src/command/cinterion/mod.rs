//! ### Cinterion specific commands
pub mod responses;

use atat::atat_derive::AtatCmd;
use heapless::String;
use responses::*;

use super::{Acknowledged, NoResponse};
use crate::modules::Lock;

/// Switch off MS ^SMSO
///
/// The `^SHUTDOWN` URC follows once the module is ready to be powered
/// down.
#[derive(Clone, AtatCmd)]
#[at_cmd("^SMSO", NoResponse, timeout_ms = 5000)]
pub struct SwitchOff;

/// RTS/CTS flow control \Q3
#[derive(Clone, AtatCmd)]
#[at_cmd("\\Q3", NoResponse, timeout_ms = 3000)]
pub struct SetHardwareFlowControl;

/// Display PIN counter ^SPIC
#[derive(Clone, AtatCmd)]
#[at_cmd("^SPIC", PinCounter, timeout_ms = 3000, parse = parse_pin_counter)]
pub struct GetPinCounter<'a> {
    /// Facility code, e.g. `SC` for the SIM PIN
    #[at_arg(position = 0, len = 2)]
    pub facility: &'a str,
    /// `1` reads the PUK counter instead of the PIN one
    #[at_arg(position = 1)]
    pub puk: Option<u8>,
}

/// Every lock kind with a counter, in the order they are read.
pub const PIN_COUNTERS: [(Lock, GetPinCounter<'static>); 8] = [
    (Lock::SimPin, GetPinCounter { facility: "SC", puk: None }),
    (Lock::SimPuk, GetPinCounter { facility: "SC", puk: Some(1) }),
    (Lock::SimPin2, GetPinCounter { facility: "P2", puk: None }),
    (Lock::SimPuk2, GetPinCounter { facility: "P2", puk: Some(1) }),
    (Lock::PhFsimPin, GetPinCounter { facility: "PS", puk: None }),
    (Lock::PhFsimPuk, GetPinCounter { facility: "PS", puk: Some(1) }),
    (Lock::PhNetPin, GetPinCounter { facility: "PN", puk: None }),
    (Lock::PhNetPuk, GetPinCounter { facility: "PN", puk: Some(1) }),
];

/// Indicator control ^SIND
///
/// Mode 0 disables the `+CIEV` URC of the indicator, 1 enables it, 2 only
/// queries its current value.
#[derive(Clone, AtatCmd)]
#[at_cmd("^SIND", IndicatorState, timeout_ms = 3000, parse = parse_indicator)]
pub struct SetIndicator<'a> {
    #[at_arg(position = 0, len = 16)]
    pub indicator: &'a str,
    #[at_arg(position = 1)]
    pub mode: u8,
}

/// Extended configuration settings ^SCFG=?
#[derive(Clone, AtatCmd)]
#[at_cmd("^SCFG=?", SupportedBands, timeout_ms = 3000, parse = parse_supported_bands)]
pub struct TestConfiguration;

/// Current band selection ^SCFG="Radio/Band"
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "^SCFG=\"Radio/Band\"",
    CurrentBands,
    timeout_ms = 3000,
    parse = parse_current_bands
)]
pub struct GetRadioBand;

/// Band selection ^SCFG="Radio/Band",<rba>,<rbe>
///
/// Used by 3G capable modules. `commit` 1 applies the change immediately.
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "^SCFG=\"Radio/Band\",",
    NoResponse,
    value_sep = false,
    timeout_ms = 15000
)]
pub struct SetRadioBand {
    #[at_arg(position = 0)]
    pub mask: u32,
    #[at_arg(position = 1)]
    pub commit: u8,
}

/// Band selection ^SCFG="Radio/Band","<rbp>","<rba>"
///
/// 2G-only modules take both masks as quoted strings.
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "^SCFG=\"Radio/Band\",",
    NoResponse,
    value_sep = false,
    timeout_ms = 15000
)]
pub struct SetRadioBandQuoted {
    #[at_arg(position = 0)]
    pub preferred: String<10>,
    #[at_arg(position = 1)]
    pub allowed: String<10>,
}

/// GPRS cell environment ^SMONG
#[derive(Clone, AtatCmd)]
#[at_cmd("^SMONG", GprsMonitor, timeout_ms = 3000, parse = parse_gprs_monitor)]
pub struct GetGprsMonitor;

/// WWAN connection support ^SWWAN=?
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "^SWWAN=?",
    Acknowledged,
    timeout_ms = 6000,
    parse = crate::command::acknowledge
)]
pub struct TestWwan;
