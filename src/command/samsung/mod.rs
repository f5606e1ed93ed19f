//! ### Samsung proprietary PDP and band commands
pub mod responses;

use atat::atat_derive::AtatCmd;
use responses::*;

use super::NoResponse;

/// Configure PDP context %IPDPCFG
///
/// `%IPDPCFG=<cid>,0,<auth>,"<user>","<password>"`
#[derive(Clone, AtatCmd)]
#[at_cmd("%IPDPCFG", NoResponse, timeout_ms = 60000)]
pub struct ConfigurePdpContext<'a> {
    #[at_arg(position = 0)]
    pub cid: u32,
    #[at_arg(position = 1)]
    pub mode: u8,
    #[at_arg(position = 2)]
    pub auth: u8,
    #[at_arg(position = 3, len = 32)]
    pub user: &'a str,
    #[at_arg(position = 4, len = 32)]
    pub password: &'a str,
}

impl<'a> ConfigurePdpContext<'a> {
    /// Authentication is enabled only when a user name is given.
    pub fn new(cid: u32, user: &'a str, password: &'a str) -> Self {
        Self {
            cid,
            mode: 0,
            auth: u8::from(!user.is_empty()),
            user,
            password,
        }
    }
}

/// Activate or deactivate PDP context %IPDPACT
///
/// The final state is reported through the `%IPDPACT: <cid>,<status>`
/// unsolicited line, which may arrive before the `OK`.
#[derive(Clone, AtatCmd)]
#[at_cmd("%IPDPACT", NoResponse, timeout_ms = 60000)]
pub struct SetPdpActivation {
    #[at_arg(position = 0)]
    pub cid: u32,
    #[at_arg(position = 1)]
    pub state: u8,
}

/// Extended error report %IER
#[derive(Clone, AtatCmd)]
#[at_cmd("%IER?", ExtendedError, timeout_ms = 3000, parse = parse_extended_error)]
pub struct GetExtendedError;

/// Enabled band mask %IPBM
#[derive(Clone, AtatCmd)]
#[at_cmd("%IPBM?", EnabledBands, timeout_ms = 3000, parse = parse_band_mode)]
pub struct GetBandMode;
