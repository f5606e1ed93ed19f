//! ### 3GPP TS 27.007 commands shared by the vendors
pub mod responses;

use atat::atat_derive::AtatCmd;
use heapless::String;
use responses::*;

use super::NoResponse;

/// Operator codes are MCC+MNC, at most 6 digits.
pub type OperatorId = String<8>;

/// Set module functionality +CFUN
///
/// Selects the level of functionality <fun> in the MT.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CFUN", NoResponse, timeout_ms = 180000)]
pub struct SetModuleFunctionality {
    #[at_arg(position = 0)]
    pub fun: u8,
}

/// Supported functionality levels +CFUN=?
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "+CFUN=?",
    FunctionalitySupport,
    timeout_ms = 3000,
    parse = parse_functionality_support
)]
pub struct TestModuleFunctionality;

/// Automatic operator selection +COPS=0
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS=0", NoResponse, timeout_ms = 120000)]
pub struct SetAutomaticOperatorSelection;

/// Manual operator selection +COPS=1,2,"<oper>"
///
/// The operator is given in numeric format.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS=1,2,", NoResponse, value_sep = false, timeout_ms = 120000)]
pub struct SetManualOperatorSelection {
    #[at_arg(position = 0)]
    pub oper: OperatorId,
}

/// Access technology change +COPS=,,,<AcT>
///
/// Only changes the radio access technology of the current selection.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS=,,,", NoResponse, value_sep = false, timeout_ms = 20000)]
pub struct SetOperatorAccessTechnology {
    #[at_arg(position = 0)]
    pub act: u8,
}

/// New message indication settings supported +CNMI=?
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "+CNMI=?",
    NewMessageIndicationSupport,
    timeout_ms = 3000,
    parse = parse_new_message_indication_support
)]
pub struct TestNewMessageIndication;

/// New message indication +CNMI
///
/// Selects the procedure for the indication of new messages received from
/// the network.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNMI", NoResponse, timeout_ms = 3000)]
pub struct SetNewMessageIndication {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub mt: u8,
    #[at_arg(position = 2)]
    pub bm: u8,
    #[at_arg(position = 3)]
    pub ds: u8,
    #[at_arg(position = 4)]
    pub bfr: Option<u8>,
}

/// PDP context activate or deactivate +CGACT
///
/// Without a <cid> the state applies to every defined context.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGACT", NoResponse, timeout_ms = 10000)]
pub struct SetPdpContextState {
    #[at_arg(position = 0)]
    pub state: u8,
    #[at_arg(position = 1)]
    pub cid: Option<u32>,
}

/// Enter data state +CGDATA
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDATA", NoResponse, timeout_ms = 10000)]
pub struct EnterDataState<'a> {
    /// Layer 2 protocol, e.g. `M-RAW_IP`
    #[at_arg(position = 0, len = 16)]
    pub l2p: &'a str,
    #[at_arg(position = 1)]
    pub cid: u32,
}

/// Printing IP address format +CGPIAF
///
/// Colon notation, CIDR prefix, leading zeros omitted, zero compression.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGPIAF=1,1,0,1", NoResponse, timeout_ms = 3000)]
pub struct SetIpv6AddressFormat;

/// PDP context read dynamic parameters +CGCONTRDP
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "+CGCONTRDP",
    PdpContextDynamicParameters,
    timeout_ms = 10000,
    parse = parse_pdp_context_dynamic_parameters
)]
pub struct GetPdpContextDynamicParameters {
    #[at_arg(position = 0)]
    pub cid: u32,
}
