//! ### Fibocom commands
use atat::atat_derive::AtatCmd;

use super::{Acknowledged, NoResponse};

/// RNDIS/ECM network interface support +GTRNDIS=?
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "+GTRNDIS=?",
    Acknowledged,
    timeout_ms = 6000,
    parse = crate::command::acknowledge
)]
pub struct TestRndis;

/// Reset the MT through +CFUN=15
#[derive(Clone, AtatCmd)]
#[at_cmd("+CFUN=15", NoResponse, timeout_ms = 3000)]
pub struct ResetModule;
