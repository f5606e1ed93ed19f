//! ### Intel XMM data path commands
use atat::atat_derive::{AtatCmd, AtatEnum};

use super::NoResponse;

/// Address family of a DNS server request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DnsFamily {
    Ipv4 = 1,
    Ipv6 = 2,
}

/// Dynamic DNS request +XDNS
#[derive(Clone, AtatCmd)]
#[at_cmd("+XDNS", NoResponse, timeout_ms = 3000)]
pub struct RequestDynamicDns {
    #[at_arg(position = 0)]
    pub cid: u32,
    #[at_arg(position = 1)]
    pub family: DnsFamily,
}

/// Data channel mapping +XDATACHANNEL
///
/// Routes the context's traffic to the first IP session of the PCIe IOSM
/// interface.
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "+xdatachannel=1,1,\"/PCIE/IOSM/CTRL/1\",\"/PCIE/IOSM/IPS/0\",2,",
    NoResponse,
    value_sep = false,
    timeout_ms = 10000
)]
pub struct SetDataChannel {
    #[at_arg(position = 0)]
    pub cid: u32,
}
