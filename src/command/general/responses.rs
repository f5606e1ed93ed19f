//! Responses for the shared 3GPP commands
use atat::nom::sequence::preceded;
use heapless::{String, Vec};

use crate::command::parser::{fields, finish, group, groups, lines, range_list, tagged, text};

/// Functionality levels listed by `+CFUN=?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionalitySupport(pub Vec<u32, 16>);

impl atat::AtatResp for FunctionalitySupport {}

pub fn parse_functionality_support(resp: &[u8]) -> Result<FunctionalitySupport, atat::Error> {
    let first = finish(preceded(tagged("+CFUN:"), group)(resp))?;
    finish(range_list(first)).map(FunctionalitySupport)
}

/// Values accepted by `+CNMI`, field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMessageIndicationSupport {
    pub mode: Vec<u32, 16>,
    pub mt: Vec<u32, 16>,
    pub bm: Vec<u32, 16>,
    pub ds: Vec<u32, 16>,
    /// Absent in some firmwares
    pub bfr: Vec<u32, 16>,
}

impl atat::AtatResp for NewMessageIndicationSupport {}

/// `+CNMI: (0,1,2),(0,1),(0,2),(0),(1)`
pub fn parse_new_message_indication_support(
    resp: &[u8],
) -> Result<NewMessageIndicationSupport, atat::Error> {
    let groups = finish(preceded(tagged("+CNMI:"), groups::<5>)(resp))?;
    if groups.len() < 4 {
        return Err(atat::Error::Parse);
    }

    let list = |g: &[u8]| finish(range_list(g));
    Ok(NewMessageIndicationSupport {
        mode: list(groups[0])?,
        mt: list(groups[1])?,
        bm: list(groups[2])?,
        ds: list(groups[3])?,
        bfr: match groups.get(4) {
            Some(bfr) => list(*bfr)?,
            None => Vec::new(),
        },
    })
}

pub type IpAddress = String<46>;

/// Static IP settings of an active context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpConfig {
    pub address: IpAddress,
    pub prefix: u8,
    pub gateway: Option<IpAddress>,
    pub dns: Vec<IpAddress, 2>,
}

/// Every address family the context reported, in the order the modem
/// listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdpContextDynamicParameters(pub Vec<IpConfig, 2>);

impl atat::AtatResp for PdpContextDynamicParameters {}

fn address(value: &str) -> Result<IpAddress, atat::Error> {
    IpAddress::try_from(value).map_err(|_| atat::Error::Parse)
}

fn octet(value: &str) -> Result<u8, atat::Error> {
    value.parse().map_err(|_| atat::Error::Parse)
}

/// Split the `<local_addr and subnet_mask>` field.
///
/// IPv4 comes as eight dotted octets (address then mask); IPv6 in the
/// `+CGPIAF=1,1,...` format comes as `addr/prefix`.
fn split_local_address(field: &str) -> Result<(IpAddress, u8), atat::Error> {
    if let Some((addr, prefix)) = field.split_once('/') {
        let prefix: u32 = prefix.parse().map_err(|_| atat::Error::Parse)?;
        return Ok((address(addr)?, prefix.min(128) as u8));
    }

    if field.contains(':') {
        return Ok((address(field)?, 0));
    }

    let octets: Vec<&str, 8> = field.split('.').take(8).collect();
    match octets.len() {
        4 => Ok((address(field)?, 0)),
        8 => {
            let mut addr = IpAddress::new();
            for (i, value) in octets[..4].iter().enumerate() {
                if i > 0 {
                    addr.push('.').map_err(|_| atat::Error::Parse)?;
                }
                addr.push_str(value).map_err(|_| atat::Error::Parse)?;
            }
            let mut prefix = 0;
            for value in &octets[4..] {
                prefix += octet(value)?.count_ones() as u8;
            }
            Ok((addr, prefix))
        }
        _ => Err(atat::Error::Parse),
    }
}

/// `+CGCONTRDP: <cid>,<bearer_id>,<apn>,<local_addr and subnet_mask>,
/// <gw_addr>,<DNS_prim_addr>,<DNS_sec_addr>`, one line per address family.
pub fn parse_pdp_context_dynamic_parameters(
    resp: &[u8],
) -> Result<PdpContextDynamicParameters, atat::Error> {
    let mut out = Vec::new();
    for line in lines(resp) {
        let args = finish(preceded(tagged("+CGCONTRDP:"), fields::<8>)(line))?;
        let mut args = args.iter().skip(3);
        let local = args.next().ok_or(atat::Error::Parse)?;
        let (address, prefix) = split_local_address(text(local)?)?;

        let mut config = IpConfig {
            address,
            prefix,
            ..IpConfig::default()
        };
        if let Some(gw) = args.next().filter(|gw| !gw.is_empty()) {
            config.gateway = Some(self::address(text(gw)?)?);
        }
        for dns in args.take(2).filter(|dns| !dns.is_empty()) {
            config
                .dns
                .push(self::address(text(dns)?)?)
                .map_err(|_| atat::Error::Parse)?;
        }
        out.push(config).map_err(|_| atat::Error::Parse)?;
    }

    if out.is_empty() {
        return Err(atat::Error::Parse);
    }
    Ok(PdpContextDynamicParameters(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfun_levels() {
        let levels = parse_functionality_support(b"+CFUN: (0,1,4,7),(0-1)").unwrap();
        assert_eq!(levels.0.as_slice(), &[0, 1, 4, 7]);
        let levels = parse_functionality_support(b"+CFUN: (0-1)").unwrap();
        assert_eq!(levels.0.as_slice(), &[0, 1]);
        assert!(parse_functionality_support(b"+CFUN: 1").is_err());
    }

    #[test]
    fn cnmi_support_without_bfr() {
        let support =
            parse_new_message_indication_support(b"+CNMI: (0,1,2),(0,1),(0,2),(0)").unwrap();
        assert_eq!(support.mode.as_slice(), &[0, 1, 2]);
        assert_eq!(support.ds.as_slice(), &[0]);
        assert!(support.bfr.is_empty());
        assert!(parse_new_message_indication_support(b"+CNMI: (0),(1)").is_err());
    }

    #[test]
    fn ipv4_dynamic_parameters() {
        let configs = parse_pdp_context_dynamic_parameters(
            b"+CGCONTRDP: 1,5,\"internet\",\"10.0.0.2.255.255.255.0\",\"10.0.0.1\",\"8.8.8.8\",\"8.8.4.4\"",
        )
        .unwrap()
        .0;
        assert_eq!(configs.len(), 1);
        let v4 = &configs[0];
        assert_eq!(v4.address, "10.0.0.2");
        assert_eq!(v4.prefix, 24);
        assert_eq!(v4.gateway.as_deref(), Some("10.0.0.1"));
        assert_eq!(v4.dns.len(), 2);
    }

    #[test]
    fn dual_stack_dynamic_parameters() {
        let configs = parse_pdp_context_dynamic_parameters(
            b"+CGCONTRDP: 1,5,\"ims\",\"10.0.0.2\",\"\",\"1.1.1.1\"\r\n\
              +CGCONTRDP: 1,5,\"ims\",\"2001:db8::1/64\",\"\",\"2001:db8::53\"",
        )
        .unwrap()
        .0;
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].prefix, 0);
        assert_eq!(configs[0].gateway, None);
        assert_eq!(configs[1].address, "2001:db8::1");
        assert_eq!(configs[1].prefix, 64);
        assert_eq!(configs[1].dns.len(), 1);
    }
}
