//! Intel XMM LTE bearer: a raw IP data channel on the PCIe IOSM interface,
//! with static IP settings read back through `+CGCONTRDP`.

use crate::asynch::channel::CommandChannel;
use crate::asynch::operation::{CancellationToken, Sequencer, Step};
use crate::bearer::BearerBackend;
use crate::command::general::responses::IpConfig;
use crate::command::general::{
    EnterDataState, GetPdpContextDynamicParameters, SetIpv6AddressFormat, SetPdpContextState,
};
use crate::command::xmm::{DnsFamily, RequestDynamicDns, SetDataChannel};
use crate::error::Error;

/// Context ids at or above this are addressed as context 0.
const MAX_CID: u32 = 31;

/// Layer 2 protocol of the data state
const RAW_IP: &str = "M-RAW_IP";

pub fn normalize_cid(cid: u32) -> u32 {
    if cid >= MAX_CID {
        0
    } else {
        cid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IpFamily {
    #[default]
    Ipv4,
    Ipv6,
    Ipv4v6,
}

impl IpFamily {
    fn has_ipv4(self) -> bool {
        matches!(self, Self::Ipv4 | Self::Ipv4v6)
    }

    fn has_ipv6(self) -> bool {
        matches!(self, Self::Ipv6 | Self::Ipv4v6)
    }
}

/// Static settings per address family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerIpConfig {
    pub ipv4: Option<IpConfig>,
    pub ipv6: Option<IpConfig>,
}

pub struct XmmBearer<C> {
    at: C,
    cid: u32,
    family: IpFamily,
}

impl<C: CommandChannel> XmmBearer<C> {
    pub fn new(at: C, cid: u32, family: IpFamily) -> Self {
        Self { at, cid, family }
    }

    /// Bring up the data channel for the context.
    ///
    /// DNS requests and context activation are best effort; the data
    /// channel and data state commands must succeed. Context 0, including
    /// any id normalized to it, goes straight to the data channel.
    pub async fn dial(&mut self, cancel: &CancellationToken) -> Result<(), Error> {
        let cid = normalize_cid(self.cid);
        let mut seq = Sequencer::new(&mut self.at).with_cancellation(cancel);

        if cid != 0 {
            if self.family.has_ipv4() {
                let xdns = RequestDynamicDns {
                    cid,
                    family: DnsFamily::Ipv4,
                };
                seq.run(Step::soft("IPv4 dynamic DNS request", &xdns))
                    .await?;
            }
            if self.family.has_ipv6() {
                let xdns = RequestDynamicDns {
                    cid,
                    family: DnsFamily::Ipv6,
                };
                seq.run(Step::soft("IPv6 dynamic DNS request", &xdns))
                    .await?;
                seq.run(Step::soft("IPv6 address format", &SetIpv6AddressFormat))
                    .await?;
            }

            let activate = SetPdpContextState {
                state: 1,
                cid: Some(cid),
            };
            seq.run(Step::soft("PDP context activation", &activate))
                .await?;
        }

        seq.run(Step::fatal("Data channel setup", &SetDataChannel { cid }))
            .await?;
        let data_mode = EnterDataState { l2p: RAW_IP, cid };
        seq.run(Step::fatal("Data mode", &data_mode)).await?;

        debug!("Data channel for PDP context #{} established", cid);
        Ok(())
    }

    /// Deactivate the context. Never fails.
    pub async fn disconnect(&mut self) -> Result<(), Error> {
        let cid = match normalize_cid(self.cid) {
            0 => None,
            cid => Some(cid),
        };
        let deactivate = SetPdpContextState { state: 0, cid };
        Sequencer::new(&mut self.at)
            .run(Step::soft("Disconnection", &deactivate))
            .await?;
        Ok(())
    }

    /// Read back the static IP settings of the connected context.
    ///
    /// An IPv4 entry reported without a subnet mask gets an 8 bit prefix.
    pub async fn get_ip_config(&mut self) -> Result<BearerIpConfig, Error> {
        let cid = normalize_cid(self.cid);
        debug!("Gathering gateway information for PDP context #{}...", cid);
        let entries = self
            .at
            .send(&GetPdpContextDynamicParameters { cid })
            .await?;

        let mut config = BearerIpConfig::default();
        for mut entry in entries.0 {
            if entry.address.contains(':') {
                if self.family.has_ipv6() && config.ipv6.is_none() {
                    config.ipv6 = Some(entry);
                }
            } else if self.family.has_ipv4() && config.ipv4.is_none() {
                if entry.prefix == 0 {
                    debug!("No IPv4 subnet reported, using /8");
                    entry.prefix = 8;
                }
                config.ipv4 = Some(entry);
            }
        }

        if config.ipv4.is_none() && config.ipv6.is_none() {
            return Err(Error::Parse("No IP settings for the requested family"));
        }
        Ok(config)
    }
}

impl<C: CommandChannel> BearerBackend for XmmBearer<C> {
    async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), Error> {
        self.dial(cancel).await
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        XmmBearer::disconnect(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedChannel;

    const DATA_CHANNEL_1: &str = "+xdatachannel=1,1,\"/PCIE/IOSM/CTRL/1\",\"/PCIE/IOSM/IPS/0\",2,1";

    #[test]
    fn cid_normalization() {
        assert_eq!(normalize_cid(1), 1);
        assert_eq!(normalize_cid(30), 30);
        assert_eq!(normalize_cid(31), 0);
        assert_eq!(normalize_cid(200), 0);
    }

    #[tokio::test]
    async fn dual_stack_dial() {
        let at = ScriptedChannel::new();
        at.expect("+XDNS=1,1", Err(atat::Error::Error));
        at.expect("+XDNS=1,2", Ok(""));
        at.expect("+CGPIAF=1,1,0,1", Ok(""));
        at.expect("+CGACT=1,1", Err(atat::Error::Timeout));
        at.expect(DATA_CHANNEL_1, Ok(""));
        at.expect("+CGDATA=\"M-RAW_IP\",1", Ok(""));

        let mut bearer = XmmBearer::new(at.channel(), 1, IpFamily::Ipv4v6);
        bearer.dial(&CancellationToken::new()).await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn data_channel_failure_is_fatal() {
        let at = ScriptedChannel::new();
        at.expect("+XDNS=1,1", Ok(""));
        at.expect("+CGACT=1,1", Ok(""));
        at.expect(DATA_CHANNEL_1, Err(atat::Error::Error));

        let mut bearer = XmmBearer::new(at.channel(), 1, IpFamily::Ipv4);
        assert_eq!(
            bearer.dial(&CancellationToken::new()).await,
            Err(Error::rejected("ERROR"))
        );
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn context_zero_skips_to_data_channel() {
        let at = ScriptedChannel::new();
        at.expect(
            "+xdatachannel=1,1,\"/PCIE/IOSM/CTRL/1\",\"/PCIE/IOSM/IPS/0\",2,0",
            Ok(""),
        );
        at.expect("+CGDATA=\"M-RAW_IP\",0", Ok(""));

        let mut bearer = XmmBearer::new(at.channel(), 0, IpFamily::Ipv4);
        bearer.dial(&CancellationToken::new()).await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn high_cid_is_addressed_as_zero() {
        let at = ScriptedChannel::new();
        at.expect(
            "+xdatachannel=1,1,\"/PCIE/IOSM/CTRL/1\",\"/PCIE/IOSM/IPS/0\",2,0",
            Ok(""),
        );
        at.expect("+CGDATA=\"M-RAW_IP\",0", Ok(""));
        at.expect("+CGACT=0", Ok(""));

        let mut bearer = XmmBearer::new(at.channel(), 31, IpFamily::Ipv6);
        bearer.dial(&CancellationToken::new()).await.unwrap();
        bearer.disconnect().await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn cancelled_dial_stops_between_steps() {
        let at = ScriptedChannel::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut bearer = XmmBearer::new(at.channel(), 1, IpFamily::Ipv4);
        assert_eq!(bearer.dial(&cancel).await, Err(Error::Cancelled));
        assert!(at.sent().is_empty());
    }

    #[tokio::test]
    async fn disconnect_ignores_errors() {
        let at = ScriptedChannel::new();
        at.expect("+CGACT=0,2", Err(atat::Error::Error));

        let mut bearer = XmmBearer::new(at.channel(), 2, IpFamily::Ipv4);
        BearerBackend::disconnect(&mut bearer).await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn ip_config_defaults_ipv4_prefix() {
        let at = ScriptedChannel::new();
        at.expect(
            "+CGCONTRDP=1",
            Ok("+CGCONTRDP: 1,5,\"internet\",\"10.0.0.2\",\"10.0.0.1\",\"8.8.8.8\"\r\n\
                +CGCONTRDP: 1,5,\"internet\",\"2001:db8::1/64\",\"\",\"2001:db8::53\""),
        );

        let mut bearer = XmmBearer::new(at.channel(), 1, IpFamily::Ipv4v6);
        let config = bearer.get_ip_config().await.unwrap();

        let ipv4 = config.ipv4.unwrap();
        assert_eq!(ipv4.address, "10.0.0.2");
        assert_eq!(ipv4.prefix, 8);
        let ipv6 = config.ipv6.unwrap();
        assert_eq!(ipv6.prefix, 64);
        assert_eq!(ipv6.dns.len(), 1);
    }

    #[tokio::test]
    async fn ip_config_for_missing_family_fails() {
        let at = ScriptedChannel::new();
        at.expect(
            "+CGCONTRDP=1",
            Ok("+CGCONTRDP: 1,5,\"internet\",\"10.0.0.2.255.255.0.0\""),
        );

        let mut bearer = XmmBearer::new(at.channel(), 1, IpFamily::Ipv6);
        assert!(bearer.get_ip_config().await.is_err());
    }
}
