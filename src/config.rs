use embassy_time::Duration;
use heapless::String;
use serde::{Deserialize, Serialize};

/// Upper bounds of the waits that enclose individual commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Grace period before a connected bearer is dropped after losing
    /// registration
    #[serde(with = "secs")]
    pub deferred_unregistration: Duration,
    /// Wait for the activation notification after the dial command
    #[serde(with = "secs")]
    pub dial_completion: Duration,
    #[serde(with = "secs")]
    pub power_off_wait: Duration,
    #[serde(with = "secs")]
    pub sim_ready_interval: Duration,
    pub sim_ready_retries: u8,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            deferred_unregistration: Duration::from_secs(15),
            dial_completion: Duration::from_secs(90),
            power_off_wait: Duration::from_secs(20),
            sim_ready_interval: Duration::from_secs(1),
            sim_ready_retries: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModemConfig {
    pub allow_roaming: bool,
    pub apn: String<64>,
    pub user: String<32>,
    pub password: String<32>,
    /// A net-capable data port exists, vendor network features are worth
    /// querying
    pub has_net_port: bool,
    /// The modem runs both 3GPP and CDMA stacks
    pub mixed_3gpp_cdma: bool,
    /// Cycle radio power around initial EPS bearer updates
    pub initial_eps_off_on: bool,
    pub timing: Timing,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            allow_roaming: true,
            apn: String::new(),
            user: String::new(),
            password: String::new(),
            has_net_port: false,
            mixed_3gpp_cdma: false,
            initial_eps_off_on: false,
            timing: Timing::default(),
        }
    }
}

mod secs {
    use embassy_time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
