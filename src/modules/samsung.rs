//! Samsung modems: PDP contexts driven through `%IPDPCFG`/`%IPDPACT`, with
//! the activation outcome reported by an unsolicited `%IPDPACT` line that
//! may overtake the command's `OK`.

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::asynch::channel::CommandChannel;
use crate::asynch::join_gate::{join_signals, ReplyErrorPolicy};
use crate::asynch::operation::{CancellationToken, Sequencer, Step};
use crate::asynch::urc::{next_matching, UrcChannel, UrcSubscription};
use crate::bearer::BearerBackend;
use crate::command::samsung::responses::{activation_error, ExtendedError, BAND_TABLE};
use crate::command::samsung::{
    ConfigurePdpContext, GetBandMode, GetExtendedError, SetPdpActivation,
};
use crate::command::{PdpActivationStatus, Urc};
use crate::config::ModemConfig;
use crate::error::{Error, MobileEquipmentError};
use crate::modules::Bands;

pub struct SamsungModem<C> {
    at: C,
}

impl<C: CommandChannel> SamsungModem<C> {
    pub fn new(at: C) -> Self {
        Self { at }
    }

    /// Every band of the `%IPBM` table. Never fails.
    pub fn load_supported_bands(&self) -> Bands {
        let mut bands = Vec::new();
        for (band, _) in BAND_TABLE {
            // The table fits the band list
            let _ = bands.push(band);
        }
        bands
    }

    pub async fn load_current_bands(&mut self) -> Result<Bands, Error> {
        Ok(self.at.send(&GetBandMode).await?.0)
    }

    /// Bearer for PDP context `cid`, sharing this modem's control port.
    pub fn create_bearer<'a>(
        &'a mut self,
        urc_channel: &'a UrcChannel,
        cid: u32,
        config: &ModemConfig,
    ) -> SamsungBearer<'a, &'a mut C> {
        SamsungBearer::new(&mut self.at, urc_channel, cid, config)
    }
}

pub struct SamsungBearer<'a, C> {
    at: C,
    urc_channel: &'a UrcChannel,
    profile_cid: u32,
    /// Context currently connected, 0 when none
    cid: u32,
    user: String<32>,
    password: String<32>,
    completion: Duration,
}

impl<'a, C: CommandChannel> SamsungBearer<'a, C> {
    pub fn new(at: C, urc_channel: &'a UrcChannel, cid: u32, config: &ModemConfig) -> Self {
        Self {
            at,
            urc_channel,
            profile_cid: cid,
            cid: 0,
            user: config.user.clone(),
            password: config.password.clone(),
            completion: config.timing.dial_completion,
        }
    }

    pub fn cid(&self) -> u32 {
        self.cid
    }

    /// Configure and activate the context, then wait for `%IPDPACT:<cid>,1`.
    ///
    /// An activation failure report (`%IPDPACT:<cid>,3`) is resolved through
    /// `%IER?` into a mobile equipment error.
    pub async fn dial(&mut self, cancel: &CancellationToken) -> Result<u32, Error> {
        let cid = self.profile_cid;
        let mut seq = Sequencer::new(&mut self.at).with_cancellation(cancel);

        let status = {
            let mut events = self.urc_channel.subscribe()?;

            let configure = ConfigurePdpContext::new(cid, &self.user, &self.password);
            seq.run(Step::fatal("PDP context configuration", &configure))
                .await?;
            // Fails with an error message when the context is already inactive
            let deactivate = SetPdpActivation { cid, state: 0 };
            seq.run(Step::soft("PDP context deactivation", &deactivate))
                .await?;

            let activate = SetPdpActivation { cid, state: 1 };
            let (_, status) = join_signals(
                seq.run(Step::fatal("PDP context activation", &activate)),
                activation_status(&mut events, cid, |s| {
                    matches!(
                        s,
                        PdpActivationStatus::Activated | PdpActivationStatus::ActivationFailed
                    )
                }),
                self.completion,
                ReplyErrorPolicy::FailFast,
                "Timed out waiting for connection to complete",
            )
            .await?;
            status
        };

        if status == PdpActivationStatus::ActivationFailed {
            let error = match seq
                .run(Step::fatal("Extended error query", &GetExtendedError))
                .await
            {
                Ok(Some(ExtendedError(cause))) => {
                    debug!("PDP context activation failed with cause {}", cause);
                    activation_error(cause)
                }
                _ => MobileEquipmentError::CallSetupFailed,
            };
            return Err(Error::MobileEquipment(error));
        }

        self.cid = cid;
        Ok(cid)
    }

    /// Deactivate the connected context and wait for `%IPDPACT:<cid>,0`.
    pub async fn disconnect(&mut self) -> Result<(), Error> {
        let cid = self.cid;
        let mut events = self.urc_channel.subscribe()?;

        let deactivate = SetPdpActivation { cid, state: 0 };
        let mut seq = Sequencer::new(&mut self.at);
        join_signals(
            seq.run(Step::soft("PDP context deactivation", &deactivate)),
            activation_status(&mut events, cid, |s| s == PdpActivationStatus::Deactivated),
            self.completion,
            ReplyErrorPolicy::AwaitNotification,
            "Timed out waiting for disconnection to complete",
        )
        .await?;

        self.cid = 0;
        Ok(())
    }
}

/// First status report for `cid` accepted by `wanted`.
async fn activation_status(
    events: &mut UrcSubscription<'_>,
    cid: u32,
    wanted: impl Fn(PdpActivationStatus) -> bool,
) -> PdpActivationStatus {
    next_matching(events, |urc| {
        let Urc::PdpActivation { cid: reported, status } = urc else {
            return None;
        };
        if reported != cid {
            debug!(
                "Received %IPDPACT message for CID other than the current one ({})",
                cid
            );
            return None;
        }
        match status {
            status if wanted(status) => Some(status),
            PdpActivationStatus::Unknown(_s) => {
                warn!("Unknown connect status {}", _s);
                None
            }
            _ => None,
        }
    })
    .await
}

impl<C: CommandChannel> BearerBackend for SamsungBearer<'_, C> {
    async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), Error> {
        self.dial(cancel).await.map(|_| ())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        SamsungBearer::disconnect(self).await
    }
}
