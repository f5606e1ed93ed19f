//! Fibocom modems: ECM data path behind `+GTRNDIS`, and an optional radio
//! power cycle around initial EPS bearer updates.

use crate::asynch::channel::CommandChannel;
use crate::asynch::feature_cache::{Feature, FeatureSupport};
use crate::asynch::operation::{Sequencer, Step};
use crate::command::fibocom::{ResetModule, TestRndis};
use crate::command::general::SetModuleFunctionality;
use crate::config::ModemConfig;
use crate::error::Error;
use crate::modules::{BearerKind, GenericModem};

const FUN_LOW_POWER: u8 = 4;
const FUN_FULL: u8 = 1;

pub struct FibocomModem<C, P> {
    at: C,
    parent: P,
    has_net_port: bool,
    initial_eps_off_on: bool,
    gtrndis: Feature,
}

impl<C: CommandChannel, P: GenericModem> FibocomModem<C, P> {
    pub fn new(at: C, parent: P, config: &ModemConfig) -> Self {
        Self {
            at,
            parent,
            has_net_port: config.has_net_port,
            initial_eps_off_on: config.initial_eps_off_on,
            gtrndis: Feature::new("+GTRNDIS"),
        }
    }

    /// ECM bearer when `+GTRNDIS` is available on a net port, PPP otherwise.
    pub async fn create_bearer(&mut self) -> BearerKind {
        if !self.has_net_port {
            self.gtrndis.resolve_without_port();
        }

        let at = &mut self.at;
        let query = move || async move { at.send(&TestRndis).await };
        match self.gtrndis.resolve(query).await {
            FeatureSupport::Supported => {
                debug!("+GTRNDIS supported, creating ECM bearer");
                BearerKind::Vendor
            }
            _ => {
                debug!("+GTRNDIS unsupported, creating generic PPP bearer");
                BearerKind::Generic
            }
        }
    }

    pub async fn reset(&mut self) -> Result<(), Error> {
        self.at.send(&ResetModule).await?;
        Ok(())
    }

    /// Update the attach APN, with the radio in low power mode around the
    /// update when the modem needs it.
    pub async fn set_initial_eps_bearer_settings(&mut self, apn: &str) -> Result<(), Error> {
        if !self.initial_eps_off_on {
            return self.parent.set_initial_eps_bearer_settings(apn).await;
        }

        self.set_functionality(FUN_LOW_POWER, "Couldn't set operational state low")
            .await?;
        if let Err(e) = self.parent.set_initial_eps_bearer_settings(apn).await {
            warn!("Couldn't update initial EPS bearer settings: {}", e);
            return Err(e);
        }
        self.set_functionality(FUN_FULL, "Couldn't set operational state high")
            .await
    }

    async fn set_functionality(&mut self, fun: u8, _failure: &'static str) -> Result<(), Error> {
        let change = SetModuleFunctionality { fun };
        match Sequencer::new(&mut self.at)
            .run(Step::fatal("Functionality change", &change))
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("{}: {}", _failure, e);
                Err(e)
            }
        }
    }
}
