//! SIMCom modems: mode selection through the `+CNMP` preference and the
//! `+CNAOP` acquisition order. The current access technology is reported by
//! `+CNSMOD`.

use crate::asynch::channel::CommandChannel;
use crate::asynch::operation::{Sequencer, Step};
use crate::command::simtech::{
    access_technology_from_cnsmod, AcquisitionOrder, GetAcquisitionOrder, GetModePreference,
    GetNetworkSystemMode, ModePreference, SetAcquisitionOrder, SetAutoSignalQuality,
    SetModePreference, SetNetworkSystemModeReporting,
};
use crate::command::Urc;
use crate::error::{Error, Unsupported};
use crate::modules::{
    filter_supported_modes, AccessTechnology, GenericModem, ModeCombination, ModemMode,
    SupportedModes,
};

const MODE_AUTOMATIC: u8 = 2;
const MODE_GSM_ONLY: u8 = 13;
const MODE_WCDMA_ONLY: u8 = 14;

const ORDER_AUTOMATIC: u8 = 0;
const ORDER_GSM_FIRST: u8 = 1;
const ORDER_WCDMA_FIRST: u8 = 2;
/// Written for a 2G preference, never read back
const ORDER_GSM_PREFERRED: u8 = 3;

pub struct SimtechModem<C, P> {
    at: C,
    parent: P,
    access_technology: AccessTechnology,
}

impl<C: CommandChannel, P: GenericModem> SimtechModem<C, P> {
    pub fn new(at: C, parent: P) -> Self {
        Self {
            at,
            parent,
            access_technology: AccessTechnology::UNKNOWN,
        }
    }

    pub fn access_technology(&self) -> AccessTechnology {
        self.access_technology
    }

    pub async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
        let all = self.parent.load_supported_modes().await?;

        let g2g3 = ModemMode::G2 | ModemMode::G3;
        let combinations = [
            ModeCombination::only(ModemMode::G2),
            ModeCombination::only(ModemMode::G3),
            ModeCombination::only(g2g3),
            ModeCombination::new(g2g3, ModemMode::G2),
            ModeCombination::new(g2g3, ModemMode::G3),
        ];
        Ok(filter_supported_modes(&all, &combinations))
    }

    pub async fn load_current_modes(&mut self) -> Result<ModeCombination, Error> {
        let AcquisitionOrder { order } = self.at.send(&GetAcquisitionOrder).await?;
        let ModePreference { mode } = self.at.send(&GetModePreference).await?;

        let g2g3 = ModemMode::G2 | ModemMode::G3;
        match (mode, order) {
            (MODE_AUTOMATIC, ORDER_AUTOMATIC) => Ok(ModeCombination::only(ModemMode::ANY)),
            (MODE_AUTOMATIC, ORDER_GSM_FIRST) => Ok(ModeCombination::new(g2g3, ModemMode::G2)),
            (MODE_AUTOMATIC, ORDER_WCDMA_FIRST) => Ok(ModeCombination::new(g2g3, ModemMode::G3)),
            (MODE_AUTOMATIC, _) => Err(Error::Parse("Unknown acquisition order preference")),
            (MODE_GSM_ONLY, _) => Ok(ModeCombination::only(ModemMode::G2)),
            (MODE_WCDMA_ONLY, _) => Ok(ModeCombination::only(ModemMode::G3)),
            _ => Err(Error::Parse("Unknown mode preference")),
        }
    }

    /// `+CNMP` then `+CNAOP`. Combinations without a mapping fail before
    /// anything is sent.
    pub async fn set_current_modes(&mut self, mode: ModeCombination) -> Result<(), Error> {
        let (preference, order) = Self::mode_to_commands(mode)?;

        let mut seq = Sequencer::new(&mut self.at);
        seq.run(Step::fatal(
            "Mode preference",
            &SetModePreference { mode: preference },
        ))
        .await?;
        seq.run(Step::fatal(
            "Acquisition order",
            &SetAcquisitionOrder { order },
        ))
        .await?;
        Ok(())
    }

    fn mode_to_commands(mode: ModeCombination) -> Result<(u8, u8), Error> {
        let g2g3 = ModemMode::G2 | ModemMode::G3;
        match (mode.allowed, mode.preferred) {
            (ModemMode::ANY, ModemMode::NONE) => Ok((MODE_AUTOMATIC, ORDER_AUTOMATIC)),
            (ModemMode::G2, ModemMode::NONE) => Ok((MODE_GSM_ONLY, ORDER_AUTOMATIC)),
            (ModemMode::G3, ModemMode::NONE) => Ok((MODE_WCDMA_ONLY, ORDER_AUTOMATIC)),
            (allowed, ModemMode::G2) if allowed == g2g3 => {
                Ok((MODE_AUTOMATIC, ORDER_GSM_PREFERRED))
            }
            (allowed, ModemMode::G3) if allowed == g2g3 => Ok((MODE_AUTOMATIC, ORDER_WCDMA_FIRST)),
            (allowed, ModemMode::NONE) if allowed == g2g3 => Ok((MODE_AUTOMATIC, ORDER_AUTOMATIC)),
            _ => Err(Error::Unsupported(Unsupported::ModeCombination(mode))),
        }
    }

    /// Access technology from `+CNSMOD?`.
    pub async fn load_access_technologies(&mut self) -> Result<AccessTechnology, Error> {
        let system = self.at.send(&GetNetworkSystemMode).await?;
        self.access_technology = access_technology_from_cnsmod(system.stat);
        Ok(self.access_technology)
    }

    /// Parent events first, then `+CNSMOD` and `+AUTOCSQ` reporting. Vendor
    /// command failures are logged and ignored.
    pub async fn enable_unsolicited_events(&mut self) -> Result<(), Error> {
        self.parent.enable_unsolicited_events().await?;

        let mut seq = Sequencer::new(&mut self.at);
        seq.run(Step::soft(
            "Network system mode reporting",
            &SetNetworkSystemModeReporting { enable: 1 },
        ))
        .await?;
        seq.run(Step::soft(
            "Signal quality reporting",
            &SetAutoSignalQuality {
                auto: 1,
                mode: Some(1),
            },
        ))
        .await?;
        Ok(())
    }

    /// Reverse of [`enable_unsolicited_events`](Self::enable_unsolicited_events).
    pub async fn disable_unsolicited_events(&mut self) -> Result<(), Error> {
        let mut seq = Sequencer::new(&mut self.at);
        seq.run(Step::soft(
            "Network system mode reporting",
            &SetNetworkSystemModeReporting { enable: 0 },
        ))
        .await?;
        seq.run(Step::soft(
            "Signal quality reporting",
            &SetAutoSignalQuality {
                auto: 0,
                mode: None,
            },
        ))
        .await?;

        self.parent.disable_unsolicited_events().await
    }

    /// Feed an unsolicited result code. Returns `true` if it was consumed.
    pub fn handle_urc(&mut self, urc: &Urc) -> bool {
        match urc {
            Urc::NetworkSystemMode(stat) => {
                self.access_technology = access_technology_from_cnsmod(*stat);
                true
            }
            _ => false,
        }
    }
}
