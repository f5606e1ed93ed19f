//! Cinterion modems
//!
//! Power off is a join of the `^SMSO` reply and the `^SHUTDOWN` unsolicited
//! line, which the module may send in either order. Access technology
//! changes are reported through the `psinfo` indicator when the firmware
//! has it, and polled through `^SMONG` otherwise.

use core::fmt::Write;

use embassy_time::Timer;
use heapless::String;

use crate::asynch::channel::CommandChannel;
use crate::asynch::feature_cache::{Feature, FeatureSupport};
use crate::asynch::join_gate::{join_signals, ReplyErrorPolicy};
use crate::asynch::operation::{Sequencer, Step};
use crate::asynch::urc::{next_matching, UrcChannel};
use crate::command::cinterion::responses::{
    access_technology_from_psinfo, build_band_mask, GprsMonitor, PinCounter, SupportedBands,
};
use crate::command::cinterion::{
    GetGprsMonitor, GetRadioBand, SetHardwareFlowControl, SetIndicator, SetRadioBand,
    SetRadioBandQuoted, SwitchOff, TestConfiguration, TestWwan, PIN_COUNTERS,
};
use crate::command::general::responses::NewMessageIndicationSupport;
use crate::command::general::{
    OperatorId, SetAutomaticOperatorSelection, SetManualOperatorSelection,
    SetModuleFunctionality, SetNewMessageIndication, SetOperatorAccessTechnology,
    TestModuleFunctionality, TestNewMessageIndication,
};
use crate::command::Urc;
use crate::config::{ModemConfig, Timing};
use crate::error::{Error, Unsupported};
use crate::modules::{
    filter_supported_modes, AccessTechnology, Band, Bands, BearerKind, GenericModem,
    ModeCombination, ModemMode, SupportedModes, UnlockRetries,
};

/// `^SIND: simstatus` value once the SIM finished initialising
const SIM_STATUS_INIT_COMPLETED: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepMode {
    Unknown,
    None,
    Functionality(u8),
}

pub struct CinterionModem<'a, C, P> {
    at: C,
    parent: P,
    urc_channel: &'a UrcChannel,
    /// Radio technologies the module has
    radio: ModemMode,
    has_net_port: bool,
    timing: Timing,
    sleep_mode: SleepMode,
    /// Last successful manual selection, `None` after automatic
    manual_operator_id: Option<OperatorId>,
    supported_bands: u32,
    sms_support: Option<NewMessageIndicationSupport>,
    swwan: Feature,
    sind_psinfo: Feature,
    access_technology: AccessTechnology,
}

impl<'a, C: CommandChannel, P: GenericModem> CinterionModem<'a, C, P> {
    pub fn new(
        at: C,
        parent: P,
        urc_channel: &'a UrcChannel,
        radio: ModemMode,
        config: &ModemConfig,
    ) -> Self {
        Self {
            at,
            parent,
            urc_channel,
            radio,
            has_net_port: config.has_net_port,
            timing: config.timing,
            sleep_mode: SleepMode::Unknown,
            manual_operator_id: None,
            supported_bands: 0,
            sms_support: None,
            swwan: Feature::new("^SWWAN"),
            sind_psinfo: Feature::new("^SIND psinfo"),
            access_technology: AccessTechnology::UNKNOWN,
        }
    }

    pub fn access_technology(&self) -> AccessTechnology {
        self.access_technology
    }

    /// Switch the radio to its lowest power functionality level.
    ///
    /// The level is chosen once from `+CFUN=?`; errors are logged and
    /// ignored.
    pub async fn power_down(&mut self) -> Result<(), Error> {
        if self.sleep_mode == SleepMode::Unknown {
            self.sleep_mode = match self.at.send(&TestModuleFunctionality).await {
                Ok(levels) if levels.0.contains(&4) => SleepMode::Functionality(4),
                Ok(levels) if levels.0.contains(&7) => SleepMode::Functionality(7),
                Ok(_) => {
                    debug!("No sleep mode found");
                    SleepMode::None
                }
                Err(_e) => {
                    warn!("Couldn't query supported functionality levels: {}", _e);
                    SleepMode::None
                }
            };
        }

        if let SleepMode::Functionality(fun) = self.sleep_mode {
            Sequencer::new(&mut self.at)
                .run(Step::soft("Sleep mode", &SetModuleFunctionality { fun }))
                .await?;
        }
        Ok(())
    }

    /// `^SMSO`, completed once the reply and `^SHUTDOWN` both arrived.
    pub async fn power_off(&mut self) -> Result<(), Error> {
        let mut shutdown = self.urc_channel.subscribe()?;

        let (reply, _) = join_signals(
            self.at.send(&SwitchOff),
            next_matching(&mut shutdown, |urc| (urc == Urc::Shutdown).then_some(())),
            self.timing.power_off_wait,
            ReplyErrorPolicy::AwaitNotification,
            "Power off operation timed out",
        )
        .await?;

        if let Err(_e) = reply {
            warn!("^SMSO failed, but the module shut down: {}", _e);
        }
        Ok(())
    }

    /// RTS/CTS flow control, required for a clean disable.
    pub async fn setup_flow_control(&mut self) -> Result<(), Error> {
        self.at.send(&SetHardwareFlowControl).await?;
        Ok(())
    }

    pub async fn load_unlock_retries(&mut self) -> Result<UnlockRetries, Error> {
        let mut retries = UnlockRetries::new();
        for (lock, cmd) in PIN_COUNTERS.iter() {
            match self.at.send(cmd).await {
                Ok(PinCounter(count)) => retries.set(*lock, count),
                Err(_e) => debug!("Couldn't load retry count for lock {:?}: {}", lock, _e),
            }
        }
        Ok(retries)
    }

    /// Wait for the SIM to finish initialising after unlock, giving up
    /// silently after the configured number of polls.
    pub async fn after_sim_unlock(&mut self) -> Result<(), Error> {
        let query = SetIndicator {
            indicator: "simstatus",
            mode: 2,
        };
        for _ in 0..self.timing.sim_ready_retries {
            if let Ok(state) = self.at.send(&query).await {
                if state.description == "simstatus" && state.value == SIM_STATUS_INIT_COMPLETED {
                    return Ok(());
                }
            }
            Timer::after(self.timing.sim_ready_interval).await;
        }
        debug!("SIM not reported ready, going on anyway");
        Ok(())
    }

    pub async fn load_supported_bands(&mut self) -> Result<Bands, Error> {
        let SupportedBands { bands, mask } = self.at.send(&TestConfiguration).await?;
        self.supported_bands = mask;
        Ok(bands)
    }

    pub async fn load_current_bands(&mut self) -> Result<Bands, Error> {
        Ok(self.at.send(&GetRadioBand).await?.0)
    }

    /// Allowed and preferred bands are both set to `bands`.
    pub async fn set_current_bands(&mut self, bands: &[Band]) -> Result<(), Error> {
        if self.radio.contains(ModemMode::G3) {
            let mask = build_band_mask(bands, self.supported_bands, false)?;
            self.at.send(&SetRadioBand { mask, commit: 1 }).await?;
        } else {
            let mask = build_band_mask(bands, self.supported_bands, true)?;
            let mut text = String::new();
            write!(text, "{}", mask).map_err(|_| Error::Overflow)?;
            let cmd = SetRadioBandQuoted {
                preferred: text.clone(),
                allowed: text,
            };
            self.at.send(&cmd).await?;
        }
        Ok(())
    }

    pub async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
        let all = self.parent.load_supported_modes().await?;

        let mut combinations = SupportedModes::new();
        let mut add = |allowed| {
            // At most four combinations
            let _ = combinations.push(ModeCombination::only(allowed));
        };
        add(ModemMode::G2);
        add(ModemMode::G3);
        if self.radio.contains(ModemMode::G4) {
            add(ModemMode::G4);
            add(ModemMode::G2 | ModemMode::G3 | ModemMode::G4);
        } else {
            add(ModemMode::G2 | ModemMode::G3);
        }

        Ok(filter_supported_modes(&all, &combinations))
    }

    /// Single technologies are forced through the `+COPS` AcT field. Any
    /// other combination restores the last network selection.
    pub async fn set_current_modes(&mut self, mode: ModeCombination) -> Result<(), Error> {
        if !mode.preferred.is_none() {
            return Err(Error::Unsupported(Unsupported::ModeCombination(mode)));
        }

        let forced = [
            (ModemMode::G4, 7),
            (ModemMode::G3, 2),
            (ModemMode::G2, 0),
        ]
        .into_iter()
        .find(|(tech, _)| mode.allowed == *tech && self.radio.contains(*tech));

        match (forced, &self.manual_operator_id) {
            (Some((_, act)), _) => self.at.send(&SetOperatorAccessTechnology { act }).await?,
            (None, Some(oper)) => {
                let cmd = SetManualOperatorSelection { oper: oper.clone() };
                self.at.send(&cmd).await?
            }
            (None, None) => self.at.send(&SetAutomaticOperatorSelection).await?,
        };
        Ok(())
    }

    /// Manual registration on `operator_id`, or automatic with `None`. The
    /// selection is remembered once the modem accepted it.
    pub async fn register_in_network(&mut self, operator_id: Option<&str>) -> Result<(), Error> {
        let operator_id = operator_id
            .map(|oper| OperatorId::try_from(oper).map_err(|_| Error::Overflow))
            .transpose()?;

        match &operator_id {
            Some(oper) => {
                let cmd = SetManualOperatorSelection { oper: oper.clone() };
                self.at.send(&cmd).await?
            }
            None => self.at.send(&SetAutomaticOperatorSelection).await?,
        };

        self.manual_operator_id = operator_id;
        Ok(())
    }

    pub async fn enable_unsolicited_events(&mut self) -> Result<(), Error> {
        if let Err(_e) = self.parent.enable_unsolicited_events().await {
            warn!("Couldn't enable parent unsolicited events: {}", _e);
        }

        let enable = SetIndicator {
            indicator: "psinfo",
            mode: 1,
        };
        let at = &mut self.at;
        let initial = match self.sind_psinfo.get() {
            FeatureSupport::NotSupported => None,
            FeatureSupport::Unknown => {
                self.sind_psinfo
                    .resolve_value(move || async move {
                        at.send(&enable).await.map(|state| state.value)
                    })
                    .await
            }
            FeatureSupport::Supported => match at.send(&enable).await {
                Ok(state) => Some(state.value),
                Err(_e) => {
                    warn!("Couldn't enable ^SIND psinfo notifications: {}", _e);
                    None
                }
            },
        };

        if let Some(psinfo) = initial {
            self.access_technology = access_technology_from_psinfo(psinfo);
        }
        Ok(())
    }

    pub async fn disable_unsolicited_events(&mut self) -> Result<(), Error> {
        if self.sind_psinfo.is_supported() {
            let disable = SetIndicator {
                indicator: "psinfo",
                mode: 0,
            };
            if let Err(_e) = self.at.send(&disable).await {
                warn!("Couldn't disable ^SIND psinfo notifications: {}", _e);
            }
        }

        if let Err(_e) = self.parent.disable_unsolicited_events().await {
            warn!("Couldn't disable parent unsolicited events: {}", _e);
        }
        Ok(())
    }

    /// Feed an unsolicited result code. Returns `true` if it was consumed.
    pub fn handle_urc(&mut self, urc: &Urc) -> bool {
        match urc {
            Urc::IndicatorEvent { indicator, value } if indicator.as_str() == "psinfo" => {
                self.access_technology = access_technology_from_psinfo(*value);
                true
            }
            _ => false,
        }
    }

    pub async fn load_access_technologies(&mut self) -> Result<AccessTechnology, Error> {
        if self.sind_psinfo.is_supported() {
            return Err(Error::Unsupported(Unsupported::Operation(
                "No need to poll access technologies",
            )));
        }

        let GprsMonitor(access_technology) = self.at.send(&GetGprsMonitor).await?;
        self.access_technology = access_technology;
        Ok(access_technology)
    }

    /// `^SWWAN` capable modules with a net port get the vendor bearer.
    pub async fn create_bearer(&mut self) -> BearerKind {
        if self.swwan.get() == FeatureSupport::Unknown && !self.has_net_port {
            self.swwan.resolve_without_port();
        }

        let at = &mut self.at;
        let query = move || async move { at.send(&TestWwan).await };
        match self.swwan.resolve(query).await {
            FeatureSupport::Supported => BearerKind::Vendor,
            _ => BearerKind::Generic,
        }
    }

    /// Read which `+CNMI` values the module accepts.
    pub async fn check_messaging_support(&mut self) -> Result<(), Error> {
        match self.at.send(&TestNewMessageIndication).await {
            Ok(support) => self.sms_support = Some(support),
            Err(_e @ Error::Parse(_)) => warn!("Error reading SMS setup: {}", _e),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// `+CNMI` with the most capable value of each field.
    pub async fn enable_messaging_unsolicited_events(&mut self) -> Result<(), Error> {
        let support = self.sms_support.clone().unwrap_or_default();
        let cmd = SetNewMessageIndication {
            mode: pick("mode", &support.mode, &[2, 1])?,
            mt: pick("mt", &support.mt, &[2, 1])?,
            bm: pick("bm", &support.bm, &[2, 0])?,
            ds: pick("ds", &support.ds, &[2, 1, 0])?,
            bfr: support.bfr.contains(&1).then_some(1),
        };
        self.at.send(&cmd).await?;
        Ok(())
    }
}

/// First value of `preference` the modem accepts for `field`.
fn pick(field: &'static str, supported: &[u32], preference: &'static [u8]) -> Result<u8, Error> {
    preference
        .iter()
        .copied()
        .find(|v| supported.contains(&u32::from(*v)))
        .ok_or(Error::Unsupported(Unsupported::SmsSetting { field, preference }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asynch::channel::AtatChannel;
    use crate::modules::Lock;
    use crate::test_helpers::{leak_urc_channel, FakeModem, ScriptedChannel};
    use atat::AtatUrc;
    use embassy_time::{Duration, Timer};

    fn config() -> ModemConfig {
        ModemConfig {
            has_net_port: true,
            timing: Timing {
                power_off_wait: Duration::from_millis(40),
                sim_ready_interval: Duration::from_millis(1),
                sim_ready_retries: 3,
                ..Timing::default()
            },
            ..ModemConfig::default()
        }
    }

    fn cinterion(
        at: &ScriptedChannel,
        radio: ModemMode,
    ) -> CinterionModem<'static, AtatChannel<ScriptedChannel>, FakeModem> {
        CinterionModem::new(
            at.channel(),
            FakeModem::new(at),
            leak_urc_channel(),
            radio,
            &config(),
        )
    }

    fn attached(
        at: &ScriptedChannel,
        urc_channel: &'static UrcChannel,
    ) -> CinterionModem<'static, AtatChannel<ScriptedChannel>, FakeModem> {
        CinterionModem::new(
            at.channel(),
            FakeModem::new(at),
            urc_channel,
            ModemMode::G2 | ModemMode::G3,
            &config(),
        )
    }

    #[tokio::test]
    async fn power_off_with_shutdown_before_reply() {
        let urc_channel = leak_urc_channel();
        let at = ScriptedChannel::with_urc_channel(urc_channel);
        at.expect_delayed_with_urc("^SMSO", Ok(""), Duration::from_millis(10), "^SHUTDOWN");

        let mut modem = attached(&at, urc_channel);
        modem.power_off().await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn power_off_error_reply_still_waits_for_shutdown() {
        let urc_channel = leak_urc_channel();
        let at = ScriptedChannel::with_urc_channel(urc_channel);
        at.expect_with_urc("^SMSO", Err(atat::Error::Error), "^SHUTDOWN");

        let mut modem = attached(&at, urc_channel);
        assert_eq!(modem.power_off().await, Ok(()));
    }

    #[tokio::test]
    async fn power_off_times_out_without_shutdown() {
        let urc_channel = leak_urc_channel();
        let at = ScriptedChannel::with_urc_channel(urc_channel);
        at.expect("^SMSO", Ok(""));
        at.expect("\\Q3", Ok(""));

        let mut modem = attached(&at, urc_channel);
        let err = modem.power_off().await.unwrap_err();
        assert_eq!(err, Error::OperationTimeout("Power off operation timed out"));
        assert_eq!(err.to_string(), "Power off operation timed out");

        // Late notification goes nowhere
        at.emit("^SHUTDOWN");
        Timer::after(Duration::from_millis(5)).await;
        modem.setup_flow_control().await.unwrap();
        assert_eq!(at.sent(), ["^SMSO", "\\Q3"]);
    }

    #[tokio::test]
    async fn power_down_picks_sleep_level_once() {
        let at = ScriptedChannel::new();
        at.expect("+CFUN=?", Ok("+CFUN: (0,1,4,7),(0)"));
        at.expect("+CFUN=4", Err(atat::Error::Timeout));
        at.expect("+CFUN=4", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        modem.power_down().await.unwrap();
        modem.power_down().await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn power_down_without_sleep_level() {
        let at = ScriptedChannel::new();
        at.expect("+CFUN=?", Ok("+CFUN: (0,1)"));

        let mut modem = cinterion(&at, ModemMode::G2);
        modem.power_down().await.unwrap();
        modem.power_down().await.unwrap();
        assert_eq!(at.sent(), ["+CFUN=?"]);
    }

    #[tokio::test]
    async fn unlock_retries_skip_unreadable_locks() {
        let at = ScriptedChannel::new();
        at.expect("^SPIC=\"SC\"", Ok("^SPIC: 3"));
        at.expect("^SPIC=\"SC\",1", Ok("^SPIC: 10"));
        at.expect("^SPIC=\"P2\"", Err(atat::Error::Error));
        at.expect("^SPIC=\"P2\",1", Ok("^SPIC: 10"));
        at.expect("^SPIC=\"PS\"", Err(atat::Error::Timeout));
        at.expect("^SPIC=\"PS\",1", Ok("garbage"));
        at.expect("^SPIC=\"PN\"", Ok("^SPIC: 3"));
        at.expect("^SPIC=\"PN\",1", Ok("^SPIC: 10"));

        let mut modem = cinterion(&at, ModemMode::G2);
        let retries = modem.load_unlock_retries().await.unwrap();

        assert_eq!(retries.len(), 5);
        assert_eq!(retries.get(Lock::SimPin), Some(3));
        assert_eq!(retries.get(Lock::SimPin2), None);
        assert_eq!(retries.get(Lock::PhFsimPuk), None);
        assert_eq!(retries.get(Lock::PhNetPuk), Some(10));
    }

    #[tokio::test]
    async fn sim_status_polled_until_ready() {
        let at = ScriptedChannel::new();
        at.expect("^SIND=\"simstatus\",2", Ok("^SIND: simstatus,1,0"));
        at.expect("^SIND=\"simstatus\",2", Err(atat::Error::Timeout));
        at.expect("^SIND=\"simstatus\",2", Ok("^SIND: simstatus,1,5"));

        let mut modem = cinterion(&at, ModemMode::G2);
        modem.after_sim_unlock().await.unwrap();
        assert!(at.is_done());

        for _ in 0..3 {
            at.expect("^SIND=\"simstatus\",2", Ok("^SIND: simstatus,1,1"));
        }
        modem.after_sim_unlock().await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn swwan_queried_once() {
        let at = ScriptedChannel::new();
        at.expect("^SWWAN=?", Ok("^SWWAN: (0,1),(1,2)"));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        assert_eq!(modem.create_bearer().await, BearerKind::Vendor);
        assert_eq!(modem.create_bearer().await, BearerKind::Vendor);
        assert_eq!(at.sent(), ["^SWWAN=?"]);
    }

    #[tokio::test]
    async fn swwan_not_queried_without_net_port() {
        let at = ScriptedChannel::new();
        let config = ModemConfig {
            has_net_port: false,
            ..config()
        };

        let mut modem = CinterionModem::new(
            at.channel(),
            FakeModem::new(&at),
            leak_urc_channel(),
            ModemMode::G3,
            &config,
        );
        assert_eq!(modem.create_bearer().await, BearerKind::Generic);
        assert!(at.sent().is_empty());
    }

    #[tokio::test]
    async fn swwan_query_failure_falls_back_to_generic() {
        let at = ScriptedChannel::new();
        at.expect("^SWWAN=?", Err(atat::Error::Timeout));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        assert_eq!(modem.create_bearer().await, BearerKind::Generic);
        assert_eq!(modem.create_bearer().await, BearerKind::Generic);
        assert_eq!(at.sent(), ["^SWWAN=?"]);
    }

    #[tokio::test]
    async fn automatic_mode_restores_last_selection() {
        let at = ScriptedChannel::new();
        at.expect("+COPS=1,2,\"21403\"", Ok(""));
        at.expect("+COPS=1,2,\"21403\"", Ok(""));
        at.expect("+COPS=,,,2", Ok(""));
        at.expect("+COPS=0", Ok(""));
        at.expect("+COPS=0", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        modem.register_in_network(Some("21403")).await.unwrap();
        modem
            .set_current_modes(ModeCombination::only(ModemMode::ANY))
            .await
            .unwrap();
        modem
            .set_current_modes(ModeCombination::only(ModemMode::G3))
            .await
            .unwrap();
        modem.register_in_network(None).await.unwrap();
        modem
            .set_current_modes(ModeCombination::only(ModemMode::G2 | ModemMode::G3))
            .await
            .unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn failed_registration_keeps_previous_selection() {
        let at = ScriptedChannel::new();
        at.expect("+COPS=1,2,\"21403\"", Ok(""));
        at.expect("+COPS=1,2,\"21401\"", Err(atat::Error::Error));
        at.expect("+COPS=1,2,\"21403\"", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        modem.register_in_network(Some("21403")).await.unwrap();
        assert!(modem.register_in_network(Some("21401")).await.is_err());
        modem
            .set_current_modes(ModeCombination::only(ModemMode::ANY))
            .await
            .unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn overlong_operator_id_sends_nothing() {
        let at = ScriptedChannel::new();
        at.expect("+COPS=1,2,\"21403\"", Ok(""));
        at.expect("+COPS=1,2,\"21403\"", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        modem.register_in_network(Some("21403")).await.unwrap();
        assert_eq!(
            modem.register_in_network(Some("214031234")).await,
            Err(Error::Overflow)
        );
        assert_eq!(at.sent(), ["+COPS=1,2,\"21403\""]);

        modem
            .set_current_modes(ModeCombination::only(ModemMode::ANY))
            .await
            .unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn preferred_mode_is_rejected_before_sending() {
        let at = ScriptedChannel::new();

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3 | ModemMode::G4);
        let all = ModemMode::G2 | ModemMode::G3 | ModemMode::G4;
        let mode = ModeCombination::new(all, ModemMode::G3);
        let err = modem.set_current_modes(mode).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Requested mode (allowed: '2g, 3g, 4g', preferred: '3g') not supported by the modem."
        );
        assert!(at.sent().is_empty());
    }

    #[tokio::test]
    async fn supported_modes_follow_radio() {
        let at = ScriptedChannel::new();

        let mut parent = FakeModem::new(&at);
        parent.supported_modes = std::vec![ModeCombination::only(
            ModemMode::G2 | ModemMode::G3 | ModemMode::G4
        )];
        let radio = ModemMode::G2 | ModemMode::G3 | ModemMode::G4;
        let mut modem =
            CinterionModem::new(at.channel(), parent, leak_urc_channel(), radio, &config());

        let modes = modem.load_supported_modes().await.unwrap();
        assert_eq!(modes.len(), 4);
        assert_eq!(modes[2], ModeCombination::only(ModemMode::G4));
        assert_eq!(at.sent(), ["parent:load_supported_modes"]);
    }

    #[tokio::test]
    async fn psinfo_indicator_replaces_polling() {
        let at = ScriptedChannel::new();
        at.expect("^SIND=\"psinfo\",1", Ok("^SIND: psinfo,1,16"));
        at.expect("^SIND=\"psinfo\",0", Err(atat::Error::Timeout));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3 | ModemMode::G4);
        modem.enable_unsolicited_events().await.unwrap();
        assert_eq!(modem.access_technology(), AccessTechnology::LTE);
        assert!(matches!(
            modem.load_access_technologies().await,
            Err(Error::Unsupported(Unsupported::Operation(_)))
        ));

        let urc = <Urc as AtatUrc>::parse(b"+CIEV: psinfo,5").unwrap();
        assert!(modem.handle_urc(&urc));
        assert_eq!(modem.access_technology(), AccessTechnology::UMTS);

        modem.disable_unsolicited_events().await.unwrap();
        assert_eq!(
            at.sent(),
            [
                "parent:enable_unsolicited_events",
                "^SIND=\"psinfo\",1",
                "^SIND=\"psinfo\",0",
                "parent:disable_unsolicited_events",
            ]
        );
    }

    #[tokio::test]
    async fn without_psinfo_access_technology_is_polled() {
        let at = ScriptedChannel::new();
        at.expect("^SIND=\"psinfo\",1", Err(atat::Error::Error));
        at.expect(
            "^SMONG",
            Ok("GPRS Monitor\r\nBCCH  G  PBCCH  PAT MCC  MNC  NOM  TA      RAC    # Cell #\r\n0776  3  -      -   214   03  2    00      01"),
        );

        let mut parent = FakeModem::new(&at);
        parent.fail = true;
        let mut modem = CinterionModem::new(
            at.channel(),
            parent,
            leak_urc_channel(),
            ModemMode::G2,
            &config(),
        );

        modem.enable_unsolicited_events().await.unwrap();
        modem.enable_unsolicited_events().await.unwrap();
        assert_eq!(
            modem.load_access_technologies().await,
            Ok(AccessTechnology::EDGE)
        );
        modem.disable_unsolicited_events().await.unwrap();
        assert_eq!(
            at.sent(),
            [
                "parent:enable_unsolicited_events",
                "^SIND=\"psinfo\",1",
                "parent:enable_unsolicited_events",
                "^SMONG",
                "parent:disable_unsolicited_events",
            ]
        );
    }

    #[tokio::test]
    async fn new_message_indication_prefers_most_capable_values() {
        let at = ScriptedChannel::new();
        at.expect("+CNMI=?", Ok("+CNMI: (0,1,2),(0,1),(0,2),(0),(1)"));
        at.expect("+CNMI=2,1,2,0,1", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2);
        modem.check_messaging_support().await.unwrap();
        modem.enable_messaging_unsolicited_events().await.unwrap();
        assert!(at.is_done());
    }

    #[tokio::test]
    async fn new_message_indication_without_acceptable_mode() {
        let at = ScriptedChannel::new();
        at.expect("+CNMI=?", Ok("+CNMI: (0),(0,1),(0,2),(0)"));

        let mut modem = cinterion(&at, ModemMode::G2);
        modem.check_messaging_support().await.unwrap();
        let err = modem.enable_messaging_unsolicited_events().await.unwrap_err();
        assert_eq!(err.to_string(), "SMS settings don't accept [2, 1] <mode>");
        assert_eq!(at.sent(), ["+CNMI=?"]);
    }

    #[tokio::test]
    async fn bands_3g_and_2g() {
        let at = ScriptedChannel::new();
        at.expect("^SCFG=?", Ok("^SCFG: \"Radio/Band\",(\"1-511\",\"0-1\")"));
        at.expect("^SCFG=\"Radio/Band\",17,1", Ok(""));

        let mut modem = cinterion(&at, ModemMode::G2 | ModemMode::G3);
        assert_eq!(modem.load_supported_bands().await.unwrap().len(), 9);
        modem
            .set_current_bands(&[Band::Egsm, Band::U2100])
            .await
            .unwrap();

        let at = ScriptedChannel::new();
        at.expect("^SCFG=?", Ok("^SCFG: \"Radio/Band\",(\"1-15\")"));
        at.expect("^SCFG=\"Radio/Band\",\"15\",\"15\"", Ok(""));
        at.expect("^SCFG=\"Radio/Band\"", Ok("^SCFG: \"Radio/Band\",\"15\",\"15\""));

        let mut modem = cinterion(&at, ModemMode::G2);
        modem.load_supported_bands().await.unwrap();
        modem.set_current_bands(&[Band::Any]).await.unwrap();
        assert_eq!(modem.load_current_bands().await.unwrap().len(), 4);
        assert!(matches!(
            modem.set_current_bands(&[Band::Egsm, Band::G850]).await,
            Err(Error::Unsupported(Unsupported::BandCombination(_)))
        ));
        assert!(at.is_done());
    }
}
