//! MBIM modems, optionally with a QMI-over-MBIM control path.
//!
//! Notification classes are enabled through a single
//! `DEVICE_SERVICE_SUBSCRIBE_LIST` set, rebuilt from the accumulated
//! [`NotificationFlags`] whenever one category is toggled.

use core::ops::{BitOr, BitOrAssign};

use heapless::Vec;

use crate::error::{Error, Unsupported};
use crate::modules::{Capability, ModeCombination, ModemMode, SupportedModes};

/// `MbimCellularClass`
pub mod cellular_class {
    pub const GSM: u32 = 1 << 0;
    pub const CDMA: u32 = 1 << 1;
}

/// `MbimDataClass`
pub mod data_class {
    pub const GPRS: u32 = 1 << 0;
    pub const EDGE: u32 = 1 << 1;
    pub const UMTS: u32 = 1 << 2;
    pub const HSDPA: u32 = 1 << 3;
    pub const HSUPA: u32 = 1 << 4;
    pub const LTE: u32 = 1 << 5;
    pub const XRTT_1: u32 = 1 << 16;
    pub const EVDO_1: u32 = 1 << 17;
    pub const EVDO_REVA_1: u32 = 1 << 18;
    pub const EVDV_1: u32 = 1 << 19;
    pub const XRTT_3: u32 = 1 << 20;
    pub const EVDO_REVB_1: u32 = 1 << 21;
    pub const UMB: u32 = 1 << 22;
}

/// Device services a subscribe list entry may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Service {
    BasicConnect,
    BasicConnectExtensions,
    Sms,
    Ussd,
}

pub mod cid {
    pub const SUBSCRIBER_READY_STATUS: u32 = 2;
    pub const REGISTER_STATE: u32 = 9;
    pub const PACKET_SERVICE: u32 = 10;
    pub const SIGNAL_STATE: u32 = 11;
    pub const CONNECT: u32 = 12;

    pub const PCO: u32 = 9;

    pub const SMS_READ: u32 = 2;
    pub const SMS_MESSAGE_STORE_STATUS: u32 = 6;

    pub const USSD: u32 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub service: Service,
    pub cids: Vec<u32, 5>,
}

pub type SubscribeList = Vec<EventEntry, 4>;

/// `DEVICE_CAPS` query response fields the modem keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceCaps {
    pub cellular_class: u32,
    pub data_class: u32,
    pub max_sessions: u32,
}

impl DeviceCaps {
    pub fn capability(&self) -> Capability {
        let mut mask = Capability::NONE;
        if self.cellular_class & cellular_class::GSM != 0 {
            mask = mask | Capability::GSM_UMTS;
        }
        if self.data_class & data_class::LTE != 0 {
            mask = mask | Capability::LTE;
        }
        mask
    }

    pub fn modes(&self) -> ModemMode {
        let class = self.data_class;
        let mut all = ModemMode::NONE;
        if class & (data_class::GPRS | data_class::EDGE | data_class::XRTT_1) != 0 {
            all |= ModemMode::G2;
        }
        if class
            & (data_class::UMTS
                | data_class::HSDPA
                | data_class::HSUPA
                | data_class::EVDO_1
                | data_class::EVDO_REVA_1
                | data_class::EVDV_1
                | data_class::XRTT_3
                | data_class::EVDO_REVB_1)
            != 0
        {
            all |= ModemMode::G3;
        }
        if class & (data_class::LTE | data_class::UMB) != 0 {
            all |= ModemMode::G4;
        }
        all
    }
}

/// MBIM control channel.
#[allow(async_fn_in_trait)]
pub trait MbimChannel {
    async fn query_device_caps(&mut self) -> Result<DeviceCaps, Error>;

    async fn set_subscribe_list(&mut self, entries: &[EventEntry]) -> Result<(), Error>;
}

/// QMI services reached through the MBIM QMUX tunnel.
#[allow(async_fn_in_trait)]
pub trait QmiChannel {
    async fn load_current_capabilities(&mut self) -> Result<Capability, Error>;

    async fn load_supported_capabilities(&mut self) -> Result<Vec<Capability, 4>, Error>;

    async fn load_current_modes(&mut self) -> Result<ModeCombination, Error>;

    async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error>;

    async fn set_current_modes(&mut self, mode: ModeCombination) -> Result<(), Error>;
}

/// Notification categories, as a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotificationFlags(u32);

impl NotificationFlags {
    pub const NONE: Self = Self(0);
    pub const SIGNAL_QUALITY: Self = Self(1 << 0);
    pub const REGISTRATION_UPDATES: Self = Self(1 << 1);
    pub const SMS_READ: Self = Self(1 << 2);
    pub const CONNECT: Self = Self(1 << 3);
    pub const SUBSCRIBER_INFO: Self = Self(1 << 4);
    pub const PACKET_SERVICE: Self = Self(1 << 5);
    pub const PCO: Self = Self(1 << 6);
    pub const USSD: Self = Self(1 << 7);

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for NotificationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NotificationFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Subscribe list entries for the enabled categories.
pub fn subscribe_list(enabled: NotificationFlags) -> SubscribeList {
    let mut entries = SubscribeList::new();

    let basic = [
        (NotificationFlags::SIGNAL_QUALITY, cid::SIGNAL_STATE),
        (NotificationFlags::REGISTRATION_UPDATES, cid::REGISTER_STATE),
        (NotificationFlags::CONNECT, cid::CONNECT),
        (NotificationFlags::SUBSCRIBER_INFO, cid::SUBSCRIBER_READY_STATUS),
        (NotificationFlags::PACKET_SERVICE, cid::PACKET_SERVICE),
    ];
    let cids: Vec<u32, 5> = basic
        .iter()
        .filter(|(flag, _)| enabled.contains(*flag))
        .map(|(_, cid)| *cid)
        .collect();

    // At most four entries, one per service
    if !cids.is_empty() {
        let _ = entries.push(EventEntry {
            service: Service::BasicConnect,
            cids,
        });
    }
    if enabled.contains(NotificationFlags::PCO) {
        let _ = entries.push(EventEntry {
            service: Service::BasicConnectExtensions,
            cids: Vec::from_slice(&[cid::PCO]).unwrap_or_default(),
        });
    }
    if enabled.contains(NotificationFlags::SMS_READ) {
        let _ = entries.push(EventEntry {
            service: Service::Sms,
            cids: Vec::from_slice(&[cid::SMS_READ, cid::SMS_MESSAGE_STORE_STATUS])
                .unwrap_or_default(),
        });
    }
    if enabled.contains(NotificationFlags::USSD) {
        let _ = entries.push(EventEntry {
            service: Service::Ussd,
            cids: Vec::from_slice(&[cid::USSD]).unwrap_or_default(),
        });
    }
    entries
}

/// Modem state flags the notification setup depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MbimOptions {
    pub pco_supported: bool,
    pub sim_hot_swap_configured: bool,
}

pub struct MbimModem<M, Q> {
    mbim: M,
    qmi: Option<Q>,
    options: MbimOptions,
    caps: DeviceCaps,
    qmi_capability_and_mode_switching: bool,
    /// Categories whose notifications are processed
    setup_flags: NotificationFlags,
    /// Categories subscribed on the device
    enable_flags: NotificationFlags,
}

impl<M: MbimChannel, Q: QmiChannel> MbimModem<M, Q> {
    pub fn new(mbim: M, qmi: Option<Q>, options: MbimOptions) -> Self {
        Self {
            mbim,
            qmi,
            options,
            caps: DeviceCaps::default(),
            qmi_capability_and_mode_switching: false,
            setup_flags: NotificationFlags::NONE,
            enable_flags: NotificationFlags::NONE,
        }
    }

    pub fn qmi_capability_and_mode_switching(&self) -> bool {
        self.qmi_capability_and_mode_switching
    }

    pub fn setup_flags(&self) -> NotificationFlags {
        self.setup_flags
    }

    pub fn enable_flags(&self) -> NotificationFlags {
        self.enable_flags
    }

    /// Whether a notification of `category` should be processed.
    pub fn processes(&self, category: NotificationFlags) -> bool {
        self.setup_flags.contains(category)
    }

    /// Load current capabilities over QMI first, then over MBIM.
    ///
    /// When QMI answered, its result wins and every later capability and
    /// mode operation goes through QMI as well.
    pub async fn load_current_capabilities(&mut self) -> Result<Capability, Error> {
        let mut current_qmi = Capability::NONE;
        if let Some(qmi) = self.qmi.as_mut() {
            match qmi.load_current_capabilities().await {
                Ok(caps) => current_qmi = caps,
                Err(_e) => debug!(
                    "Couldn't load current capabilities using QMI over MBIM: {}",
                    _e
                ),
            }
        }

        debug!("Loading current capabilities...");
        self.caps = self.mbim.query_device_caps().await?;
        let current_mbim = self.caps.capability();

        let result = if current_qmi != Capability::NONE {
            if current_mbim != Capability::NONE {
                if current_mbim.is_subset_of(current_qmi) {
                    debug!(
                        "MBIM reported current capabilities ({}) is a subset of the QMI-over-MBIM reported ones ({})",
                        current_mbim.bits(),
                        current_qmi.bits()
                    );
                } else {
                    warn!(
                        "MBIM reported current capabilities ({}) not found in QMI-over-MBIM reported ones ({})",
                        current_mbim.bits(),
                        current_qmi.bits()
                    );
                }
            }
            self.qmi_capability_and_mode_switching = true;
            info!("QMI-based capability and mode switching support enabled");
            current_qmi
        } else {
            current_mbim
        };
        Ok(result)
    }

    /// The capabilities cached by the last current capabilities load.
    pub async fn load_supported_capabilities(&mut self) -> Result<Vec<Capability, 4>, Error> {
        if let Some(qmi) = self.qmi_path() {
            return qmi.load_supported_capabilities().await;
        }

        let current = self.caps.capability();
        if current == Capability::NONE {
            return Err(Error::Failed(
                "Couldn't load supported capabilities: no previously catched current capabilities",
            ));
        }
        let mut supported = Vec::new();
        let _ = supported.push(current);
        Ok(supported)
    }

    pub async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
        if let Some(qmi) = self.qmi_path() {
            return qmi.load_supported_modes().await;
        }

        if self.caps.data_class == 0 {
            return Err(Error::Failed("Data class not given in device capabilities"));
        }
        let mut supported = SupportedModes::new();
        let _ = supported.push(ModeCombination::only(self.caps.modes()));
        Ok(supported)
    }

    pub async fn load_current_modes(&mut self) -> Result<ModeCombination, Error> {
        match self.qmi_path() {
            Some(qmi) => qmi.load_current_modes().await,
            None => Err(Error::Unsupported(Unsupported::Operation(
                "Current mode loading is not supported",
            ))),
        }
    }

    pub async fn set_current_modes(&mut self, mode: ModeCombination) -> Result<(), Error> {
        match self.qmi_path() {
            Some(qmi) => qmi.set_current_modes(mode).await,
            None => Err(Error::Unsupported(Unsupported::Operation(
                "Current mode switching is not supported",
            ))),
        }
    }

    fn qmi_path(&mut self) -> Option<&mut Q> {
        if self.qmi_capability_and_mode_switching {
            self.qmi.as_mut()
        } else {
            None
        }
    }

    fn basic_3gpp(&self) -> NotificationFlags {
        let mut flags = NotificationFlags::SIGNAL_QUALITY
            | NotificationFlags::CONNECT
            | NotificationFlags::SUBSCRIBER_INFO
            | NotificationFlags::PACKET_SERVICE;
        if self.options.pco_supported {
            flags |= NotificationFlags::PCO;
        }
        flags
    }

    pub fn setup_unsolicited_events(&mut self) {
        self.setup_flags |= self.basic_3gpp();
    }

    /// Subscriber info stays processed unless SIM hot swap handles it.
    pub fn cleanup_unsolicited_events(&mut self) {
        let mut flags = self.basic_3gpp();
        if !self.options.sim_hot_swap_configured {
            flags.remove(NotificationFlags::SUBSCRIBER_INFO);
        }
        self.setup_flags.remove(flags);
    }

    pub fn setup_unsolicited_registration_events(&mut self) {
        self.setup_flags.insert(NotificationFlags::REGISTRATION_UPDATES);
    }

    pub fn cleanup_unsolicited_registration_events(&mut self) {
        self.setup_flags.remove(NotificationFlags::REGISTRATION_UPDATES);
    }

    pub fn setup_messaging_unsolicited_events(&mut self) {
        self.setup_flags.insert(NotificationFlags::SMS_READ);
    }

    pub fn setup_ussd_unsolicited_events(&mut self) {
        self.setup_flags.insert(NotificationFlags::USSD);
    }

    pub async fn enable_unsolicited_events(&mut self) -> Result<(), Error> {
        let flags = self.basic_3gpp();
        self.toggle(flags, true).await
    }

    pub async fn disable_unsolicited_events(&mut self) -> Result<(), Error> {
        let flags = self.basic_3gpp();
        self.toggle(flags, false).await
    }

    pub async fn enable_unsolicited_registration_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::REGISTRATION_UPDATES, true).await
    }

    pub async fn disable_unsolicited_registration_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::REGISTRATION_UPDATES, false).await
    }

    pub async fn enable_messaging_unsolicited_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::SMS_READ, true).await
    }

    pub async fn disable_messaging_unsolicited_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::SMS_READ, false).await
    }

    pub async fn enable_ussd_unsolicited_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::USSD, true).await
    }

    pub async fn disable_ussd_unsolicited_events(&mut self) -> Result<(), Error> {
        self.toggle(NotificationFlags::USSD, false).await
    }

    /// Update the enabled set and push the whole subscribe list.
    ///
    /// The flags keep the new value even when the device rejects the list.
    async fn toggle(&mut self, flags: NotificationFlags, enable: bool) -> Result<(), Error> {
        if enable {
            self.enable_flags.insert(flags);
        } else {
            self.enable_flags.remove(flags);
        }

        let enabled = self.enable_flags;
        debug!(
            "Enabled notifications: signal ({}), registration ({}), sms ({}), connect ({}), subscriber ({}), packet ({}), pco ({}), ussd ({})",
            enabled.contains(NotificationFlags::SIGNAL_QUALITY),
            enabled.contains(NotificationFlags::REGISTRATION_UPDATES),
            enabled.contains(NotificationFlags::SMS_READ),
            enabled.contains(NotificationFlags::CONNECT),
            enabled.contains(NotificationFlags::SUBSCRIBER_INFO),
            enabled.contains(NotificationFlags::PACKET_SERVICE),
            enabled.contains(NotificationFlags::PCO),
            enabled.contains(NotificationFlags::USSD)
        );

        let entries = subscribe_list(enabled);
        self.mbim.set_subscribe_list(&entries).await
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec as StdVec;

    use super::*;
    use crate::test_helpers::init_logging;

    #[derive(Default)]
    struct FakeMbim {
        caps: Option<DeviceCaps>,
        lists: StdVec<SubscribeList>,
        reject: bool,
    }

    impl MbimChannel for FakeMbim {
        async fn query_device_caps(&mut self) -> Result<DeviceCaps, Error> {
            self.caps.ok_or(Error::Timeout)
        }

        async fn set_subscribe_list(&mut self, entries: &[EventEntry]) -> Result<(), Error> {
            self.lists.push(entries.iter().cloned().collect());
            if self.reject {
                Err(Error::Timeout)
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct FakeQmi {
        caps: Option<Capability>,
        modes_set: StdVec<ModeCombination>,
    }

    impl QmiChannel for FakeQmi {
        async fn load_current_capabilities(&mut self) -> Result<Capability, Error> {
            self.caps.ok_or(Error::Timeout)
        }

        async fn load_supported_capabilities(&mut self) -> Result<Vec<Capability, 4>, Error> {
            let mut supported = Vec::new();
            let _ = supported.push(Capability::GSM_UMTS);
            let _ = supported.push(Capability::GSM_UMTS | Capability::LTE);
            Ok(supported)
        }

        async fn load_current_modes(&mut self) -> Result<ModeCombination, Error> {
            Ok(ModeCombination::only(ModemMode::G4))
        }

        async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
            let mut supported = SupportedModes::new();
            let _ = supported.push(ModeCombination::only(ModemMode::G3 | ModemMode::G4));
            Ok(supported)
        }

        async fn set_current_modes(&mut self, mode: ModeCombination) -> Result<(), Error> {
            self.modes_set.push(mode);
            Ok(())
        }
    }

    fn lte_caps() -> DeviceCaps {
        DeviceCaps {
            cellular_class: cellular_class::GSM,
            data_class: data_class::UMTS | data_class::HSDPA | data_class::LTE,
            max_sessions: 8,
        }
    }

    #[test]
    fn subscribe_list_groups_by_service() {
        let entries = subscribe_list(
            NotificationFlags::REGISTRATION_UPDATES
                | NotificationFlags::SIGNAL_QUALITY
                | NotificationFlags::SMS_READ,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, Service::BasicConnect);
        assert_eq!(
            entries[0].cids.as_slice(),
            &[cid::SIGNAL_STATE, cid::REGISTER_STATE]
        );
        assert_eq!(entries[1].service, Service::Sms);
        assert_eq!(
            entries[1].cids.as_slice(),
            &[cid::SMS_READ, cid::SMS_MESSAGE_STORE_STATUS]
        );

        assert!(subscribe_list(NotificationFlags::NONE).is_empty());
    }

    #[test]
    fn caps_to_modes() {
        let caps = lte_caps();
        assert_eq!(caps.capability(), Capability::GSM_UMTS | Capability::LTE);
        assert_eq!(caps.modes(), ModemMode::G3 | ModemMode::G4);
    }

    #[tokio::test]
    async fn mbim_only_capabilities() {
        init_logging();
        let mbim = FakeMbim {
            caps: Some(lte_caps()),
            ..FakeMbim::default()
        };
        let mut modem = MbimModem::<_, FakeQmi>::new(mbim, None, MbimOptions::default());

        assert_eq!(
            modem.load_current_capabilities().await,
            Ok(Capability::GSM_UMTS | Capability::LTE)
        );
        assert!(!modem.qmi_capability_and_mode_switching());
        assert_eq!(
            modem.load_supported_capabilities().await.unwrap().as_slice(),
            &[Capability::GSM_UMTS | Capability::LTE]
        );
        assert_eq!(
            modem.load_supported_modes().await.unwrap().as_slice(),
            &[ModeCombination::only(ModemMode::G3 | ModemMode::G4)]
        );
        assert!(matches!(
            modem.load_current_modes().await,
            Err(Error::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn supported_capabilities_need_a_prior_load() {
        init_logging();
        let mut modem =
            MbimModem::<_, FakeQmi>::new(FakeMbim::default(), None, MbimOptions::default());

        let err = modem.load_supported_capabilities().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Couldn't load supported capabilities: no previously catched current capabilities"
        );
    }

    #[tokio::test]
    async fn qmi_result_wins_and_routes_modes() {
        init_logging();
        let mbim = FakeMbim {
            caps: Some(lte_caps()),
            ..FakeMbim::default()
        };
        let qmi = FakeQmi {
            caps: Some(Capability::GSM_UMTS),
            ..FakeQmi::default()
        };
        let mut modem = MbimModem::new(mbim, Some(qmi), MbimOptions::default());

        // MBIM reports LTE that QMI does not, which is only warned about
        assert_eq!(
            modem.load_current_capabilities().await,
            Ok(Capability::GSM_UMTS)
        );
        assert!(modem.qmi_capability_and_mode_switching());
        assert_eq!(modem.load_supported_capabilities().await.unwrap().len(), 2);
        assert_eq!(
            modem.load_current_modes().await,
            Ok(ModeCombination::only(ModemMode::G4))
        );
        modem
            .set_current_modes(ModeCombination::only(ModemMode::G3))
            .await
            .unwrap();
        assert_eq!(
            modem.qmi.as_ref().unwrap().modes_set,
            [ModeCombination::only(ModemMode::G3)]
        );
    }

    #[tokio::test]
    async fn qmi_failure_falls_back_to_mbim() {
        init_logging();
        let mbim = FakeMbim {
            caps: Some(lte_caps()),
            ..FakeMbim::default()
        };
        let mut modem = MbimModem::new(mbim, Some(FakeQmi::default()), MbimOptions::default());

        assert_eq!(
            modem.load_current_capabilities().await,
            Ok(Capability::GSM_UMTS | Capability::LTE)
        );
        assert!(!modem.qmi_capability_and_mode_switching());
    }

    #[tokio::test]
    async fn mbim_caps_error_is_returned() {
        init_logging();
        let qmi = FakeQmi {
            caps: Some(Capability::LTE),
            ..FakeQmi::default()
        };
        let mut modem = MbimModem::new(FakeMbim::default(), Some(qmi), MbimOptions::default());

        assert_eq!(
            modem.load_current_capabilities().await,
            Err(Error::Timeout)
        );
    }

    #[tokio::test]
    async fn subscribe_list_rebuilt_on_each_toggle() {
        init_logging();
        let options = MbimOptions {
            pco_supported: true,
            sim_hot_swap_configured: false,
        };
        let mut modem = MbimModem::<_, FakeQmi>::new(FakeMbim::default(), None, options);

        modem.enable_unsolicited_registration_events().await.unwrap();
        modem.enable_unsolicited_events().await.unwrap();
        modem.disable_unsolicited_registration_events().await.unwrap();

        let lists = &modem.mbim.lists;
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[0].len(), 1);
        assert_eq!(lists[0][0].cids.as_slice(), &[cid::REGISTER_STATE]);
        assert_eq!(lists[1].len(), 2);
        assert_eq!(lists[1][0].cids.len(), 5);
        assert_eq!(lists[1][1].service, Service::BasicConnectExtensions);
        assert_eq!(lists[2][0].cids.len(), 4);
        assert!(!modem
            .enable_flags()
            .contains(NotificationFlags::REGISTRATION_UPDATES));
    }

    #[tokio::test]
    async fn rejected_list_keeps_flags() {
        init_logging();
        let mbim = FakeMbim {
            reject: true,
            ..FakeMbim::default()
        };
        let mut modem = MbimModem::<_, FakeQmi>::new(mbim, None, MbimOptions::default());

        assert!(modem.enable_messaging_unsolicited_events().await.is_err());
        assert!(modem.enable_flags().contains(NotificationFlags::SMS_READ));
    }

    #[test]
    fn cleanup_keeps_subscriber_info_without_hot_swap() {
        let fake = FakeMbim::default();
        let mut modem = MbimModem::<_, FakeQmi>::new(fake, None, MbimOptions::default());

        modem.setup_unsolicited_events();
        modem.setup_unsolicited_registration_events();
        assert!(modem.processes(NotificationFlags::CONNECT));
        assert!(!modem.processes(NotificationFlags::PCO));

        modem.cleanup_unsolicited_events();
        assert!(!modem.processes(NotificationFlags::SIGNAL_QUALITY));
        assert!(modem.processes(NotificationFlags::SUBSCRIBER_INFO));
        assert!(modem.processes(NotificationFlags::REGISTRATION_UPDATES));
    }
}
