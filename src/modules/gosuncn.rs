//! Gosuncn modems: no vendor commands, only the choice of control protocol.

pub const VENDOR_IDS: [u16; 1] = [0x305a];

pub const DRIVERS: [&str; 2] = ["qmi_wwan", "cdc_mbim"];

pub const SUBSYSTEMS: [&str; 3] = ["tty", "net", "usb"];

/// Control protocols found while scanning the device ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortScan {
    pub has_qmi: bool,
    pub has_mbim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemBackend {
    Qmi,
    Mbim,
    /// Plain AT modem
    Generic,
}

/// Whether a device with `vendor_id` bound to `driver` is handled here.
pub fn handles(vendor_id: u16, driver: &str) -> bool {
    VENDOR_IDS.contains(&vendor_id) && DRIVERS.contains(&driver)
}

/// QMI first, then MBIM, then the generic AT modem.
pub fn select_backend(scan: PortScan) -> ModemBackend {
    if scan.has_qmi {
        debug!("QMI-powered Gosuncn modem found...");
        ModemBackend::Qmi
    } else if scan.has_mbim {
        debug!("MBIM-powered Gosuncn modem found...");
        ModemBackend::Mbim
    } else {
        ModemBackend::Generic
    }
}
