//! Qualcomm SoC modems: QMI control over RPMSG or QRTR, data on net ports
//! only.
//!
//! The data path is picked from the kernel driver of the net port:
//! `bam-dmux` interfaces map to an A2 mux SIO port through their
//! `dev_port` number, `ipa` interfaces to the QRTR control port they were
//! created from and its mux id.

use crate::error::{Error, PortError, PortName};

/// Number of A2 mux RMNET SIO ports.
const A2_MUX_PORTS: i32 = 8;

/// Which kinds of data port the QMI bearer can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataPorts {
    pub net: bool,
    pub tty: bool,
}

pub const DATA_PORTS: DataPorts = DataPorts {
    net: true,
    tty: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortSubsystem {
    Rpmsg,
    Qrtr,
}

/// A QMI control port of the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QmiPort<'a> {
    pub name: &'a str,
    pub subsystem: PortSubsystem,
}

/// A network interface as reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetPort<'a> {
    pub name: &'a str,
    pub driver: &'a str,
    /// `dev_port` sysfs attribute, negative when missing
    pub dev_port: i32,
}

/// Links created net interfaces back to their control interface.
pub trait NetPortMapper {
    fn ctrl_iface_name(&self, net_port: &str) -> Option<&str>;

    fn mux_id(&self, net_port: &str) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SioPort {
    None,
    A2MuxRmnet(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuxId {
    Unbound,
    Id(u32),
}

/// Control port and link settings to bring up data on a net port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEndpoint<'a> {
    pub qmi_port: QmiPort<'a>,
    pub sio_port: SioPort,
    pub mux_id: MuxId,
}

fn port_name(name: &str) -> PortName {
    let mut out = PortName::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

pub fn peek_port_qmi_for_data<'a>(
    net: &NetPort<'_>,
    qmi_ports: &[QmiPort<'a>],
    mapper: &impl NetPortMapper,
) -> Result<DataEndpoint<'a>, Error> {
    match net.driver {
        "bam-dmux" => {
            if !(0..A2_MUX_PORTS).contains(&net.dev_port) {
                return Err(Error::Port(PortError::NoSioPort(port_name(net.name))));
            }
            // Any RPMSG control port will do
            let qmi_port = qmi_ports
                .iter()
                .find(|p| p.subsystem == PortSubsystem::Rpmsg)
                .ok_or_else(|| Error::Port(PortError::NoQmiPort(port_name(net.name))))?;
            Ok(DataEndpoint {
                qmi_port: *qmi_port,
                sio_port: SioPort::A2MuxRmnet(net.dev_port as u8),
                mux_id: MuxId::Unbound,
            })
        }
        "ipa" => {
            let qmi_port = mapper
                .ctrl_iface_name(net.name)
                .and_then(|parent| {
                    qmi_ports
                        .iter()
                        .find(|p| p.subsystem == PortSubsystem::Qrtr && p.name == parent)
                })
                .ok_or_else(|| Error::Port(PortError::NoQmiPort(port_name(net.name))))?;
            Ok(DataEndpoint {
                qmi_port: *qmi_port,
                sio_port: SioPort::None,
                mux_id: MuxId::Id(mapper.mux_id(net.name)),
            })
        }
        driver => Err(Error::Port(PortError::UnsupportedDriver {
            port: port_name(net.name),
            driver: port_name(driver),
        })),
    }
}
