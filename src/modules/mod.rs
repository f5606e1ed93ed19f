#[cfg(any(feature = "any-module", feature = "cinterion"))]
pub mod cinterion;
#[cfg(any(feature = "any-module", feature = "fibocom"))]
pub mod fibocom;
#[cfg(any(feature = "any-module", feature = "gosuncn"))]
pub mod gosuncn;
#[cfg(any(feature = "any-module", feature = "mbim"))]
pub mod mbim;
#[cfg(any(feature = "any-module", feature = "qcom-soc"))]
pub mod qcom_soc;
#[cfg(any(feature = "any-module", feature = "samsung"))]
pub mod samsung;
#[cfg(any(feature = "any-module", feature = "simtech"))]
pub mod simtech;
#[cfg(any(feature = "any-module", feature = "xmm"))]
pub mod xmm;

mod types;

pub use types::*;

use crate::error::Error;

/// The generic modem behaviour a vendor component chains up to.
///
/// A vendor component owns its parent and calls into it explicitly, before
/// or after its own commands.
#[allow(async_fn_in_trait)]
pub trait GenericModem {
    async fn enable_unsolicited_events(&mut self) -> Result<(), Error>;

    async fn disable_unsolicited_events(&mut self) -> Result<(), Error>;

    async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error>;

    /// Update the APN used for the initial EPS bearer (attach).
    async fn set_initial_eps_bearer_settings(&mut self, apn: &str) -> Result<(), Error>;
}

impl<T: GenericModem> GenericModem for &mut T {
    async fn enable_unsolicited_events(&mut self) -> Result<(), Error> {
        (**self).enable_unsolicited_events().await
    }

    async fn disable_unsolicited_events(&mut self) -> Result<(), Error> {
        (**self).disable_unsolicited_events().await
    }

    async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
        (**self).load_supported_modes().await
    }

    async fn set_initial_eps_bearer_settings(&mut self, apn: &str) -> Result<(), Error> {
        (**self).set_initial_eps_bearer_settings(apn).await
    }
}

/// Which bearer implementation a vendor picks for a new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BearerKind {
    /// Vendor data path over the net port (`^SWWAN`, ECM/RNDIS, ...)
    Vendor,
    /// Generic bearer (PPP over the data port)
    Generic,
}

/// Keep the vendor combinations whose allowed modes the generic modem also
/// reports.
pub fn filter_supported_modes(
    generic: &[ModeCombination],
    vendor: &[ModeCombination],
) -> SupportedModes {
    let mut filtered = SupportedModes::new();
    for mode in vendor {
        if generic.iter().any(|g| g.allowed.contains(mode.allowed)) {
            // Never longer than the vendor list, which fits
            let _ = filtered.push(*mode);
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_modes_the_modem_can_do() {
        let generic = [ModeCombination::only(ModemMode::G2 | ModemMode::G3)];
        let vendor = [
            ModeCombination::only(ModemMode::G2),
            ModeCombination::only(ModemMode::G3),
            ModeCombination::only(ModemMode::G4),
            ModeCombination::new(ModemMode::G2 | ModemMode::G3, ModemMode::G3),
        ];

        let filtered = filter_supported_modes(&generic, &vendor);
        assert_eq!(
            filtered.as_slice(),
            &[vendor[0], vendor[1], vendor[3]]
        );
    }
}
