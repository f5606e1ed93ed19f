//! Capability values shared by every vendor plugin.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Radio access modes, as a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemMode(u32);

impl ModemMode {
    pub const NONE: Self = Self(0);
    pub const CS: Self = Self(1 << 0);
    pub const G2: Self = Self(1 << 1);
    pub const G3: Self = Self(1 << 2);
    pub const G4: Self = Self(1 << 3);
    pub const G5: Self = Self(1 << 4);
    pub const ANY: Self = Self(u32::MAX);

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ModemMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModemMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ModemMode {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for ModemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ANY {
            return f.write_str("any");
        }
        if self.is_none() {
            return f.write_str("none");
        }

        let names = [
            (Self::CS, "cs"),
            (Self::G2, "2g"),
            (Self::G3, "3g"),
            (Self::G4, "4g"),
            (Self::G5, "5g"),
        ];
        let mut first = true;
        for (mode, name) in names {
            if self.contains(mode) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// An `{allowed, preferred}` pair, the unit of current-mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeCombination {
    pub allowed: ModemMode,
    pub preferred: ModemMode,
}

impl ModeCombination {
    pub const fn new(allowed: ModemMode, preferred: ModemMode) -> Self {
        Self { allowed, preferred }
    }

    pub const fn only(allowed: ModemMode) -> Self {
        Self {
            allowed,
            preferred: ModemMode::NONE,
        }
    }
}

pub type SupportedModes = Vec<ModeCombination, 8>;

/// Access technology bitmask reported by the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccessTechnology(u32);

impl AccessTechnology {
    pub const UNKNOWN: Self = Self(0);
    pub const GSM: Self = Self(1 << 1);
    pub const GPRS: Self = Self(1 << 3);
    pub const EDGE: Self = Self(1 << 4);
    pub const UMTS: Self = Self(1 << 5);
    pub const HSDPA: Self = Self(1 << 6);
    pub const HSUPA: Self = Self(1 << 7);
    pub const HSPA: Self = Self(1 << 8);
    pub const LTE: Self = Self(1 << 14);

    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl BitOr for AccessTechnology {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Frequency bands known to the vendor band tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    Egsm,
    Dcs,
    Pcs,
    G850,
    /// UTRAN band I
    U2100,
    /// UTRAN band II
    U1900,
    /// UTRAN band III
    U1800,
    /// UTRAN band IV
    U17iv,
    /// UTRAN band V
    U850,
    /// UTRAN band VI
    U800,
    /// UTRAN band VIII
    U900,
    Any,
}

pub type Bands = Vec<Band, 16>;

/// SIM lock kinds with a retry counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lock {
    SimPin,
    SimPuk,
    SimPin2,
    SimPuk2,
    PhFsimPin,
    PhFsimPuk,
    PhNetPin,
    PhNetPuk,
}

/// Remaining unlock attempts per lock kind; locks that could not be read
/// are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockRetries {
    entries: Vec<(Lock, u32), 8>,
}

impl UnlockRetries {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, lock: Lock, retries: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == lock) {
            entry.1 = retries;
        } else {
            // Capacity matches the number of lock kinds
            let _ = self.entries.push((lock, retries));
        }
    }

    pub fn get(&self, lock: Lock) -> Option<u32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == lock)
            .map(|(_, retries)| *retries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Modem capability bitmask (radio technology families).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capability(u32);

impl Capability {
    pub const NONE: Self = Self(0);
    pub const POTS: Self = Self(1 << 0);
    pub const CDMA_EVDO: Self = Self(1 << 1);
    pub const GSM_UMTS: Self = Self(1 << 2);
    pub const LTE: Self = Self(1 << 3);
    pub const IRIDIUM: Self = Self(1 << 5);
    pub const NR5G: Self = Self(1 << 6);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_subset_of(&self, other: Self) -> bool {
        self.0 & other.0 == self.0
    }
}

impl BitOr for Capability {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
