use atat::nom::sequence::preceded;
use heapless::Vec;

use crate::command::parser::{fields, finish, lines, named_value, number, tagged, text};
use crate::error::MobileEquipmentError;
use crate::modules::{Band, Bands};

/// Band names used by `%IPBM`.
pub const BAND_TABLE: [(Band, &str); 11] = [
    (Band::U2100, "FDD_BAND_I"),
    (Band::U1900, "FDD_BAND_II"),
    (Band::U1800, "FDD_BAND_III"),
    (Band::U17iv, "FDD_BAND_IV"),
    (Band::U850, "FDD_BAND_V"),
    (Band::U800, "FDD_BAND_VI"),
    (Band::U900, "FDD_BAND_VIII"),
    (Band::G850, "G850"),
    (Band::Dcs, "DCS"),
    (Band::Egsm, "EGSM"),
    (Band::Pcs, "PCS"),
];

/// Activation failure causes with a dedicated error. Anything else is a
/// generic call setup failure.
const ACTIVATION_CAUSES: [(u32, MobileEquipmentError); 2] = [
    (27, MobileEquipmentError::MissingOrUnknownApn),
    (33, MobileEquipmentError::MissingOrUnknownApn),
];

/// Cause code of `%IER: <x>,<y>,<cause>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedError(pub u32);

impl atat::AtatResp for ExtendedError {}

pub fn parse_extended_error(resp: &[u8]) -> Result<ExtendedError, atat::Error> {
    let args = finish(preceded(tagged("%IER:"), fields::<4>)(resp))?;
    let cause = args.get(2).ok_or(atat::Error::Parse)?;
    finish(number(cause)).map(ExtendedError)
}

pub fn activation_error(cause: u32) -> MobileEquipmentError {
    ACTIVATION_CAUSES
        .iter()
        .find(|(code, _)| *code == cause)
        .map(|(_, e)| *e)
        .unwrap_or(MobileEquipmentError::CallSetupFailed)
}

/// Enabled bands from the `%IPBM?` listing:
///
/// ```text
/// "ANY": 1
/// "EGSM": 0
/// "FDD_BAND_I": 1
/// ```
///
/// Names outside the band table (including `ANY`) are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledBands(pub Bands);

impl atat::AtatResp for EnabledBands {}

pub fn parse_band_mode(resp: &[u8]) -> Result<EnabledBands, atat::Error> {
    let mut bands = Vec::new();
    for line in lines(resp) {
        let Ok((_, (name, 1))) = named_value(line) else {
            continue;
        };
        let name = text(name)?;
        if let Some((band, _)) = BAND_TABLE.iter().find(|(_, n)| *n == name) {
            // At most one entry per table row
            let _ = bands.push(*band);
        }
    }
    Ok(EnabledBands(bands))
}
