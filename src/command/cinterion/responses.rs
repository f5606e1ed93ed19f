use atat::nom::{
    bytes::complete::tag,
    sequence::{preceded, tuple},
};
use heapless::{String, Vec};

use crate::command::parser::{comma, field, finish, group, lines, number, range, tagged, text};
use crate::error::{Error, Unsupported};
use crate::modules::{AccessTechnology, Band, Bands};

/// Bit of each band in the `^SCFG="Radio/Band"` mask.
pub const BAND_FLAGS: [(u32, Band); 9] = [
    (1 << 0, Band::Egsm),
    (1 << 1, Band::Dcs),
    (1 << 2, Band::Pcs),
    (1 << 3, Band::G850),
    (1 << 4, Band::U2100),
    (1 << 5, Band::U1900),
    (1 << 6, Band::U850),
    (1 << 7, Band::U900),
    (1 << 8, Band::U800),
];

/// The only band masks a 2G-only module accepts.
const VALID_2G_MASKS: [u32; 9] = [1, 2, 4, 8, 3, 5, 10, 12, 15];

pub fn bands_from_mask(mask: u32) -> Bands {
    let mut bands = Vec::new();
    for (flag, band) in BAND_FLAGS {
        if mask & flag != 0 {
            // One entry per table row, the table fits
            let _ = bands.push(band);
        }
    }
    bands
}

/// `^SPIC: <counter>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinCounter(pub u32);

impl atat::AtatResp for PinCounter {}

pub fn parse_pin_counter(resp: &[u8]) -> Result<PinCounter, atat::Error> {
    finish(preceded(tagged("^SPIC:"), number)(resp)).map(PinCounter)
}

/// Payload of the `"Radio/Band"` line of a `^SCFG` listing.
fn radio_band(resp: &[u8]) -> Result<&[u8], atat::Error> {
    lines(resp)
        .find_map(|line| {
            tuple((tagged("^SCFG:"), tag("\"Radio/Band\""), comma))(line)
                .ok()
                .map(|(rest, _)| rest)
        })
        .ok_or(atat::Error::Parse)
}

/// Every band of `^SCFG=?`, with the mask selecting all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedBands {
    pub bands: Bands,
    pub mask: u32,
}

impl atat::AtatResp for SupportedBands {}

/// `^SCFG: "Radio/Band",("1-511","0-1")`. The upper end of the first range
/// is the mask of every supported band.
pub fn parse_supported_bands(resp: &[u8]) -> Result<SupportedBands, atat::Error> {
    let first = finish(group(radio_band(resp)?))?;
    let (_, mask) = finish(range(first))?;

    let bands = bands_from_mask(mask);
    if bands.is_empty() {
        error!("No valid bands found in ^SCFG=? response");
        return Err(atat::Error::Parse);
    }
    Ok(SupportedBands { bands, mask })
}

/// Bands of `^SCFG: "Radio/Band",<rbp>[,<rba>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentBands(pub Bands);

impl atat::AtatResp for CurrentBands {}

pub fn parse_current_bands(resp: &[u8]) -> Result<CurrentBands, atat::Error> {
    let current = finish(number(radio_band(resp)?))?;

    let bands = bands_from_mask(current);
    if bands.is_empty() {
        error!("No valid bands found in ^SCFG response");
        return Err(atat::Error::Parse);
    }
    Ok(CurrentBands(bands))
}

/// Build the band mask to write. `[Band::Any]` selects every supported band.
pub fn build_band_mask(bands: &[Band], supported: u32, only_2g: bool) -> Result<u32, Error> {
    let mask = if bands == [Band::Any] {
        supported
    } else {
        let mask = BAND_FLAGS
            .iter()
            .filter(|(_, band)| bands.contains(band))
            .fold(0, |mask, (flag, _)| mask | flag);
        if only_2g && !VALID_2G_MASKS.contains(&mask) {
            0
        } else {
            mask
        }
    };

    if mask == 0 {
        let mut requested = Vec::new();
        for band in bands.iter().take(16) {
            let _ = requested.push(*band);
        }
        return Err(Error::Unsupported(Unsupported::BandCombination(requested)));
    }
    Ok(mask)
}

/// `^SIND: <description>,<mode>,<value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorState {
    pub description: String<16>,
    pub mode: u32,
    pub value: u32,
}

impl atat::AtatResp for IndicatorState {}

pub fn parse_indicator(resp: &[u8]) -> Result<IndicatorState, atat::Error> {
    let (description, _, mode, _, value) = lines(resp)
        .find_map(|line| {
            tuple((preceded(tagged("^SIND:"), field), comma, number, comma, number))(line)
                .ok()
                .map(|(_, parsed)| parsed)
        })
        .ok_or(atat::Error::Parse)?;

    Ok(IndicatorState {
        description: String::try_from(text(description)?).map_err(|_| atat::Error::Parse)?,
        mode,
        value,
    })
}

pub fn access_technology_from_psinfo(value: u32) -> AccessTechnology {
    match value {
        1 | 2 => AccessTechnology::GPRS,
        3 | 4 => AccessTechnology::EDGE,
        5 | 6 => AccessTechnology::UMTS,
        7 | 8 => AccessTechnology::HSDPA,
        9 | 10 => AccessTechnology::HSDPA | AccessTechnology::HSUPA,
        16 | 17 => AccessTechnology::LTE,
        0 => AccessTechnology::UNKNOWN,
        _v => {
            debug!("Unable to identify access technology from psinfo value: {}", _v);
            AccessTechnology::UNKNOWN
        }
    }
}

/// Access technology from the `G` (GPRS status) column of `^SMONG`:
///
/// ```text
/// GPRS Monitor
/// BCCH  G  PBCCH  PAT MCC  MNC  NOM  TA      RAC    # Cell #
/// 0776  1  -      -   214   03  2    00      01
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GprsMonitor(pub AccessTechnology);

impl atat::AtatResp for GprsMonitor {}

pub fn parse_gprs_monitor(resp: &[u8]) -> Result<GprsMonitor, atat::Error> {
    let mut rows = lines(resp);
    rows.by_ref()
        .find(|line| text(line).is_ok_and(|l| l.starts_with("BCCH")))
        .ok_or(atat::Error::Parse)?;
    let status = rows
        .next()
        .and_then(|row| text(row).ok())
        .and_then(|row| row.split_whitespace().nth(1))
        .and_then(|status| status.parse::<u32>().ok())
        .ok_or_else(|| {
            error!("Couldn't read 'GPRS status' field from ^SMONG response");
            atat::Error::Parse
        })?;

    match status {
        0 => Ok(GprsMonitor(AccessTechnology::UNKNOWN)),
        1 | 2 => Ok(GprsMonitor(AccessTechnology::GPRS)),
        3 | 4 => Ok(GprsMonitor(AccessTechnology::EDGE)),
        _ => Err(atat::Error::Parse),
    }
}
