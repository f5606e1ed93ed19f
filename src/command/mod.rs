//! AT command vocabulary of the supported vendors.
//!
//! Commands derive [`atat::AtatCmd`]; replies `serde_at` can read derive
//! [`atat::AtatResp`], the others are read with the nom helpers in
//! `parser`. Reply types live next to the commands in `responses` modules.

pub mod cinterion;
pub mod fibocom;
pub mod general;
pub mod samsung;
pub mod simtech;
pub mod xmm;

mod parser;
mod urc;

use atat::atat_derive::AtatResp;

pub use urc::{NetworkRegistration, NetworkSystemModeChange, PdpActivationStatus, Urc};

#[derive(Debug, Clone, AtatResp)]
pub struct NoResponse;

/// Reply of a support check, only its `OK` matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledged;

impl atat::AtatResp for Acknowledged {}

pub(crate) fn acknowledge(_resp: &[u8]) -> Result<Acknowledged, atat::Error> {
    Ok(Acknowledged)
}
