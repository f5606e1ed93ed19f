//! Unsolicited result code fan-out.
//!
//! The ingress of a port digests everything the modem sends and publishes
//! each recognised [`Urc`] on the [`UrcChannel`]. Operations interested in
//! notifications hold a [`UrcSubscription`]; dropping it frees the slot.
//! Codes published while nobody is subscribed are lost, so subscribe before
//! sending the command that provokes the notification.

use atat::AtDigester;
use embassy_sync::pubsub::WaitResult;

use crate::command::Urc;

pub const URC_CAPACITY: usize = 8;
pub const URC_SUBSCRIBERS: usize = 4;

pub type UrcChannel = atat::UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>;

pub type UrcSubscription<'a> = atat::UrcSubscription<'a, Urc, URC_CAPACITY, URC_SUBSCRIBERS>;

/// Receive side of a port, feeding the response slot and the URC channel.
pub type Ingress<'a, const INGRESS_BUF_SIZE: usize> =
    atat::Ingress<'a, AtDigester<Urc>, Urc, INGRESS_BUF_SIZE, URC_CAPACITY, URC_SUBSCRIBERS>;

/// Wait for the first code `filter` maps to a value.
pub async fn next_matching<T>(
    subscription: &mut UrcSubscription<'_>,
    mut filter: impl FnMut(Urc) -> Option<T>,
) -> T {
    loop {
        match subscription.next_message().await {
            WaitResult::Lagged(_n) => warn!("Missed {} unsolicited messages", _n),
            WaitResult::Message(urc) => {
                if let Some(value) = filter(urc) {
                    return value;
                }
            }
        }
    }
}
