use crate::bearer::{Bearer, BearerBackend};
use crate::command::Urc;
use crate::error::Error;

use super::urc::{UrcChannel, UrcSubscription};

/// Feeds network registration URCs into a bearer's forbidden-reason
/// tracking.
pub struct UrcHandler<'a, 'b, B> {
    bearer: &'b Bearer<B>,
    urc_subscription: UrcSubscription<'a>,
}

impl<'a, 'b, B: BearerBackend> UrcHandler<'a, 'b, B> {
    pub fn new(bearer: &'b Bearer<B>, urc_channel: &'a UrcChannel) -> Result<Self, Error> {
        Ok(Self {
            bearer,
            urc_subscription: urc_channel.subscribe()?,
        })
    }

    pub async fn run(&mut self) -> ! {
        loop {
            let event = self.urc_subscription.next_message_pure().await;
            self.handle_urc(event).await;
        }
    }

    async fn handle_urc(&mut self, event: Urc) {
        match event {
            Urc::NetworkRegistration(stat)
            | Urc::GprsNetworkRegistration(stat)
            | Urc::EpsNetworkRegistration(stat) => {
                self.bearer.registration_3gpp_changed(stat).await;
            }
            _ => {}
        }
    }
}
