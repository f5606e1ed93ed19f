//! The request/response half of a modem control port.
//!
//! A [`CommandChannel`] carries one command at a time: the `&mut self`
//! receiver makes a second concurrent command on the same port impossible.
//! Replies arrive in the order the commands were sent, each bounded by the
//! command's own `MAX_TIMEOUT_MS`.

use atat::asynch::AtatClient;
use atat::AtatCmd;

use crate::error::Error;

#[allow(async_fn_in_trait)]
pub trait CommandChannel {
    async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error>;
}

impl<T: CommandChannel> CommandChannel for &mut T {
    async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        (**self).send(cmd).await
    }
}

/// Bridges an atat client into a [`CommandChannel`].
pub struct AtatChannel<A> {
    client: A,
}

impl<A: AtatClient> AtatChannel<A> {
    pub fn new(client: A) -> Self {
        Self { client }
    }
}

impl<A: AtatClient> CommandChannel for AtatChannel<A> {
    async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        self.client.send(cmd).await.map_err(|e| {
            debug!("{} failed: {:?}", core::any::type_name::<Cmd>(), e);
            Error::from(e)
        })
    }
}
