//! Completion that waits for both a command reply and an unsolicited
//! notification, in whichever order they arrive.

use core::future::Future;

use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Timer};
use futures_util::{pin_mut, FutureExt};

use crate::error::Error;

/// Two-flag gate. Completes once, when both signals are present; after
/// completion or expiry every further call is a no-op.
#[derive(Debug)]
pub struct JoinGate<R, N> {
    reply: Option<R>,
    notification: Option<N>,
    consumed: bool,
}

impl<R, N> Default for JoinGate<R, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, N> JoinGate<R, N> {
    pub const fn new() -> Self {
        Self {
            reply: None,
            notification: None,
            consumed: false,
        }
    }

    /// Record the command outcome. A second reply is ignored.
    pub fn mark_reply(&mut self, reply: R) -> Option<(R, N)> {
        if !self.consumed && self.reply.is_none() {
            self.reply = Some(reply);
        }
        self.try_complete()
    }

    /// Record the notification. A second notification is ignored.
    pub fn mark_notification(&mut self, notification: N) -> Option<(R, N)> {
        if !self.consumed && self.notification.is_none() {
            self.notification = Some(notification);
        }
        self.try_complete()
    }

    pub fn try_complete(&mut self) -> Option<(R, N)> {
        if self.consumed || self.reply.is_none() || self.notification.is_none() {
            return None;
        }
        self.consumed = true;
        self.reply.take().zip(self.notification.take())
    }

    /// Consume the gate without completing it. Returns `false` if it was
    /// already consumed.
    pub fn expire(&mut self) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        self.reply = None;
        self.notification = None;
        true
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }

    pub fn has_notification(&self) -> bool {
        self.notification.is_some()
    }
}

/// What a failed command reply does to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyErrorPolicy {
    /// The reply error completes the operation immediately
    FailFast,
    /// The reply error is recorded and the notification is still awaited
    AwaitNotification,
}

/// Drive a [`JoinGate`] with a reply future and a notification future,
/// bounded by `limit`.
///
/// The notification future owns the unsolicited subscription; it is dropped
/// as soon as it yields, so a duplicate notification cannot be observed.
/// With [`ReplyErrorPolicy::FailFast`] the returned reply is always `Ok`.
pub async fn join_signals<R, N>(
    reply: impl Future<Output = Result<R, Error>>,
    notification: impl Future<Output = N>,
    limit: Duration,
    policy: ReplyErrorPolicy,
    timeout_message: &'static str,
) -> Result<(Result<R, Error>, N), Error> {
    let reply = reply.fuse();
    let notification = notification.fuse();
    let deadline = Timer::after(limit);
    pin_mut!(reply, notification, deadline);

    let mut gate = JoinGate::new();
    loop {
        match select3(&mut reply, &mut notification, &mut deadline).await {
            Either3::First(Err(e)) if policy == ReplyErrorPolicy::FailFast => {
                gate.expire();
                return Err(e);
            }
            Either3::First(outcome) => {
                if let Some(done) = gate.mark_reply(outcome) {
                    return Ok(done);
                }
            }
            Either3::Second(n) => {
                if let Some(done) = gate.mark_notification(n) {
                    return Ok(done);
                }
            }
            Either3::Third(()) => {
                if !gate.has_reply() {
                    warn!("Reply still pending when the gate expired");
                }
                gate.expire();
                return Err(Error::OperationTimeout(timeout_message));
            }
        }
    }
}
