//! Multi-step command operations.
//!
//! An operation is an `async fn` returning [`Result`]; awaiting it consumes
//! the future, so it completes exactly once. The [`Sequencer`] drives its
//! ordered [`Step`]s over one [`CommandChannel`].

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use atat::AtatCmd;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;

use super::channel::CommandChannel;
use crate::error::Error;

struct TokenState {
    cancelled: bool,
    waker: WakerRegistration,
}

/// Cancellation flag shared between an operation and whoever may abort it.
///
/// The flag is only observed at step boundaries: a command already sent
/// runs to completion.
pub struct CancellationToken {
    state: Mutex<NoopRawMutex, RefCell<TokenState>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(TokenState {
                cancelled: false,
                waker: WakerRegistration::new(),
            })),
        }
    }

    pub fn cancel(&self) {
        self.state.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.cancelled = true;
            s.waker.wake();
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock(|s| s.borrow().cancelled)
    }

    /// Re-arm the token for a new operation.
    pub fn reset(&self) {
        self.state.lock(|s| s.borrow_mut().cancelled = false)
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        poll_fn(|cx| {
            self.state.lock(|s| {
                let s = &mut *s.borrow_mut();
                if s.cancelled {
                    Poll::Ready(())
                } else {
                    s.waker.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// First failure aborts the operation
    Fatal,
    /// Command failures are logged and swallowed
    Soft,
}

/// One command of an operation.
pub struct Step<'a, Cmd> {
    pub name: &'static str,
    pub command: &'a Cmd,
    pub severity: Severity,
}

impl<'a, Cmd: AtatCmd> Step<'a, Cmd> {
    pub const fn fatal(name: &'static str, command: &'a Cmd) -> Self {
        Self {
            name,
            command,
            severity: Severity::Fatal,
        }
    }

    pub const fn soft(name: &'static str, command: &'a Cmd) -> Self {
        Self {
            name,
            command,
            severity: Severity::Soft,
        }
    }
}

pub struct Sequencer<'c, C> {
    channel: &'c mut C,
    cancel: Option<&'c CancellationToken>,
}

impl<'c, C: CommandChannel> Sequencer<'c, C> {
    pub fn new(channel: &'c mut C) -> Self {
        Self {
            channel,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'c CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Dispatch a single step.
    ///
    /// Returns `Ok(None)` when a soft step failed.
    pub async fn run<Cmd: AtatCmd>(
        &mut self,
        step: Step<'_, Cmd>,
    ) -> Result<Option<Cmd::Response>, Error> {
        if let Some(token) = self.cancel {
            token.check()?;
        }

        match self.channel.send(step.command).await {
            Ok(reply) => Ok(Some(reply)),
            Err(e) if step.severity == Severity::Soft && e.is_command_failure() => {
                warn!("{} failed (ignored): {}", step.name, e);
                Ok(None)
            }
            Err(e) => {
                debug!("{} failed: {}", step.name, e);
                Err(e)
            }
        }
    }

    pub fn channel(&mut self) -> &mut C {
        self.channel
    }
}
