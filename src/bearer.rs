//! Generic bearer: connection status, connect/disconnect guards, and the
//! forced disconnect driven by registration changes.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::mutex::Mutex as AsyncMutex;
use embassy_sync::waitqueue::WakerRegistration;

use crate::asynch::debounce::Debouncer;
use crate::asynch::operation::CancellationToken;
use crate::config::ModemConfig;
use crate::error::Error;
use crate::registration::{
    CdmaRegistrationState, ConnectionForbiddenReason, ForbiddenAction, RegistrationDomain,
    RegistrationTracker, Status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BearerStatus {
    Disconnected,
    Disconnecting,
    Connecting,
    Connected,
}

/// Vendor specific connect and disconnect sequences.
///
/// `connect` must observe `cancel` between its steps and fail with
/// [`Error::Cancelled`] when it is set.
#[allow(async_fn_in_trait)]
pub trait BearerBackend {
    async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
}

impl<T: BearerBackend> BearerBackend for &mut T {
    async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), Error> {
        (**self).connect(cancel).await
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        (**self).disconnect().await
    }
}

struct Shared {
    status: BearerStatus,
    tracker: RegistrationTracker,
    status_waker: WakerRegistration,
}

pub struct Bearer<B> {
    backend: AsyncMutex<NoopRawMutex, B>,
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
    cancel: CancellationToken,
    deferred_3gpp: Debouncer,
    deferred_cdma: Debouncer,
    cdma: bool,
}

impl<B: BearerBackend> Bearer<B> {
    pub fn new(backend: B, config: &ModemConfig) -> Self {
        let grace = config.timing.deferred_unregistration;
        Self {
            backend: AsyncMutex::new(backend),
            shared: Mutex::new(RefCell::new(Shared {
                status: BearerStatus::Disconnected,
                tracker: RegistrationTracker::new(config.allow_roaming, config.mixed_3gpp_cdma),
                status_waker: WakerRegistration::new(),
            })),
            cancel: CancellationToken::new(),
            deferred_3gpp: Debouncer::new(grace),
            deferred_cdma: Debouncer::new(grace),
            cdma: config.mixed_3gpp_cdma,
        }
    }

    pub fn status(&self) -> BearerStatus {
        self.shared.lock(|s| s.borrow().status)
    }

    fn set_status(&self, status: BearerStatus) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.status = status;
            s.status_waker.wake();
        })
    }

    pub fn forbidden_reason(&self, domain: RegistrationDomain) -> ConnectionForbiddenReason {
        self.shared.lock(|s| s.borrow().tracker.reason(domain))
    }

    async fn wait_for_status(&self, wanted: BearerStatus) {
        poll_fn(|cx| {
            self.shared.lock(|s| {
                let s = &mut *s.borrow_mut();
                if s.status == wanted {
                    Poll::Ready(())
                } else {
                    s.status_waker.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }

    pub async fn connect(&self) -> Result<(), Error> {
        match self.status() {
            BearerStatus::Connecting => return Err(Error::InProgress("Bearer already being connected")),
            BearerStatus::Disconnecting => {
                return Err(Error::InProgress("Bearer currently being disconnected"))
            }
            _ => {}
        }

        let mut domains = [RegistrationDomain::ThreeGpp, RegistrationDomain::Cdma].into_iter();
        let roaming = domains.find(|d| {
            (*d == RegistrationDomain::ThreeGpp || self.cdma)
                && self.forbidden_reason(*d) == ConnectionForbiddenReason::Roaming
        });
        if let Some(domain) = roaming {
            return Err(Error::Forbidden(domain, ConnectionForbiddenReason::Roaming));
        }

        if self.status() == BearerStatus::Connected {
            return Ok(());
        }

        debug!("Connecting bearer");
        self.cancel.reset();
        self.set_status(BearerStatus::Connecting);

        let mut backend = self.backend.lock().await;
        let (result, launch_disconnect) = match backend.connect(&self.cancel).await {
            Err(Error::Cancelled) => (Err(Error::Cancelled), true),
            Err(e) => {
                debug!("Couldn't connect bearer: {}", e);
                self.set_status(BearerStatus::Disconnected);
                (Err(e), false)
            }
            Ok(()) if self.cancel.is_cancelled() => {
                debug!("Bearer got connected, but had to disconnect after cancellation request");
                (Err(Error::Cancelled), true)
            }
            Ok(()) => {
                debug!("Connected bearer");
                self.set_status(BearerStatus::Connected);
                (Ok(()), false)
            }
        };

        if launch_disconnect {
            self.set_status(BearerStatus::Disconnecting);
            if let Err(_e) = backend.disconnect().await {
                warn!("Error disconnecting bearer: {}. Will assume disconnected anyway.", _e);
            }
            self.set_status(BearerStatus::Disconnected);
        }

        result
    }

    pub async fn disconnect(&self) -> Result<(), Error> {
        match self.status() {
            BearerStatus::Disconnected => return Ok(()),
            BearerStatus::Disconnecting => {
                return Err(Error::InProgress("Bearer already being disconnected"))
            }
            BearerStatus::Connecting => {
                self.set_status(BearerStatus::Disconnecting);
                self.cancel.cancel();
                self.wait_for_status(BearerStatus::Disconnected).await;
                debug!("Disconnected bearer after cancelling previous connect request");
                return Ok(());
            }
            BearerStatus::Connected => {}
        }

        debug!("Disconnecting bearer");
        self.set_status(BearerStatus::Disconnecting);
        let mut backend = self.backend.lock().await;
        match backend.disconnect().await {
            Ok(()) => {
                self.set_status(BearerStatus::Disconnected);
                Ok(())
            }
            Err(e) => {
                debug!("Couldn't disconnect bearer");
                self.set_status(BearerStatus::Connected);
                Err(e)
            }
        }
    }

    /// Drop the connection whatever it takes. A connect in progress is
    /// cancelled, and a failing vendor disconnect still ends `Disconnected`.
    pub async fn disconnect_force(&self) {
        match self.status() {
            BearerStatus::Disconnecting | BearerStatus::Disconnected => return,
            BearerStatus::Connecting => {
                self.cancel.cancel();
                return;
            }
            BearerStatus::Connected => {}
        }

        info!("Forcing disconnection of bearer");
        self.set_status(BearerStatus::Disconnecting);
        let mut backend = self.backend.lock().await;
        if let Err(_e) = backend.disconnect().await {
            warn!("Error disconnecting bearer: {}. Will assume disconnected anyway.", _e);
        }
        self.set_status(BearerStatus::Disconnected);
    }

    pub async fn registration_3gpp_changed(&self, status: Status) {
        let action = self.shared.lock(|s| s.borrow_mut().tracker.update_3gpp(status));
        self.apply(action).await
    }

    pub async fn registration_cdma_changed(
        &self,
        cdma1x: CdmaRegistrationState,
        evdo: CdmaRegistrationState,
    ) {
        let action = self
            .shared
            .lock(|s| s.borrow_mut().tracker.update_cdma(cdma1x, evdo));
        self.apply(action).await
    }

    fn reset_deferred_unregistration(&self) {
        self.deferred_3gpp.cancel();
        self.deferred_cdma.cancel();
    }

    async fn apply(&self, action: ForbiddenAction) {
        match action {
            ForbiddenAction::Allow => self.reset_deferred_unregistration(),
            ForbiddenAction::DisconnectNow => {
                self.reset_deferred_unregistration();
                self.disconnect_force().await;
            }
            ForbiddenAction::Unregistered(domain) => {
                let deferred = match domain {
                    RegistrationDomain::ThreeGpp => &self.deferred_3gpp,
                    RegistrationDomain::Cdma => &self.deferred_cdma,
                };
                if deferred.is_armed() {
                    return;
                }

                if self.status() != BearerStatus::Connected {
                    debug!(
                        "Bearer not allowed to connect, not registered in {} network",
                        domain.as_str()
                    );
                    self.disconnect_force().await;
                    return;
                }

                debug!("Connected bearer not registered in {} network", domain.as_str());
                deferred.arm();
            }
        }
    }

    /// Runs the deferred disconnects armed by registration loss. Must be
    /// polled for as long as the bearer lives.
    pub async fn run_deferred(&self) -> ! {
        loop {
            let _domain = match select(self.deferred_3gpp.expired(), self.deferred_cdma.expired()).await {
                Either::First(()) => RegistrationDomain::ThreeGpp,
                Either::Second(()) => RegistrationDomain::Cdma,
            };
            info!(
                "Forcing bearer disconnection, not registered in {} network",
                _domain.as_str()
            );
            self.disconnect_force().await;
        }
    }
}
