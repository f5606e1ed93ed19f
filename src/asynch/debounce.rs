use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;
use embassy_time::{Duration, Instant, Timer};

struct Shared {
    deadline: Option<Instant>,
    /// Bumped on every arm and cancel, so a sleeper can tell its deadline
    /// is stale.
    generation: u32,
    waker: WakerRegistration,
}

/// A single delayed action that can be cancelled before it fires.
///
/// At most one deadline is pending at any time: arming while armed keeps
/// the original deadline.
pub struct Debouncer {
    timeout: Duration,
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl Debouncer {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            shared: Mutex::new(RefCell::new(Shared {
                deadline: None,
                generation: 0,
                waker: WakerRegistration::new(),
            })),
        }
    }

    /// Arm the delay. Returns `false` if it was already armed.
    pub fn arm(&self) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.deadline.is_some() {
                return false;
            }
            s.deadline = Some(Instant::now() + self.timeout);
            s.generation = s.generation.wrapping_add(1);
            s.waker.wake();
            true
        })
    }

    /// Disarm the delay. Returns `true` if a pending deadline was dropped.
    pub fn cancel(&self) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.deadline.take().is_none() {
                return false;
            }
            s.generation = s.generation.wrapping_add(1);
            s.waker.wake();
            true
        })
    }

    pub fn is_armed(&self) -> bool {
        self.shared.lock(|s| s.borrow().deadline.is_some())
    }

    /// Resolves when an armed deadline passes without being cancelled. The
    /// debouncer is disarmed on return.
    pub async fn expired(&self) {
        loop {
            let (deadline, generation) = poll_fn(|cx| {
                self.shared.lock(|s| {
                    let s = &mut *s.borrow_mut();
                    match s.deadline {
                        Some(deadline) => Poll::Ready((deadline, s.generation)),
                        None => {
                            s.waker.register(cx.waker());
                            Poll::Pending
                        }
                    }
                })
            })
            .await;

            let changed = poll_fn(|cx| {
                self.shared.lock(|s| {
                    let s = &mut *s.borrow_mut();
                    if s.generation != generation {
                        Poll::Ready(())
                    } else {
                        s.waker.register(cx.waker());
                        Poll::Pending
                    }
                })
            });

            if let Either::First(()) = select(Timer::at(deadline), changed).await {
                let fired = self.shared.lock(|s| {
                    let s = &mut *s.borrow_mut();
                    if s.generation == generation {
                        s.deadline = None;
                        true
                    } else {
                        false
                    }
                });
                if fired {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_twice_keeps_one_deadline() {
        let debouncer = Debouncer::new(Duration::from_secs(15));
        assert!(debouncer.arm());
        assert!(!debouncer.arm());
        assert!(!debouncer.arm());
        assert!(debouncer.is_armed());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert!(!debouncer.is_armed());
    }

    #[tokio::test]
    async fn fires_after_timeout() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        debouncer.arm();
        let start = Instant::now();
        debouncer.expired().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!debouncer.is_armed());
    }

    #[tokio::test]
    async fn cancel_within_window_never_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        debouncer.arm();

        let flap = async {
            Timer::after(Duration::from_millis(10)).await;
            debouncer.cancel();
            Timer::after(Duration::from_millis(60)).await;
        };
        match select(debouncer.expired(), flap).await {
            Either::First(()) => panic!("debounced action fired"),
            Either::Second(()) => {}
        }
    }
}
