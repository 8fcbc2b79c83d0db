//! One-shot signals handed out by notifiers.
//!
//! - [`Ready`] resolves once a retry delay has elapsed ("retry now").
//! - [`Exhausted`] resolves once an attempt cap has been reached.
//!
//! Both are ordinary futures, so callers race them against their own deadline
//! or cancellation with whatever `select!` their runtime offers.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{ready, Context, Poll},
    time::Duration,
};

use futures::{
    channel::oneshot,
    future::{FutureExt, Shared},
};

use crate::time::{self, Instant, Sleep};

/// Resolves with its deadline once the delay it was created with has elapsed.
///
/// The deadline is fixed when the handle is created. The underlying timer is
/// only armed on first poll, so creating a `Ready` never blocks and does not
/// need a runtime; polling it does.
///
/// [`Ready::never`] is a handle that stays pending forever.
pub struct Ready {
    deadline: Option<Instant>,
    sleep: Option<Sleep>,
}

impl Ready {
    /// A handle that fires `delay` from now. A deadline past what [`Instant`]
    /// can represent never fires.
    pub fn after(delay: Duration) -> Self {
        Self {
            deadline: time::now().checked_add(delay),
            sleep: None,
        }
    }

    pub fn never() -> Self {
        Self {
            deadline: None,
            sleep: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Non-blocking check that the deadline has passed.
    pub fn is_ready(&self) -> bool {
        self.deadline.is_some_and(|deadline| time::now() >= deadline)
    }

    pub fn is_never(&self) -> bool {
        self.deadline.is_none()
    }
}

impl Future for Ready {
    type Output = Instant;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(deadline) = this.deadline else {
            return Poll::Pending;
        };
        let sleep = this
            .sleep
            .get_or_insert_with(|| time::sleep_until(deadline));
        ready!(sleep.as_mut().poll(cx));
        Poll::Ready(deadline)
    }
}

impl fmt::Debug for Ready {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ready")
            .field("deadline", &self.deadline)
            .field("armed", &self.sleep.is_some())
            .finish()
    }
}

/// Resolves once the attempt cap of a [`MaxTries`](crate::MaxTries) is reached.
///
/// Clones observe the same signal. If the notifier is dropped before it is
/// exhausted the signal never fires. Polling again after it resolved resolves
/// again.
#[derive(Clone)]
pub struct Exhausted {
    // `None` once this handle has seen the channel settle
    rx: Option<Shared<oneshot::Receiver<()>>>,
    fired: bool,
}

impl Exhausted {
    pub(crate) fn new() -> (Trigger, Self) {
        let (tx, rx) = oneshot::channel();
        let exhausted = Self {
            rx: Some(rx.shared()),
            fired: false,
        };
        (Trigger(Some(tx)), exhausted)
    }

    /// Non-blocking check that the signal has fired.
    pub fn is_exhausted(&self) -> bool {
        self.fired
            || self
                .rx
                .as_ref()
                .is_some_and(|rx| matches!(rx.clone().now_or_never(), Some(Ok(()))))
    }
}

impl Future for Exhausted {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.fired {
            return Poll::Ready(());
        }
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        // a settled `Shared` must not be polled again
        let settled = ready!(rx.poll_unpin(cx));
        self.rx = None;
        match settled {
            Ok(()) => {
                self.fired = true;
                Poll::Ready(())
            }
            // sender dropped unfired
            Err(oneshot::Canceled) => Poll::Pending,
        }
    }
}

impl fmt::Debug for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exhausted")
            .field("fired", &self.is_exhausted())
            .finish()
    }
}

/// Sending half of [`Exhausted`]. Fires at most once.
#[derive(Debug)]
pub(crate) struct Trigger(Option<oneshot::Sender<()>>);

impl Trigger {
    /// Returns `true` only for the call that actually fired the signal.
    pub(crate) fn fire(&mut self) -> bool {
        match self.0.take() {
            Some(tx) => {
                // nobody listening is fine
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.0.is_none()
    }
}
