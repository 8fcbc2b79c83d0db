use std::time::Duration;

use super::{Notifier, Notify};
use crate::{
    signal::{Exhausted, Trigger},
    Ready,
};

/// Caps a [`Notify`] at `max` ready signals.
///
/// The first `max` calls to [`retry`](Notify::retry) delegate to the inner
/// notifier. The next call fires the [`Exhausted`] signal and, like every call
/// after it, returns [`Ready::never`].
#[derive(Debug)]
pub struct MaxTries<N = Notifier> {
    inner: N,
    max: i64,
    attempts: i64,
    trigger: Trigger,
}

/// Caps `inner` at `max` tries. `None` retries immediately every time.
///
/// If `max` is less than 1 the returned [`Exhausted`] has already fired.
///
/// Other notifiers, optional or not, go through [`MaxTries::new`]:
/// `Option<N>` is itself a [`Notify`] that retries immediately when `None`.
///
/// # Examples
///
/// ```
/// use redelay::{max_tries, Notify};
///
/// let (mut retry, exhausted) = max_tries(1, None);
/// assert!(retry.retry().is_ready());
/// assert!(!exhausted.is_exhausted());
///
/// assert!(retry.retry().is_never());
/// assert!(exhausted.is_exhausted());
/// ```
pub fn max_tries(max: i64, inner: Option<Notifier>) -> (MaxTries, Exhausted) {
    MaxTries::new(max, inner.unwrap_or_else(|| Notifier::fixed(Duration::ZERO)))
}

impl<N: Notify> MaxTries<N> {
    pub fn new(max: i64, inner: N) -> (Self, Exhausted) {
        let (trigger, exhausted) = Exhausted::new();
        let mut tries = Self {
            inner,
            max: max.max(0),
            attempts: 0,
            trigger,
        };
        if max < 1 {
            tries.exhaust();
        }
        (tries, exhausted)
    }

    /// Ready signals handed out so far.
    pub fn attempts(&self) -> i64 {
        self.attempts
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.trigger.is_fired()
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    fn exhaust(&mut self) {
        if self.trigger.fire() {
            tracing::debug!(max_tries = self.max, "retry attempts exhausted");
        }
    }
}

impl<N: Notify> Notify for MaxTries<N> {
    fn retry(&mut self) -> Ready {
        if self.is_exhausted() {
            return Ready::never();
        }
        if self.attempts == self.max {
            self.exhaust();
            return Ready::never();
        }
        self.attempts += 1;
        tracing::trace!(attempt = self.attempts, max_tries = self.max, "retry attempt");
        self.inner.retry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exponential;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_non_positive_max_is_exhausted_up_front(#[case] max: i64) {
        let (mut retry, exhausted) = max_tries(max, Some(Notifier::fixed(Duration::ZERO)));
        assert!(exhausted.is_exhausted());
        assert!(retry.is_exhausted());
        assert_eq!(retry.max(), 0);

        // the up-front firing is not repeated
        assert!(retry.retry().is_never());
        assert!(retry.retry().is_never());
        assert_eq!(retry.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_none_inner_is_immediately_ready() {
        let (mut retry, _exhausted) = max_tries(1, None);
        let ready = retry.retry();
        assert!(ready.is_ready());
        assert!(tokio::time::timeout(Duration::from_millis(1), ready)
            .await
            .is_ok());
    }

    #[test]
    fn test_exhausts_after_max_ready_signals() {
        let (mut retry, exhausted) = max_tries(3, None);
        for attempt in 1..=3 {
            assert!(!retry.retry().is_never());
            assert_eq!(retry.attempts(), attempt);
            assert!(!exhausted.is_exhausted());
        }

        assert!(retry.retry().is_never());
        assert!(exhausted.is_exhausted());

        for _ in 0..3 {
            assert!(retry.retry().is_never());
        }
        assert_eq!(retry.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delegates_to_inner() {
        let inner = Notifier::new(Duration::from_millis(10), [exponential(2.0)]);
        let (mut retry, _exhausted) = MaxTries::new(2, inner);

        retry.retry();
        assert_eq!(retry.inner().current(), Duration::from_millis(20));
        retry.retry();
        assert_eq!(retry.inner().current(), Duration::from_millis(40));
        retry.retry();
        assert_eq!(retry.inner().current(), Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_future_resolves() {
        let (mut retry, exhausted) = max_tries(1, None);
        retry.retry().await;
        let dead = retry.retry();

        tokio::select! {
            biased;
            () = exhausted => {}
            _ = dead => panic!("dead handle fired"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_caps() {
        let (inner, inner_exhausted) = max_tries(1, None);
        let (mut outer, outer_exhausted) = MaxTries::new(5, inner);

        assert!(outer.retry().is_ready());
        assert!(outer.retry().is_never());
        assert!(inner_exhausted.is_exhausted());
        assert!(!outer_exhausted.is_exhausted());
    }

    struct Steady(Duration);

    impl Notify for Steady {
        fn retry(&mut self) -> Ready {
            Ready::after(self.0)
        }
    }

    #[test]
    fn test_optional_custom_inner() {
        let (mut absent, exhausted) = MaxTries::new(1, None::<Steady>);
        assert!(absent.retry().is_ready());
        assert!(absent.retry().is_never());
        assert!(exhausted.is_exhausted());

        let (mut present, _exhausted) = MaxTries::new(1, Some(Steady(Duration::from_secs(1))));
        let ready = present.retry();
        assert!(!ready.is_ready());
        assert!(!ready.is_never());
    }
}
