mod max_tries;

use std::time::Duration;

pub use max_tries::{max_tries, MaxTries};

use crate::{delay, DelayFn, Ready};

/// Something that can be asked "when may I retry?".
///
/// Each call hands back a [`Ready`] for the current delay and advances the
/// delay for the following call. Implementations mutate themselves on every
/// call; share one across tasks only behind your own lock.
pub trait Notify {
    fn retry(&mut self) -> Ready;
}

impl<N: Notify + ?Sized> Notify for &mut N {
    fn retry(&mut self) -> Ready {
        (**self).retry()
    }
}

impl<N: Notify + ?Sized> Notify for Box<N> {
    fn retry(&mut self) -> Ready {
        (**self).retry()
    }
}

/// An absent notifier retries immediately every time.
impl<N: Notify> Notify for Option<N> {
    fn retry(&mut self) -> Ready {
        match self {
            Some(inner) => inner.retry(),
            None => Ready::after(Duration::ZERO),
        }
    }
}

/// Signals after the current delay, then evolves the delay with its
/// [`DelayFn`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use redelay::{bounded, exponential, Notifier, Notify};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut notifier = Notifier::new(
///     Duration::ZERO,
///     [exponential(2.0), bounded(Duration::from_millis(1), Duration::from_millis(5))],
/// );
///
/// notifier.retry().await; // immediately
/// notifier.retry().await; // after 1ms
/// assert_eq!(notifier.current(), Duration::from_millis(2));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Notifier {
    current: Duration,
    evolve: Option<DelayFn>,
}

impl Notifier {
    /// Seeds the notifier with `initial`. Several functions are chained with
    /// [`delay`] in the given order; none keeps the delay fixed at `initial`.
    pub fn new(initial: Duration, fns: impl IntoIterator<Item = DelayFn>) -> Self {
        let mut fns: Vec<DelayFn> = fns.into_iter().collect();
        let evolve = match fns.len() {
            0 => None,
            1 => fns.pop(),
            _ => Some(delay(fns)),
        };
        Self {
            current: initial,
            evolve,
        }
    }

    /// Every call signals after the same `delay`.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            current: delay,
            evolve: None,
        }
    }

    /// The delay the next call to [`retry`](Notify::retry) will wait for.
    pub fn current(&self) -> Duration {
        self.current
    }
}

impl Notify for Notifier {
    fn retry(&mut self) -> Ready {
        let ready = Ready::after(self.current);
        if let Some(evolve) = &self.evolve {
            let next = evolve.apply(self.current);
            tracing::trace!(delay = ?self.current, next = ?next, "retry scheduled");
            self.current = next;
        } else {
            tracing::trace!(delay = ?self.current, "retry scheduled");
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bounded, constant, exponential, Instant};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[cfg(feature = "tokio")]
    fn offsets(notifier: &mut impl Notify, calls: usize) -> Vec<Duration> {
        let start = Instant::now();
        (0..calls)
            .map(|_| notifier.retry().deadline().unwrap() - start)
            .collect()
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_fixed_never_changes() {
        let mut notifier = Notifier::fixed(ms(10));
        assert_eq!(offsets(&mut notifier, 4), [ms(10); 4]);
        assert_eq!(notifier.current(), ms(10));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_no_fns_is_fixed() {
        let mut notifier = Notifier::new(ms(3), []);
        assert_eq!(offsets(&mut notifier, 3), [ms(3); 3]);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_delay_fixed_before_evolving() {
        let mut notifier = Notifier::new(ms(10), [exponential(2.0)]);
        assert_eq!(offsets(&mut notifier, 4), [ms(10), ms(20), ms(40), ms(80)]);
        assert_eq!(notifier.current(), ms(160));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_many_fns_compose_in_order() {
        let mut notifier = Notifier::new(
            Duration::ZERO,
            [exponential(2.0), bounded(ms(100), ms(500))],
        );
        assert_eq!(
            offsets(&mut notifier, 6),
            [ms(0), ms(100), ms(200), ms(400), ms(500), ms(500)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_initial_fires_immediately() {
        let mut notifier = Notifier::new(Duration::ZERO, [constant(ms(50))]);
        let ready = notifier.retry();
        assert!(ready.is_ready());
        ready.await;
        assert!(!notifier.retry().is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_awaits_evolving_delays() {
        let mut notifier = Notifier::new(ms(1), [exponential(2.0)]);
        let start = Instant::now();
        for elapsed in [ms(1), ms(3), ms(7)] {
            let fired_at = notifier.retry().await;
            // timers may fire late, never early
            assert!(fired_at - start >= elapsed);
            assert!(Instant::now() >= fired_at);
        }
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_boxed_notifier_forwards() {
        let mut boxed: Box<dyn Notify + Send> =
            Box::new(Notifier::new(ms(5), [exponential(2.0)]));
        assert_eq!(offsets(&mut boxed, 2), [ms(5), ms(10)]);
    }

    #[test]
    fn test_deadlines_spread_by_evolving_delay() {
        let mut notifier = Notifier::new(ms(10), [exponential(2.0)]);
        let first = notifier.retry().deadline().unwrap();
        let second = notifier.retry().deadline().unwrap();
        // the second call happens no earlier than the first
        assert!(second - first >= ms(10));
        assert_eq!(notifier.current(), ms(40));
    }

    #[cfg(all(feature = "async-std", not(feature = "tokio")))]
    #[async_std::test]
    async fn test_awaits_on_async_std() {
        let mut notifier = Notifier::new(ms(1), [exponential(2.0)]);
        let start = Instant::now();
        notifier.retry().await;
        notifier.retry().await;
        assert!(Instant::now() - start >= ms(3));
    }

    #[test]
    fn test_absent_notifier_is_immediate() {
        let mut absent: Option<Notifier> = None;
        for _ in 0..3 {
            assert!(absent.retry().is_ready());
        }

        let mut present = Some(Notifier::fixed(ms(50)));
        assert!(!present.retry().is_ready());
    }
}
