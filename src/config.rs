use std::time::Duration;

use crate::{
    bounded_min, delay, randomize, try_bounded, try_exponential, DelayFn, Error, Exhausted,
    MaxTries, Notifier,
};

/// Declarative retry settings, e.g. loaded from a config file with the `serde`
/// feature enabled.
///
/// The delay evolves as `exponential(factor)`, then `randomize(jitter)` when
/// jitter is non-zero, then the `[min_delay, max_delay]` bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Delay before the first ready signal.
    pub initial: Duration,
    pub factor: f64,
    pub min_delay: Duration,
    /// No upper bound when unset.
    pub max_delay: Option<Duration>,
    /// Additive jitter, see [`randomize`].
    pub jitter: Duration,
    /// Values below 1 are exhausted immediately.
    pub max_tries: i64,
}

impl Default for RetryConfig {
    /// Returns:
    /// - `initial = 0` (first try is immediate);
    /// - `factor = 2.0`;
    /// - `min_delay = 100ms`, `max_delay = 5s`;
    /// - no jitter;
    /// - `max_tries = 10`.
    fn default() -> Self {
        Self {
            initial: Duration::ZERO,
            factor: 2.0,
            min_delay: Duration::from_millis(100),
            max_delay: Some(Duration::from_secs(5)),
            jitter: Duration::ZERO,
            max_tries: 10,
        }
    }
}

impl RetryConfig {
    pub fn delay_fn(&self) -> Result<DelayFn, Error> {
        let mut fns = vec![try_exponential(self.factor)?];
        if !self.jitter.is_zero() {
            fns.push(randomize(self.jitter));
        }
        fns.push(match self.max_delay {
            Some(max) => try_bounded(self.min_delay, max)?,
            None => bounded_min(self.min_delay),
        });
        Ok(delay(fns))
    }

    pub fn notifier(&self) -> Result<Notifier, Error> {
        Ok(Notifier::new(self.initial, [self.delay_fn()?]))
    }

    pub fn build(&self) -> Result<(MaxTries, Exhausted), Error> {
        Ok(MaxTries::new(self.max_tries, self.notifier()?))
    }
}
