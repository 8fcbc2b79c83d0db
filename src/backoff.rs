//! Delay functions and the combinators that build them.
//!
//! A [`DelayFn`] maps the previous retry delay to the next one. Successive
//! delays are computed iteratively:
//!
//! ```text
//! d1 = f(d0)
//! d2 = f(d1)
//! d3 = f(d2)
//! ...
//! ```

use std::{fmt, sync::Arc, time::Duration};

use crate::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// An iterative function for computing retry delays.
///
/// Cloning is cheap; clones share the same underlying function.
#[derive(Clone)]
pub struct DelayFn(Arc<dyn Fn(Duration) -> Duration + Send + Sync>);

impl DelayFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, delay: Duration) -> Duration {
        (self.0)(delay)
    }

    /// Runs `self` and then `next`. `f.then(g)` is equivalent to `delay([f, g])`.
    pub fn then(self, next: DelayFn) -> DelayFn {
        DelayFn::new(move |d| next.apply(self.apply(d)))
    }

    /// Yields `seed`, `f(seed)`, `f(f(seed))`, ... without end.
    pub fn iterate(&self, seed: Duration) -> Delays {
        Delays {
            f: self.clone(),
            next: seed,
        }
    }
}

impl fmt::Debug for DelayFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DelayFn")
    }
}

/// Infinite iterator returned by [`DelayFn::iterate`].
#[derive(Debug, Clone)]
pub struct Delays {
    f: DelayFn,
    next: Duration,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        self.next = self.f.apply(current);
        Some(current)
    }
}

/// Chains functions together into a new [`DelayFn`]. `delay([f, g, h])(d)` is
/// equivalent to `h(g(f(d)))`.
///
/// Order matters: capping before growing lets the delay escape the cap.
///
/// ```
/// use std::time::Duration;
/// use redelay::{bounded_max, delay, exponential};
///
/// let capped = delay([exponential(2.0), bounded_max(Duration::from_nanos(10))]);
/// let delays: Vec<u128> = capped
///     .iterate(Duration::from_nanos(1))
///     .take(6)
///     .map(|d| d.as_nanos())
///     .collect();
/// assert_eq!(delays, [1, 2, 4, 8, 10, 10]);
/// ```
pub fn delay(fns: impl IntoIterator<Item = DelayFn>) -> DelayFn {
    let fns: Vec<DelayFn> = fns.into_iter().collect();
    DelayFn::new(move |d| fns.iter().fold(d, |d, f| f.apply(d)))
}

/// Ignores its input and always returns `value`.
pub fn constant(value: Duration) -> DelayFn {
    DelayFn::new(move |_| value)
}

/// Multiplies the delay by `scale`, truncating toward the nearest nanosecond
/// below.
///
/// Other than `scale == 2`, the product is computed in `f64`, so delays above
/// 2^53 nanoseconds (about 104 days) lose precision: `exponential(1.0)` is not
/// exactly the identity there.
///
/// # Panics
///
/// If `scale` is negative or not finite, and when applied if the result
/// overflows [`Duration`].
pub fn exponential(scale: f64) -> DelayFn {
    try_exponential(scale).unwrap_or_else(|err| panic!("{err}"))
}

/// Fallible form of [`exponential`].
pub fn try_exponential(scale: f64) -> Result<DelayFn, Error> {
    if !scale.is_finite() {
        return Err(Error::NonFiniteScale(scale));
    }
    if scale < 0.0 {
        return Err(Error::NegativeScale(scale));
    }
    if scale == 0.0 {
        return Ok(constant(Duration::ZERO));
    }
    if scale == 2.0 {
        return Ok(DelayFn::new(|d| {
            d.checked_mul(2)
                .unwrap_or_else(|| panic!("{}", Error::Overflow))
        }));
    }
    Ok(DelayFn::new(move |d| {
        scale_duration(d, scale).unwrap_or_else(|err| panic!("{err}"))
    }))
}

/// Caps the delay at `max`.
pub fn bounded_max(max: Duration) -> DelayFn {
    DelayFn::new(move |d| d.min(max))
}

/// Raises the delay to at least `min`.
pub fn bounded_min(min: Duration) -> DelayFn {
    DelayFn::new(move |d| d.max(min))
}

/// Clamps the delay into `[min, max]`. Equivalent to
/// `delay([bounded_min(min), bounded_max(max)])`.
///
/// # Panics
///
/// If `max < min`.
pub fn bounded(min: Duration, max: Duration) -> DelayFn {
    try_bounded(min, max).unwrap_or_else(|err| panic!("{err}"))
}

/// Fallible form of [`bounded`].
pub fn try_bounded(min: Duration, max: Duration) -> Result<DelayFn, Error> {
    if max < min {
        return Err(Error::InvertedBounds { min, max });
    }
    if max == min {
        return Ok(constant(max));
    }
    Ok(delay([bounded_min(min), bounded_max(max)]))
}

fn scale_duration(d: Duration, scale: f64) -> Result<Duration, Error> {
    // `as` saturates, anything that large is rejected by `from_nanos`
    let nanos = (d.as_nanos() as f64 * scale).trunc() as u128;
    from_nanos(nanos)
}

pub(crate) fn from_nanos(nanos: u128) -> Result<Duration, Error> {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| Error::Overflow)?;
    Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
}
