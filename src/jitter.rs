use std::time::Duration;

use rand::Rng;

use crate::{backoff::from_nanos, DelayFn};

/// Additive jitter: the returned function maps `d` to a random duration
/// uniformly distributed in
///
/// ```text
/// [d - plusminus, d + plusminus]
/// ```
///
/// at nanosecond granularity. A fresh offset is drawn on every call. The lower
/// edge saturates at zero since a delay cannot be negative.
///
/// # Panics
///
/// When applied, if `d + plusminus` overflows [`Duration`].
pub fn randomize(plusminus: Duration) -> DelayFn {
    let spread = plusminus.as_nanos();
    DelayFn::new(move |d| {
        if spread == 0 {
            return d;
        }
        let offset = rand::thread_rng().gen_range(0..=2 * spread);
        let shifted = (d.as_nanos() + offset).saturating_sub(spread);
        from_nanos(shifted).unwrap_or_else(|err| panic!("{err}"))
    })
}
