//! Timer backend for the enabled runtime. tokio wins when both are enabled.

use std::{future::Future, pin::Pin};

#[cfg(feature = "tokio")]
pub use tokio::time::Instant;

#[cfg(all(feature = "async-std", not(feature = "tokio")))]
pub use std::time::Instant;

pub(crate) type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

pub(crate) fn now() -> Instant {
    Instant::now()
}

#[cfg(feature = "tokio")]
pub(crate) fn sleep_until(deadline: Instant) -> Sleep {
    Box::pin(tokio::time::sleep_until(deadline))
}

#[cfg(all(feature = "async-std", not(feature = "tokio")))]
pub(crate) fn sleep_until(deadline: Instant) -> Sleep {
    let remaining = deadline.saturating_duration_since(Instant::now());
    Box::pin(async_std::task::sleep(remaining))
}
