//! Composable retry timing.
//!
//! `redelay` decides *when* to try again; running the fallible operation and
//! cancelling it stay with the caller.
//!
//! - [`DelayFn`] and its combinators ([`constant`], [`exponential`],
//!   [`bounded_max`], [`bounded_min`], [`bounded`], [`randomize`], [`delay`])
//!   compute each delay from the previous one.
//! - [`Notifier`] turns a seed delay and a [`DelayFn`] into a stream of
//!   [`Ready`] signals, one per [`Notify::retry`] call.
//! - [`MaxTries`] caps any [`Notify`] and fires an [`Exhausted`] signal when the
//!   cap is reached.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! async fn flaky() -> std::io::Result<()> {
//!     Err(std::io::Error::other("uh oh!"))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (mut retry, mut exhausted) = redelay::max_tries(
//!     3,
//!     Some(redelay::Notifier::new(
//!         Duration::ZERO,
//!         [
//!             redelay::exponential(2.0),
//!             redelay::bounded(Duration::from_millis(1), Duration::from_millis(10)),
//!         ],
//!     )),
//! );
//!
//! let mut ready = redelay::Notify::retry(&mut retry);
//! let outcome = loop {
//!     tokio::select! {
//!         _ = &mut exhausted => break Err("max tries"),
//!         _ = &mut ready => match flaky().await {
//!             Ok(()) => break Ok(()),
//!             Err(_) => ready = redelay::Notify::retry(&mut retry),
//!         },
//!     }
//! };
//! assert_eq!(outcome, Err("max tries"));
//! # }
//! ```

#[cfg(not(any(feature = "tokio", feature = "async-std")))]
compile_error!("At least one of 'tokio' or 'async-std' feature must be enabled");

pub mod backoff;
pub mod config;
mod error;
pub mod jitter;
pub mod signal;
pub mod strategy;
pub mod time;

pub use backoff::{
    bounded, bounded_max, bounded_min, constant, delay, exponential, try_bounded,
    try_exponential, DelayFn, Delays,
};
pub use config::RetryConfig;
pub use error::Error;
pub use jitter::randomize;
pub use signal::{Exhausted, Ready};
pub use strategy::{max_tries, MaxTries, Notifier, Notify};
pub use time::Instant;
