use std::time::Duration;

/// Invalid delay parameters, or a delay that no longer fits in a [`Duration`].
///
/// The panicking constructors ([`exponential`](crate::exponential),
/// [`bounded`](crate::bounded)) and delay functions panic with this error's
/// message. The `try_` constructors return it instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("negative scale: {0}")]
    NegativeScale(f64),

    #[error("non-finite scale: {0}")]
    NonFiniteScale(f64),

    #[error("undefined bounds: min {min:?} exceeds max {max:?}")]
    InvertedBounds { min: Duration, max: Duration },

    #[error("delay overflow")]
    Overflow,
}
