use core::fmt::{self, Display};

use thiserror::Error;

/// Everything that can go wrong when reducing a producer without a seed value.
///
/// `E` is the `Error` type of the producer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ReduceError<E> {
    /// The producer emitted its final value before emitting a single item, so there was nothing
    /// to seed the accumulator with.
    #[error("must specify an initial value if the producer is empty")]
    NoInitialValue,
    /// The producer emitted an error.
    #[error("failed to reduce a producer, because the producer emitted an error")]
    Producer(E),
}

impl<E> ReduceError<E> {
    /// Returns the error of the producer, if that was the reason for failing.
    pub fn into_producer_error(self) -> Option<E> {
        match self {
            ReduceError::NoInitialValue => None,
            ReduceError::Producer(err) => Some(err),
        }
    }
}

/// Returned by the `flatten` functions when a value can neither produce nor be turned into a
/// producer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum FlattenError {
    /// The value exposes neither the producer protocol nor a way of obtaining a producer.
    #[error("value is neither a producer nor can it be turned into one")]
    NotAProducer,
}

/// The two variants of the producer protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Flavour {
    /// Every step completes immediately.
    Sync,
    /// Every step may suspend.
    Async,
}

impl Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavour::Sync => write!(f, "sync"),
            Flavour::Async => write!(f, "async"),
        }
    }
}

/// Everything that can go wrong when installing a prototype.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum InstallError {
    /// The prototype of this flavour has been installed before, and installation never
    /// overwrites.
    #[error("the {0} producer prototype has already been installed")]
    AlreadyInstalled(Flavour),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_error_messages() {
        let err: ReduceError<()> = ReduceError::NoInitialValue;
        assert_eq!(
            err.to_string(),
            "must specify an initial value if the producer is empty"
        );
        assert_eq!(err.into_producer_error(), None);
        assert_eq!(ReduceError::Producer(7).into_producer_error(), Some(7));
    }

    #[test]
    fn install_error_names_the_flavour() {
        assert_eq!(
            InstallError::AlreadyInstalled(Flavour::Async).to_string(),
            "the async producer prototype has already been installed"
        );
    }
}
