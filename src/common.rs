pub mod errors;

#[cfg(any(test, feature = "dev"))]
pub mod chain;

#[cfg(any(test, feature = "dev"))]
pub mod producer;

#[cfg(any(test, feature = "dev"))]
mod test_yielder;

#[cfg(any(test, feature = "dev"))]
pub use test_yielder::TestYielder;
