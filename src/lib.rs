#![allow(async_fn_in_trait)]

//! # ufotofu_helpers
//!
//! Lazy, chainable helper operations for producers.
//!
//! A producer emits a sequence of items, optionally followed by a final value, one item per call.
//! This crate provides two flavours: [`sync::Producer`] answers every call immediately,
//! [`local_nb::Producer`] may suspend on every call. Both come with the same operations:
//!
//! - lazy operations returning new producers: `map`, `filter`, `take`, `skip`, `flat_map`;
//! - consuming operations: `reduce`, `fold`, `to_vec`, `for_each`, `some`, `every`, `find`;
//! - `to_async`, which turns a sync producer into an async one.
//!
//! The operations are available on every producer through the [`sync::ProducerExt`] and
//! [`local_nb::ProducerExt`] traits, and as inherent methods on the `Extended` producers.
//!
//! ```
//! use ufotofu_helpers::prelude::*;
//!
//! let mut p = vec!["a", "b", "c", "d"]
//!     .into_producer()
//!     .flat_map(|x, i| vec![x; i]);
//! assert_eq!(p.to_vec(), Ok(vec!["b", "c", "c", "d", "d", "d"]));
//! ```
//!
//! ## Normalizing values
//!
//! Whether some value is a producer, or merely knows how to create one, is settled by the
//! [`IntoProducer`](sync::IntoProducer) traits at compile time. Where that knowledge is only
//! available at runtime, [`sync::flatten`] and [`local_nb::flatten`] resolve a
//! [`Flattenable`](sync::Flattenable) description into a producer; the async variant bridges
//! sync producers where necessary.
//!
//! ## Ending early
//!
//! Producers can be stopped before they are exhausted, and can be handed errors to react to.
//! Adaptors pass a `stop` on to the producer they wrap. Producers that hold nothing simply
//! rely on the default implementations.
//!
//! ## Feature flags
//!
//! - `std` (default): the process-wide operation registry in [`install`].
//! - `dev`: the [`TestProducer`](common::producer::TestProducer) and
//!   [`TestYielder`](common::TestYielder) development helpers, for fuzzing.

#[macro_use]
mod macros;

#[cfg(not(feature = "dev"))]
mod common;
#[cfg(feature = "dev")]
pub mod common;

#[cfg(feature = "std")]
pub mod install;
pub mod local_nb;
pub mod sync;

pub use common::errors::{FlattenError, Flavour, InstallError, ReduceError};

/// The traits and types needed to work with sync producers.
///
/// The async traits share their names with the sync ones, and method calls would become
/// ambiguous if both were in scope. Import them from [`local_nb`] instead.
pub mod prelude {
    pub use core::convert::Infallible;

    pub use either::Either::{self, Left, Right};

    pub use crate::sync::producer::{as_extended, Extended};
    pub use crate::sync::{IntoProducer, Producer, ProducerExt};
    pub use crate::{FlattenError, ReduceError};
}
