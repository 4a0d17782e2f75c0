//! Async producers and adaptors.
//!
//! ## Obtaining Producers
//!
//! Anything implementing [`IntoProducer`](crate::local_nb::IntoProducer) can be turned into a
//! producer. The [`StreamAsProducer`] adaptor lets you use a [`Stream`](futures_lite::Stream)
//! as a producer.
//!
//! ## Adaptors
//!
//! The [SyncToLocalNb] adaptor allows you to use a [`sync::Producer`](crate::sync::Producer) as
//! a [`local_nb::Producer`](crate::local_nb::Producer). [`Extended`] carries the whole operation
//! set as inherent methods. The remaining adaptors are returned by the operations of
//! [`ProducerExt`](crate::local_nb::ProducerExt).
//!
//! ## Development Helpers
//!
//! The [Invariant] adaptor wraps any producer and makes it panic during tests when some client
//! code violates the API contracts imposed by the producer traits. In production builds, the
//! wrapper does nothing and compiles away without any overhead.

mod sync_to_local_nb;

mod extended;
mod filter_items;
mod flat_map;
mod invariant;
mod invariant_noop;
mod map_items;
mod skip;
mod stream_as_producer;
mod take;

pub use sync_to_local_nb::SyncToLocalNb;

pub use extended::{as_extended, Extended};
pub use filter_items::FilterItems;
pub use flat_map::FlatMap;
pub use map_items::MapItems;
pub use skip::Skip;
pub use stream_as_producer::StreamAsProducer;
pub use take::Take;

// During testing we use a wrapper which panics on invariant transgressions.
// The no-op version of the wrapper is used for production code compilation.
#[cfg(test)]
pub use invariant::Invariant;
#[cfg(not(test))]
pub use invariant_noop::Invariant;
