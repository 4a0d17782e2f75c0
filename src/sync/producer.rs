mod extended;
mod filter_items;
mod flat_map;
mod invariant;
mod invariant_noop;
mod iterator_as_producer;
mod map_items;
mod skip;
mod take;

pub use extended::{as_extended, Extended};
pub use filter_items::FilterItems;
pub use flat_map::FlatMap;
pub use iterator_as_producer::IteratorAsProducer;
pub use map_items::MapItems;
pub use skip::Skip;
pub use take::Take;

// During testing we use a wrapper which panics on invariant transgressions.
// The no-op version of the wrapper is used for production code compilation.
#[cfg(test)]
pub use invariant::Invariant;
#[cfg(not(test))]
pub use invariant_noop::Invariant;
