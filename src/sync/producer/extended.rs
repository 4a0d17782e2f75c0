use core::convert::{AsMut, AsRef};

use either::Either;
use wrapper::Wrapper;

use crate::common::errors::ReduceError;
use crate::local_nb;
use crate::local_nb::producer::SyncToLocalNb;
use crate::sync::producer::{FilterItems, FlatMap, Invariant, MapItems, Skip, Take};
use crate::sync::{IntoProducer, Producer, ProducerExt};

/// A producer that carries every helper operation as an inherent method, and whose lazy
/// operations return `Extended` producers again.
///
/// This is the handle to use when working with producers declared outside this crate: wrap
/// them with [`as_extended`] or [`Extended::new`], and the whole operation set is available
/// without importing [`ProducerExt`].
///
/// ```
/// use ufotofu_helpers::sync::producer::Extended;
///
/// let mut p = Extended::new(vec![1, 2, 3, 4]).filter(|x, _| x % 2 == 0).map(|x, _| x * 10);
/// assert_eq!(p.to_vec(), Ok(vec![20, 40]));
/// ```
#[derive(Debug, Clone)]
pub struct Extended<P>(Invariant<P>);

/// Wraps a producer into an [`Extended`] producer.
pub fn as_extended<P: Producer>(producer: P) -> Extended<P> {
    Extended(Invariant::new(producer))
}

impl<P: Producer> Extended<P> {
    /// Creates an `Extended` producer from anything that can be turned into a producer.
    ///
    /// Passing an `Extended` producer yields an `Extended` producer around the very same
    /// inner producer, never a doubly wrapped one.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoProducer<IntoProducer = P>,
    {
        as_extended(source.into_producer())
    }

    /// Returns a producer that passes every item through `fun`.
    pub fn map<B, F>(self, fun: F) -> Extended<MapItems<P, F>>
    where
        F: FnMut(P::Item, usize) -> B,
    {
        as_extended(MapItems::new(self.into_inner(), fun))
    }

    /// Returns a producer that only emits the items for which `pred` returns `true`.
    pub fn filter<F>(self, pred: F) -> Extended<FilterItems<P, F>>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        as_extended(FilterItems::new(self.into_inner(), pred))
    }

    /// Returns a producer that emits at most the first `limit` items.
    pub fn take(self, limit: usize) -> Extended<Take<P>> {
        as_extended(Take::new(self.into_inner(), limit))
    }

    /// Returns a producer that discards the first `amount` items, then emits the rest.
    pub fn skip(self, amount: usize) -> Extended<Skip<P>> {
        as_extended(Skip::new(self.into_inner(), amount))
    }

    /// Returns a producer that emits the items of the sub-sequences `fun` maps the items to.
    pub fn flat_map<S, F>(self, fun: F) -> Extended<FlatMap<P, F, S::IntoProducer>>
    where
        F: FnMut(P::Item, usize) -> S,
        S: IntoProducer,
        P::Error: From<S::Error>,
    {
        as_extended(FlatMap::new(self.into_inner(), fun))
    }

    /// Combines all items into one, using the first item as the initial accumulator.
    pub fn reduce<F>(&mut self, fun: F) -> Result<P::Item, ReduceError<P::Error>>
    where
        F: FnMut(P::Item, P::Item, usize) -> P::Item,
    {
        ProducerExt::reduce(&mut self.0, fun)
    }

    /// Combines all items into an accumulator that starts out as `init`.
    pub fn fold<B, F>(&mut self, init: B, fun: F) -> Result<B, P::Error>
    where
        F: FnMut(B, P::Item, usize) -> B,
    {
        ProducerExt::fold(&mut self.0, init, fun)
    }

    /// Collects all remaining items into a `Vec`.
    pub fn to_vec(&mut self) -> Result<Vec<P::Item>, P::Error> {
        ProducerExt::to_vec(&mut self.0)
    }

    /// Calls `fun` on every remaining item.
    pub fn for_each<F>(&mut self, fun: F) -> Result<(), P::Error>
    where
        F: FnMut(P::Item, usize),
    {
        ProducerExt::for_each(&mut self.0, fun)
    }

    /// Returns whether `pred` holds for at least one item.
    pub fn some<F>(&mut self, pred: F) -> Result<bool, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::some(&mut self.0, pred)
    }

    /// Returns whether `pred` holds for all items.
    pub fn every<F>(&mut self, pred: F) -> Result<bool, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::every(&mut self.0, pred)
    }

    /// Returns the first item for which `pred` holds.
    pub fn find<F>(&mut self, pred: F) -> Result<Option<P::Item>, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::find(&mut self.0, pred)
    }

    /// Turns this into an async `Extended` producer emitting the same items.
    pub fn to_async(self) -> local_nb::producer::Extended<SyncToLocalNb<P>> {
        local_nb::producer::as_extended(SyncToLocalNb(self.into_inner()))
    }
}

impl<P> AsRef<P> for Extended<P> {
    fn as_ref(&self) -> &P {
        self.0.as_ref()
    }
}

impl<P> AsMut<P> for Extended<P> {
    fn as_mut(&mut self) -> &mut P {
        self.0.as_mut()
    }
}

impl<P> Wrapper<P> for Extended<P> {
    fn into_inner(self) -> P {
        self.0.into_inner()
    }
}

impl<P: Producer> Producer for Extended<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.produce()
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.0.stop(fin)
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.inject(err)
    }
}

impl<P: Producer> IntoProducer for Extended<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;
    type IntoProducer = P;

    fn into_producer(self) -> Self::IntoProducer {
        self.into_inner()
    }
}

local_nb_producible_via_sync!(impl<P> Extended<P>);
