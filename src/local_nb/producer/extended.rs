use core::convert::{AsMut, AsRef};

use either::Either;
use wrapper::Wrapper;

use crate::common::errors::ReduceError;
use crate::local_nb::producer::{FilterItems, FlatMap, Invariant, MapItems, Skip, Take};
use crate::local_nb::{IntoProducer, Producer, ProducerExt};

/// An async producer that carries every helper operation as an inherent method, and whose
/// lazy operations return `Extended` producers again.
#[derive(Debug, Clone)]
pub struct Extended<P>(Invariant<P>);

/// Wraps an async producer into an [`Extended`] producer.
pub fn as_extended<P: Producer>(producer: P) -> Extended<P> {
    Extended(Invariant::new(producer))
}

impl<P: Producer> Extended<P> {
    /// Creates an `Extended` producer from anything that can be turned into an async producer.
    /// Sync collections are bridged.
    ///
    /// Passing an `Extended` producer yields an `Extended` producer around the very same
    /// inner producer.
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
    pub async fn reduce<F>(&mut self, fun: F) -> Result<P::Item, ReduceError<P::Error>>
    where
        F: FnMut(P::Item, P::Item, usize) -> P::Item,
    {
        ProducerExt::reduce(&mut self.0, fun).await
    }

    /// Combines all items into an accumulator that starts out as `init`.
    pub async fn fold<B, F>(&mut self, init: B, fun: F) -> Result<B, P::Error>
    where
        F: FnMut(B, P::Item, usize) -> B,
    {
        ProducerExt::fold(&mut self.0, init, fun).await
    }

    /// Collects all remaining items into a `Vec`.
    pub async fn to_vec(&mut self) -> Result<Vec<P::Item>, P::Error> {
        ProducerExt::to_vec(&mut self.0).await
    }

    /// Calls `fun` on every remaining item.
    pub async fn for_each<F>(&mut self, fun: F) -> Result<(), P::Error>
    where
        F: FnMut(P::Item, usize),
    {
        ProducerExt::for_each(&mut self.0, fun).await
    }

    /// Returns whether `pred` holds for at least one item.
    pub async fn some<F>(&mut self, pred: F) -> Result<bool, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::some(&mut self.0, pred).await
    }

    /// Returns whether `pred` holds for all items.
    pub async fn every<F>(&mut self, pred: F) -> Result<bool, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::every(&mut self.0, pred).await
    }

    /// Returns the first item for which `pred` holds.
    pub async fn find<F>(&mut self, pred: F) -> Result<Option<P::Item>, P::Error>
    where
        F: FnMut(&P::Item, usize) -> bool,
    {
        ProducerExt::find(&mut self.0, pred).await
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

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.produce().await
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.0.stop(fin).await
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.inject(err).await
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
