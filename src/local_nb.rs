//! Producers whose every step may suspend.
//!
//! This module mirrors [`sync`](crate::sync): an async [`Producer`] trait, the async marker
//! [`IntoProducer`], and the [`ProducerExt`] trait with the helper operations. The futures
//! returned by these traits are not `Send`; they are meant for single-threaded executors.
//!
//! Anything that can be turned into a sync producer can be turned into an async one as well,
//! via the [`SyncToLocalNb`](producer::SyncToLocalNb) bridge.

use either::Either::{self, Left, Right};
use tracing::trace;

use crate::common::errors::{FlattenError, ReduceError};
use crate::sync;

pub mod producer;

use producer::{FilterItems, FlatMap, MapItems, Skip, SyncToLocalNb, Take};

/// A `Producer` produces a potentially infinite sequence, one item at a time, and may
/// suspend while doing so.
///
/// The sequence consists of an arbitrary number of values of type `Self::Item`, followed by
/// up to one value of type `Self::Final`. A producer can also signal an error of type
/// `Self::Error` instead of producing an item.
pub trait Producer {
    /// The sequence produced by this producer *starts* with *arbitrarily many* values of this type.
    type Item;
    /// The sequence produced by this producer *ends* with *up to one* value of this type.
    type Final;
    /// The type of errors the producer can emit instead of doing its job.
    type Error;

    /// Attempt to produce the next item, which is either a regular repeated item or the final item.
    ///
    /// #### Invariants
    ///
    /// Must not be called after any function of this trait has returned a final item or an error,
    /// nor after `stop` was called.
    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error>;

    /// Terminate the sequence early, asking the producer to release whatever it holds.
    ///
    /// `fin` is `None` when the caller has no final value to pass along.
    ///
    /// #### Implementation Notes
    ///
    /// The default implementation has nothing to release and resolves to `fin` right away.
    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        Ok(fin)
    }

    /// Inject an error into the producer, which may recover from it by producing further
    /// items, or let it propagate.
    ///
    /// #### Implementation Notes
    ///
    /// The default implementation cannot handle errors and returns `err` when first polled,
    /// without ever suspending.
    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        Err(err)
    }
}

impl<P: Producer + ?Sized> Producer for &mut P {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).produce().await
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        (**self).stop(fin).await
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).inject(err).await
    }
}

impl<P: Producer + ?Sized> Producer for Box<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).produce().await
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        (**self).stop(fin).await
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).inject(err).await
    }
}

impl<L, R> Producer for Either<L, R>
where
    L: Producer,
    R: Producer<Item = L::Item, Final = L::Final, Error = L::Error>,
{
    type Item = L::Item;
    type Final = L::Final;
    type Error = L::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Left(p) => p.produce().await,
            Right(p) => p.produce().await,
        }
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        match self {
            Left(p) => p.stop(fin).await,
            Right(p) => p.stop(fin).await,
        }
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Left(p) => p.inject(err).await,
            Right(p) => p.inject(err).await,
        }
    }
}

/// Conversion into an async [`Producer`].
///
/// Async producers of this crate convert into themselves. Everything that converts into a
/// [`sync::Producer`](crate::sync::Producer) converts into the bridged version of that
/// producer.
pub trait IntoProducer {
    /// The type of the items of the resulting producer.
    type Item;
    /// The final value of the resulting producer.
    type Final;
    /// The error type of the resulting producer.
    type Error;
    /// Which kind of producer this turns into.
    type IntoProducer: Producer<Item = Self::Item, Final = Self::Final, Error = Self::Error>;

    /// Creates a fresh producer from a value.
    fn into_producer(self) -> Self::IntoProducer;
}

local_nb_producible_via_sync!(impl<T> Vec<T>);
local_nb_producible_via_sync!(impl<T> std::collections::VecDeque<T>);
local_nb_producible_via_sync!(impl<T> Option<T>);
local_nb_producible_via_sync!(impl<T> Box<[T]>);
local_nb_producible_via_sync!(impl<'a, T> &'a [T]);
local_nb_producible_via_sync!(impl<A> core::ops::Range<A>);
local_nb_producible_via_sync!(impl<I> sync::producer::IteratorAsProducer<I>);

impl<T, const N: usize> IntoProducer for [T; N] {
    type Item = T;
    type Final = ();
    type Error = core::convert::Infallible;
    type IntoProducer = SyncToLocalNb<sync::producer::IteratorAsProducer<core::array::IntoIter<T, N>>>;

    fn into_producer(self) -> Self::IntoProducer {
        SyncToLocalNb(sync::IntoProducer::into_producer(self))
    }
}

local_nb_producible_by_identity!(impl<L, R> Either<L, R>);

impl<P> ProducerExt for P where P: Producer {}

/// An extension trait for async [`Producer`]s that provides the lazy, chainable helper
/// operations. You never need to implement this trait yourself.
///
/// The closures passed to these operations are synchronous; only pulling from the producers
/// may suspend. The consuming operations borrow the producer and stop pulling as soon as they
/// know their result.
pub trait ProducerExt: Producer {
    /// Returns a producer that passes every item through `fun`.
    fn map<B, F>(self, fun: F) -> MapItems<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item, usize) -> B,
    {
        MapItems::new(self, fun)
    }

    /// Returns a producer that only emits the items for which `pred` returns `true`.
    fn filter<F>(self, pred: F) -> FilterItems<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item, usize) -> bool,
    {
        FilterItems::new(self, pred)
    }

    /// Returns a producer that emits at most the first `limit` items.
    fn take(self, limit: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, limit)
    }

    /// Returns a producer that discards the first `amount` items, then emits the rest.
    fn skip(self, amount: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(self, amount)
    }

    /// Returns a producer that maps every item to a sequence and emits all items of that
    /// sequence before pulling the next item. Sync collections are fine as sequences.
    fn flat_map<S, F>(self, fun: F) -> FlatMap<Self, F, S::IntoProducer>
    where
        Self: Sized,
        F: FnMut(Self::Item, usize) -> S,
        S: IntoProducer,
        Self::Error: From<S::Error>,
    {
        FlatMap::new(self, fun)
    }

    /// Combines all items into one, using the first item as the initial accumulator.
    ///
    /// The counter passed to `fun` counts combination steps, starting at zero.
    async fn reduce<F>(&mut self, mut fun: F) -> Result<Self::Item, ReduceError<Self::Error>>
    where
        F: FnMut(Self::Item, Self::Item, usize) -> Self::Item,
    {
        let mut acc = match self.produce().await.map_err(ReduceError::Producer)? {
            Left(item) => item,
            Right(_) => return Err(ReduceError::NoInitialValue),
        };

        let mut counter = 0;
        loop {
            match self.produce().await.map_err(ReduceError::Producer)? {
                Left(item) => {
                    acc = fun(acc, item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(acc),
            }
        }
    }

    /// Combines all items into an accumulator that starts out as `init`.
    async fn fold<B, F>(&mut self, init: B, mut fun: F) -> Result<B, Self::Error>
    where
        F: FnMut(B, Self::Item, usize) -> B,
    {
        let mut acc = init;
        let mut counter = 0;
        loop {
            match self.produce().await? {
                Left(item) => {
                    acc = fun(acc, item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(acc),
            }
        }
    }

    /// Collects all remaining items into a `Vec`.
    async fn to_vec(&mut self) -> Result<Vec<Self::Item>, Self::Error> {
        let mut items = Vec::new();
        loop {
            match self.produce().await? {
                Left(item) => items.push(item),
                Right(_) => return Ok(items),
            }
        }
    }

    /// Calls `fun` on every remaining item.
    async fn for_each<F>(&mut self, mut fun: F) -> Result<(), Self::Error>
    where
        F: FnMut(Self::Item, usize),
    {
        let mut counter = 0;
        loop {
            match self.produce().await? {
                Left(item) => {
                    fun(item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(()),
            }
        }
    }

    /// Returns whether `pred` holds for at least one item.
    async fn some<F>(&mut self, mut pred: F) -> Result<bool, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce().await? {
                Left(item) => {
                    if pred(&item, counter) {
                        return Ok(true);
                    }
                    counter += 1;
                }
                Right(_) => return Ok(false),
            }
        }
    }

    /// Returns whether `pred` holds for all items.
    async fn every<F>(&mut self, mut pred: F) -> Result<bool, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce().await? {
                Left(item) => {
                    if !pred(&item, counter) {
                        return Ok(false);
                    }
                    counter += 1;
                }
                Right(_) => return Ok(true),
            }
        }
    }

    /// Returns the first item for which `pred` holds.
    async fn find<F>(&mut self, mut pred: F) -> Result<Option<Self::Item>, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce().await? {
                Left(item) => {
                    if pred(&item, counter) {
                        return Ok(Some(item));
                    }
                    counter += 1;
                }
                Right(_) => return Ok(None),
            }
        }
    }
}

/// A value whose producing capabilities were determined at the boundary, for use in an async
/// context.
///
/// Construct the first variant that applies. A value that knows how to create an async
/// producer is `AsyncProducible`, even if it could create a sync producer or is a producer
/// itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flattenable<P, A, S> {
    /// Knows how to create an async producer.
    AsyncProducible(A),
    /// Knows how to create a sync producer.
    SyncProducible(S),
    /// Is an async producer itself.
    Producer(P),
    /// None of the above.
    Opaque,
}

/// The async producer obtained from a [`Flattenable`].
#[derive(Debug)]
pub enum Flattened<A, P, S> {
    /// Created by an async-producible value.
    Async(A),
    /// The value itself.
    Producer(P),
    /// Created by a sync-producible value, and bridged.
    Bridged(SyncToLocalNb<S>),
}

impl<A, P, S> Producer for Flattened<A, P, S>
where
    A: Producer,
    P: Producer<Item = A::Item, Final = A::Final, Error = A::Error>,
    S: sync::Producer<Item = A::Item, Final = A::Final, Error = A::Error>,
{
    type Item = A::Item;
    type Final = A::Final;
    type Error = A::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Flattened::Async(p) => p.produce().await,
            Flattened::Producer(p) => p.produce().await,
            Flattened::Bridged(p) => p.produce().await,
        }
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        match self {
            Flattened::Async(p) => p.stop(fin).await,
            Flattened::Producer(p) => p.stop(fin).await,
            Flattened::Bridged(p) => p.stop(fin).await,
        }
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Flattened::Async(p) => p.inject(err).await,
            Flattened::Producer(p) => p.inject(err).await,
            Flattened::Bridged(p) => p.inject(err).await,
        }
    }
}

local_nb_producible_by_identity!(impl<A, P, S> Flattened<A, P, S>);

/// Turns a [`Flattenable`] into an async producer, bridging sync producers where needed.
///
/// ```
/// use ufotofu_helpers::local_nb::{flatten, Flattenable, ProducerExt};
/// use ufotofu_helpers::local_nb::producer::SyncToLocalNb;
/// use ufotofu_helpers::sync::producer::IteratorAsProducer;
///
/// type Bridged = SyncToLocalNb<IteratorAsProducer<std::vec::IntoIter<&'static str>>>;
///
/// let value: Flattenable<Bridged, Vec<&str>, _> = Flattenable::SyncProducible(vec!["x", "y"]);
/// let mut p = flatten(value).unwrap();
/// assert_eq!(smol::block_on(p.to_vec()), Ok(vec!["x", "y"]));
/// ```
pub fn flatten<P, A, S>(
    value: Flattenable<P, A, S>,
) -> Result<Flattened<A::IntoProducer, P, S::IntoProducer>, FlattenError>
where
    P: Producer,
    A: IntoProducer<Item = P::Item, Final = P::Final, Error = P::Error>,
    S: sync::IntoProducer<Item = P::Item, Final = P::Final, Error = P::Error>,
{
    match value {
        Flattenable::AsyncProducible(a) => {
            trace!(path = "async", "flattened an async value");
            Ok(Flattened::Async(a.into_producer()))
        }
        Flattenable::SyncProducible(s) => {
            trace!(path = "bridged", "flattened an async value");
            Ok(Flattened::Bridged(SyncToLocalNb(s.into_producer())))
        }
        Flattenable::Producer(p) => {
            trace!(path = "producer", "flattened an async value");
            Ok(Flattened::Producer(p))
        }
        Flattenable::Opaque => Err(FlattenError::NotAProducer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::convert::Infallible;

    use crate::common::producer::TestProducer;
    use crate::common::TestYielder;
    use crate::sync::producer::IteratorAsProducer;

    fn create_producer() -> TestProducer<&'static str, (), Infallible> {
        TestProducer::with_yielder(
            vec!["a", "b", "c", "d"],
            Ok(()),
            TestYielder::new(vec![true, false, true].into_boxed_slice()),
        )
    }

    fn repeat(x: &'static str, times: usize) -> Vec<&'static str> {
        vec![x; times]
    }

    #[test]
    fn maps() {
        smol::block_on(async {
            assert_eq!(
                create_producer().map(|x, _| x.to_uppercase()).to_vec().await,
                Ok(vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string()
                ])
            );
        });
    }

    #[test]
    fn filters_takes_skips() {
        smol::block_on(async {
            assert_eq!(
                create_producer().filter(|x, _| *x <= "b").to_vec().await,
                Ok(vec!["a", "b"])
            );
            assert_eq!(create_producer().take(1).to_vec().await, Ok(vec!["a"]));
            assert_eq!(
                create_producer().skip(1).to_vec().await,
                Ok(vec!["b", "c", "d"])
            );
        });
    }

    #[test]
    fn flat_maps_sync_sequences() {
        smol::block_on(async {
            assert_eq!(
                create_producer()
                    .flat_map(|x, i| repeat(x, i))
                    .to_vec()
                    .await,
                Ok(vec!["b", "c", "c", "d", "d", "d"])
            );
        });
    }

    #[test]
    fn flat_maps_async_sequences() {
        smol::block_on(async {
            let flat = create_producer().flat_map(|x, _| {
                TestProducer::<_, (), Infallible>::with_yielder(
                    vec![x, x],
                    Ok(()),
                    TestYielder::new(vec![true].into_boxed_slice()),
                )
            });
            assert_eq!(
                flat.skip(5).to_vec().await,
                Ok(vec!["c", "d", "d"])
            );
        });
    }

    #[test]
    fn reduces_and_folds() {
        smol::block_on(async {
            assert_eq!(
                create_producer()
                    .map(|x, _| x.to_string())
                    .reduce(|acc, x, _| acc + &x)
                    .await,
                Ok("abcd".to_string())
            );
            assert_eq!(
                create_producer()
                    .fold(">".to_string(), |acc, x, _| acc + x)
                    .await,
                Ok(">abcd".to_string())
            );

            let mut empty = TestProducer::<u8, (), ()>::new(vec![], Ok(()));
            assert_eq!(
                empty.reduce(|a, b, _| a + b).await,
                Err(ReduceError::NoInitialValue)
            );
        });
    }

    #[test]
    fn some_every_find_for_each() {
        smol::block_on(async {
            assert_eq!(create_producer().some(|x, _| *x == "c").await, Ok(true));
            assert_eq!(create_producer().every(|x, _| *x == "c").await, Ok(false));
            assert_eq!(
                create_producer().find(|x, _| *x > "a").await,
                Ok(Some("b"))
            );

            let mut seen = Vec::new();
            assert_eq!(
                create_producer().for_each(|x, i| seen.push((i, x))).await,
                Ok(())
            );
            assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c"), (3, "d")]);
        });
    }

    #[test]
    fn take_never_pulls_beyond_the_limit() {
        smol::block_on(async {
            let mut p = create_producer();
            assert_eq!((&mut p).take(2).to_vec().await, Ok(vec!["a", "b"]));
            assert_eq!(p.pulls(), 2);

            let mut p = create_producer();
            assert_eq!((&mut p).take(0).to_vec().await, Ok(vec![]));
            assert_eq!(p.pulls(), 0);
        });
    }

    #[test]
    fn flattens_sync_producibles_into_bridged_producers() {
        type Bridged = SyncToLocalNb<IteratorAsProducer<std::vec::IntoIter<&'static str>>>;

        let value: Flattenable<Bridged, Vec<&str>, _> =
            Flattenable::SyncProducible(["x", "y"].to_vec());
        let mut p = flatten(value).unwrap();
        assert!(matches!(p, Flattened::Bridged(_)));
        assert_eq!(smol::block_on(p.to_vec()), Ok(vec!["x", "y"]));
    }

    #[test]
    fn flattens_async_producibles_and_producers() {
        type Plain = TestProducer<u8, (), Infallible>;

        let value: Flattenable<Plain, Plain, Vec<u8>> =
            Flattenable::AsyncProducible(TestProducer::new(vec![1], Ok(())));
        let mut p = flatten(value).unwrap();
        assert!(matches!(p, Flattened::Async(_)));
        assert_eq!(smol::block_on(p.to_vec()), Ok(vec![1]));

        let value: Flattenable<Plain, Plain, Vec<u8>> =
            Flattenable::Producer(TestProducer::new(vec![2], Ok(())));
        let mut p = flatten(value).unwrap();
        assert!(matches!(p, Flattened::Producer(_)));
        assert_eq!(smol::block_on(p.to_vec()), Ok(vec![2]));

        let value: Flattenable<Plain, Plain, Vec<u8>> = Flattenable::Opaque;
        assert_eq!(flatten(value).err().map(|e| e.to_string()), Some("value is neither a producer nor can it be turned into one".to_string()));
    }

    #[test]
    fn flattened_producers_forward_stop_and_inject() {
        type Plain = TestProducer<u8, u8, &'static str>;

        smol::block_on(async {
            let mut p: Flattened<Plain, Plain, Plain> =
                Flattened::Async(TestProducer::new(vec![1], Ok(0)));
            assert_eq!(p.stop(Some(4)).await, Ok(Some(4)));
            assert!(matches!(&p, Flattened::Async(t) if t.last_stop() == Some(Some(4))));

            let mut p: Flattened<Plain, Plain, Plain> =
                Flattened::Producer(TestProducer::new(vec![1], Ok(0)));
            assert_eq!(p.stop(None).await, Ok(None));
            assert!(matches!(&p, Flattened::Producer(t) if t.last_stop() == Some(None)));

            let mut p: Flattened<Plain, Plain, Plain> =
                Flattened::Bridged(SyncToLocalNb(TestProducer::new(vec![1], Ok(0))));
            assert_eq!(p.stop(Some(6)).await, Ok(Some(6)));
            assert!(
                matches!(&p, Flattened::Bridged(b) if b.as_ref().last_stop() == Some(Some(6)))
            );

            for mut p in [
                Flattened::<Plain, Plain, Plain>::Async(TestProducer::new(vec![1], Ok(0))),
                Flattened::Producer(TestProducer::new(vec![1], Ok(0))),
                Flattened::Bridged(SyncToLocalNb(TestProducer::new(vec![1], Ok(0)))),
            ] {
                assert_eq!(p.inject("thrown").await, Err("thrown"));
            }
        });
    }

    #[test]
    fn collections_convert_via_the_bridge() {
        smol::block_on(async {
            assert_eq!(["x", "y"].into_producer().to_vec().await, Ok(vec!["x", "y"]));
            assert_eq!((1..4).into_producer().fold(0, |a, x, _| a + x).await, Ok(6));
        });
    }
}
