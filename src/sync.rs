//! Producers whose every step completes immediately.
//!
//! The [`Producer`] trait is the minimal protocol: a single [`produce`](Producer::produce) method,
//! plus the optional [`stop`](Producer::stop) and [`inject`](Producer::inject) capabilities. The
//! [`ProducerExt`] trait layers the lazy, chainable helper operations on top of every producer,
//! and [`IntoProducer`] is implemented by everything that knows how to create a producer.

use either::Either::{self, Left, Right};
use tracing::trace;

use crate::common::errors::{FlattenError, ReduceError};

pub mod producer;

use producer::{FilterItems, FlatMap, MapItems, Skip, Take};

use crate::local_nb::producer::SyncToLocalNb;

/// A `Producer` produces a potentially infinite sequence, one item at a time.
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
    /// After this function returns the final item, or after it returns an error, no further
    /// functions of this trait may be invoked, except for `stop`.
    ///
    /// #### Invariants
    ///
    /// Must not be called after any function of this trait has returned a final item or an error,
    /// nor after `stop` was called.
    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error>;

    /// Terminate the sequence early, asking the producer to release whatever it holds.
    ///
    /// `fin` is `None` when the caller has no final value to pass along. Implementations that
    /// forward this call must preserve that distinction.
    ///
    /// #### Implementation Notes
    ///
    /// The default implementation has nothing to release and simply hands `fin` back. Only
    /// provide your own implementation if the producer holds resources.
    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        Ok(fin)
    }

    /// Inject an error into the producer, which may recover from it by producing further
    /// items, or let it propagate.
    ///
    /// #### Implementation Notes
    ///
    /// The default implementation cannot handle errors and returns `err` right back.
    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        Err(err)
    }
}

impl<P: Producer + ?Sized> Producer for &mut P {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).produce()
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        (**self).stop(fin)
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).inject(err)
    }
}

impl<P: Producer + ?Sized> Producer for Box<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).produce()
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        (**self).stop(fin)
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        (**self).inject(err)
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

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Left(p) => p.produce(),
            Right(p) => p.produce(),
        }
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        match self {
            Left(p) => p.stop(fin),
            Right(p) => p.stop(fin),
        }
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self {
            Left(p) => p.inject(err),
            Right(p) => p.inject(err),
        }
    }
}

sync_producible_by_identity!(impl<L, R> Either<L, R>);

/// Conversion into a [`Producer`].
///
/// Every producer in this crate converts into itself. Collections convert into a producer of
/// their items, and an [`Extended`](producer::Extended) converts into the producer it wraps.
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

impl<P> ProducerExt for P where P: Producer {}

/// An extension trait for [`Producer`] that provides the lazy, chainable helper operations.
/// You never need to implement this trait yourself, it merely adds methods with default
/// implementations to existing producers.
///
/// The lazy operations take ownership of the producer. The consuming operations only borrow it,
/// and stop pulling as soon as they know their result; whatever remains stays in the producer.
///
/// Every closure receives a counter next to the item, starting at zero.
pub trait ProducerExt: Producer {
    /// Returns a producer that passes every item through `fun`.
    ///
    /// ```
    /// use ufotofu_helpers::sync::{IntoProducer, ProducerExt};
    ///
    /// let mut p = ["a", "b"].into_producer().map(|x, i| format!("{x}{i}"));
    /// assert_eq!(p.to_vec(), Ok(vec!["a0".to_string(), "b1".to_string()]));
    /// ```
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
    /// sequence before pulling the next item.
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
    /// The counter passed to `fun` counts combination steps, so it is `0` when combining the
    /// first and the second item.
    fn reduce<F>(&mut self, mut fun: F) -> Result<Self::Item, ReduceError<Self::Error>>
    where
        F: FnMut(Self::Item, Self::Item, usize) -> Self::Item,
    {
        let mut acc = match self.produce().map_err(ReduceError::Producer)? {
            Left(item) => item,
            Right(_) => return Err(ReduceError::NoInitialValue),
        };

        let mut counter = 0;
        loop {
            match self.produce().map_err(ReduceError::Producer)? {
                Left(item) => {
                    acc = fun(acc, item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(acc),
            }
        }
    }

    /// Combines all items into an accumulator that starts out as `init`.
    fn fold<B, F>(&mut self, init: B, mut fun: F) -> Result<B, Self::Error>
    where
        F: FnMut(B, Self::Item, usize) -> B,
    {
        let mut acc = init;
        let mut counter = 0;
        loop {
            match self.produce()? {
                Left(item) => {
                    acc = fun(acc, item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(acc),
            }
        }
    }

    /// Collects all remaining items into a `Vec`.
    fn to_vec(&mut self) -> Result<Vec<Self::Item>, Self::Error> {
        let mut items = Vec::new();
        loop {
            match self.produce()? {
                Left(item) => items.push(item),
                Right(_) => return Ok(items),
            }
        }
    }

    /// Calls `fun` on every remaining item.
    fn for_each<F>(&mut self, mut fun: F) -> Result<(), Self::Error>
    where
        F: FnMut(Self::Item, usize),
    {
        let mut counter = 0;
        loop {
            match self.produce()? {
                Left(item) => {
                    fun(item, counter);
                    counter += 1;
                }
                Right(_) => return Ok(()),
            }
        }
    }

    /// Returns whether `pred` holds for at least one item.
    fn some<F>(&mut self, mut pred: F) -> Result<bool, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce()? {
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
    fn every<F>(&mut self, mut pred: F) -> Result<bool, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce()? {
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
    fn find<F>(&mut self, mut pred: F) -> Result<Option<Self::Item>, Self::Error>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        let mut counter = 0;
        loop {
            match self.produce()? {
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

    /// Turns this producer into a [`local_nb::Producer`](crate::local_nb::Producer) which
    /// emits the same items, one step at a time.
    fn to_async(self) -> SyncToLocalNb<Self>
    where
        Self: Sized,
    {
        SyncToLocalNb(self)
    }
}

/// A value whose producing capabilities were determined at the boundary.
///
/// Construct the first variant that applies: a value that can create a fresh producer is
/// `Producible`, even if it happens to be a producer as well.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flattenable<P, S> {
    /// Knows how to create a producer.
    Producible(S),
    /// Is a producer itself.
    Producer(P),
    /// Neither.
    Opaque,
}

/// Turns a [`Flattenable`] into a producer.
///
/// ```
/// use ufotofu_helpers::sync::{flatten, Flattenable, ProducerExt};
/// use ufotofu_helpers::sync::producer::IteratorAsProducer;
///
/// let value: Flattenable<IteratorAsProducer<std::vec::IntoIter<u8>>, _> =
///     Flattenable::Producible(vec![1, 2]);
/// let mut p = flatten(value).unwrap();
/// assert_eq!(p.to_vec(), Ok(vec![1, 2]));
/// ```
pub fn flatten<P, S>(value: Flattenable<P, S>) -> Result<Either<S::IntoProducer, P>, FlattenError>
where
    P: Producer,
    S: IntoProducer<Item = P::Item, Final = P::Final, Error = P::Error>,
{
    match value {
        Flattenable::Producible(s) => {
            trace!(path = "producible", "flattened a sync value");
            Ok(Left(s.into_producer()))
        }
        Flattenable::Producer(p) => {
            trace!(path = "producer", "flattened a sync value");
            Ok(Right(p))
        }
        Flattenable::Opaque => Err(FlattenError::NotAProducer),
    }
}
