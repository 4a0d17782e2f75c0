use core::convert::Infallible;
use core::iter::Cloned;
use core::ops::Range;
use std::collections::VecDeque;

use either::Either::{self, Left, Right};

use crate::sync::{IntoProducer, Producer};

/// Treat an [`Iterator`] as a [`Producer`](crate::sync::Producer).
///
/// Stopping the producer drops the iterator, which releases whatever the iterator holds.
/// Afterwards, the producer only ever emits its final value.
#[derive(Debug, Clone)]
pub struct IteratorAsProducer<I> {
    iter: Option<I>,
}

impl<I: Iterator> IteratorAsProducer<I> {
    /// Wraps anything that can be iterated over.
    ///
    /// ```
    /// use ufotofu_helpers::sync::{Producer, producer::IteratorAsProducer};
    /// use either::Either::*;
    ///
    /// let mut p = IteratorAsProducer::new("ab".chars());
    /// assert_eq!(p.produce(), Ok(Left('a')));
    /// assert_eq!(p.stop(None), Ok(None));
    /// assert_eq!(p.produce(), Ok(Right(())));
    /// ```
    pub fn new<T: IntoIterator<IntoIter = I>>(iter: T) -> Self {
        IteratorAsProducer {
            iter: Some(iter.into_iter()),
        }
    }

    /// Returns the wrapped iterator, unless the producer has been stopped.
    pub fn into_inner(self) -> Option<I> {
        self.iter
    }
}

impl<I: Iterator> Producer for IteratorAsProducer<I> {
    type Item = I::Item;
    type Final = ();
    type Error = Infallible;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.iter.as_mut().and_then(Iterator::next) {
            Some(item) => Ok(Left(item)),
            None => {
                self.iter = None;
                Ok(Right(()))
            }
        }
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.iter = None;
        Ok(fin)
    }
}

sync_producible_by_identity!(impl<I> IteratorAsProducer<I>);

// Std collections and ranges convert into producers of their items.
macro_rules! producible_by_iteration {
    (impl<$($g:tt),*> $t:ty => $iter:ty) => {
        impl<$($g),*> IntoProducer for $t {
            type Item = <$iter as Iterator>::Item;
            type Final = ();
            type Error = Infallible;
            type IntoProducer = IteratorAsProducer<$iter>;

            fn into_producer(self) -> Self::IntoProducer {
                IteratorAsProducer::new(self)
            }
        }
    };
}

producible_by_iteration!(impl<T> Vec<T> => std::vec::IntoIter<T>);
producible_by_iteration!(impl<T> VecDeque<T> => std::collections::vec_deque::IntoIter<T>);
producible_by_iteration!(impl<T> Option<T> => core::option::IntoIter<T>);

impl<T, const N: usize> IntoProducer for [T; N] {
    type Item = T;
    type Final = ();
    type Error = Infallible;
    type IntoProducer = IteratorAsProducer<core::array::IntoIter<T, N>>;

    fn into_producer(self) -> Self::IntoProducer {
        IteratorAsProducer::new(self)
    }
}

impl<T> IntoProducer for Box<[T]> {
    type Item = T;
    type Final = ();
    type Error = Infallible;
    type IntoProducer = IteratorAsProducer<std::vec::IntoIter<T>>;

    fn into_producer(self) -> Self::IntoProducer {
        IteratorAsProducer::new(self.into_vec())
    }
}

impl<'a, T: Clone> IntoProducer for &'a [T] {
    type Item = T;
    type Final = ();
    type Error = Infallible;
    type IntoProducer = IteratorAsProducer<Cloned<core::slice::Iter<'a, T>>>;

    fn into_producer(self) -> Self::IntoProducer {
        IteratorAsProducer::new(self.iter().cloned())
    }
}

impl<A> IntoProducer for Range<A>
where
    Range<A>: Iterator,
{
    type Item = <Range<A> as Iterator>::Item;
    type Final = ();
    type Error = Infallible;
    type IntoProducer = IteratorAsProducer<Range<A>>;

    fn into_producer(self) -> Self::IntoProducer {
        IteratorAsProducer::new(self)
    }
}
