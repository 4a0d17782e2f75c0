use either::Either::{self, Left, Right};

use crate::sync::Producer;

/// A `Producer` adaptor that emits at most a fixed number of items of an inner `Producer`.
///
/// Once the limit is reached, the inner producer is never asked for another item.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd, Debug)]
pub struct Take<P> {
    inner: P,
    remaining: usize,
}

impl<P> Take<P> {
    /// Returns a producer that emits the first `limit` items of the inner producer.
    ///
    /// ```rust
    /// use ufotofu_helpers::sync::{IntoProducer, Producer};
    /// use ufotofu_helpers::sync::producer::Take;
    /// use either::Either::*;
    ///
    /// let mut p = Take::new(vec![0, 1, 2].into_producer(), 2);
    /// assert_eq!(p.produce(), Ok(Left(0)));
    /// assert_eq!(p.produce(), Ok(Left(1)));
    /// assert_eq!(p.produce(), Ok(Right(None)));
    ///
    /// let mut p = Take::new(vec![0].into_producer(), 4);
    /// assert_eq!(p.produce(), Ok(Left(0)));
    /// assert_eq!(p.produce(), Ok(Right(Some(()))));
    /// ```
    pub fn new(inner: P, limit: usize) -> Self {
        Take {
            inner,
            remaining: limit,
        }
    }

    /// Consumes `self` and returns the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Producer> Producer for Take<P> {
    type Item = P::Item;
    /// `None` if the limit was reached, `Some` if the wrapped producer emitted its final value before the limit was reached.
    type Final = Option<P::Final>;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.remaining.checked_sub(1) {
            None => Ok(Right(None)),
            Some(decremented) => {
                self.remaining = decremented;
                match self.inner.produce()? {
                    Left(item) => Ok(Left(item)),
                    Right(fin) => Ok(Right(Some(fin))),
                }
            }
        }
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.inner.stop(None)?;
        Ok(fin)
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        // The injected error wins over a failure to clean up.
        let _ = self.inner.stop(None);
        Err(err)
    }
}

sync_producible_by_identity!(impl<P> Take<P>);
