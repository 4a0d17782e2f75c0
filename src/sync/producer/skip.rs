use either::Either::{self, Left, Right};

use crate::sync::Producer;

/// A `Producer` adaptor that discards a fixed number of items of an inner `Producer` and
/// emits the rest.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd, Debug)]
pub struct Skip<P> {
    inner: P,
    to_skip: usize,
}

impl<P> Skip<P> {
    /// Returns a producer that discards the first `amount` items of the inner producer. The
    /// items are only pulled once the first item of the new producer is requested.
    pub fn new(inner: P, amount: usize) -> Self {
        Skip {
            inner,
            to_skip: amount,
        }
    }

    /// Consumes `self` and returns the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Producer> Producer for Skip<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        while self.to_skip > 0 {
            match self.inner.produce()? {
                Left(_) => self.to_skip -= 1,
                Right(fin) => {
                    self.to_skip = 0;
                    return Ok(Right(fin));
                }
            }
        }

        self.inner.produce()
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

sync_producible_by_identity!(impl<P> Skip<P>);
