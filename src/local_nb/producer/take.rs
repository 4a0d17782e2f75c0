use either::Either::{self, Left, Right};

use crate::local_nb::Producer;

/// A `Producer` adaptor that emits at most a fixed number of items of an inner `Producer`.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd, Debug)]
pub struct Take<P> {
    inner: P,
    remaining: usize,
}

impl<P> Take<P> {
    /// Returns a producer that emits the first `limit` items of the inner producer, and never
    /// asks it for more.
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

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.remaining.checked_sub(1) {
            None => Ok(Right(None)),
            Some(decremented) => {
                self.remaining = decremented;
                match self.inner.produce().await? {
                    Left(item) => Ok(Left(item)),
                    Right(fin) => Ok(Right(Some(fin))),
                }
            }
        }
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.inner.stop(None).await?;
        Ok(fin)
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        // The injected error wins over a failure to clean up.
        let _ = self.inner.stop(None).await;
        Err(err)
    }
}

local_nb_producible_by_identity!(impl<P> Take<P>);
