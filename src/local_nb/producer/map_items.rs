use either::Either::{self, Left, Right};

use crate::local_nb::Producer;

/// A `Producer` adaptor that maps the items emitted by an inner `Producer` with a function.
///
/// The function receives the item and the number of items mapped before it.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd)]
pub struct MapItems<P, F> {
    inner: P,
    fun: F,
    counter: usize,
}

impl<P: core::fmt::Debug, F> core::fmt::Debug for MapItems<P, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MapItems")
            .field("inner", &self.inner)
            .field("counter", &self.counter)
            .finish()
    }
}

impl<P, F> MapItems<P, F> {
    /// Returns a producer that behaves like the wrapped producer except it passes all emitted items through a function.
    pub fn new(inner: P, fun: F) -> Self {
        MapItems {
            inner,
            fun,
            counter: 0,
        }
    }

    /// Consumes `self` and returns the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<B, P, F> Producer for MapItems<P, F>
where
    P: Producer,
    F: FnMut(P::Item, usize) -> B,
{
    type Item = B;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.inner.produce().await? {
            Left(item) => {
                let mapped = (self.fun)(item, self.counter);
                self.counter += 1;
                Ok(Left(mapped))
            }
            Right(fin) => Ok(Right(fin)),
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

local_nb_producible_by_identity!(impl<P, F> MapItems<P, F>);
