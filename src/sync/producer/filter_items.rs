use either::Either::{self, Left, Right};

use crate::sync::Producer;

/// A `Producer` adaptor that only emits the items of an inner `Producer` that satisfy a
/// predicate.
///
/// The predicate receives the item and the number of items the inner producer emitted before
/// it, whether they passed or not.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd)]
pub struct FilterItems<P, F> {
    inner: P,
    pred: F,
    counter: usize,
}

impl<P: core::fmt::Debug, F> core::fmt::Debug for FilterItems<P, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilterItems")
            .field("inner", &self.inner)
            .field("counter", &self.counter)
            .finish()
    }
}

impl<P, F> FilterItems<P, F> {
    /// Returns a producer that skips all items of the wrapped producer for which `pred` returns `false`.
    pub fn new(inner: P, pred: F) -> Self {
        FilterItems {
            inner,
            pred,
            counter: 0,
        }
    }

    /// Consumes `self` and returns the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P, F> Producer for FilterItems<P, F>
where
    P: Producer,
    F: FnMut(&P::Item, usize) -> bool,
{
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        loop {
            match self.inner.produce()? {
                Left(item) => {
                    let keep = (self.pred)(&item, self.counter);
                    self.counter += 1;
                    if keep {
                        return Ok(Left(item));
                    }
                }
                Right(fin) => return Ok(Right(fin)),
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

sync_producible_by_identity!(impl<P, F> FilterItems<P, F>);
