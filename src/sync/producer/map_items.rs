use either::Either::{self, Left, Right};

use crate::sync::Producer;

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

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.inner.produce()? {
            Left(item) => {
                let mapped = (self.fun)(item, self.counter);
                self.counter += 1;
                Ok(Left(mapped))
            }
            Right(fin) => Ok(Right(fin)),
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

sync_producible_by_identity!(impl<P, F> MapItems<P, F>);

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::producer::TestProducer;
    use crate::sync::ProducerExt;

    #[test]
    fn passes_the_index() {
        let p = TestProducer::<_, (), ()>::new(vec![10, 20, 30], Ok(()));
        assert_eq!(p.map(|x, i| x + i).to_vec(), Ok(vec![10, 21, 32]));
    }

    #[test]
    fn is_lazy() {
        let mut calls = 0;
        let mut p = TestProducer::<_, (), ()>::new(vec![1, 2, 3], Ok(()));
        let mut mapped = (&mut p).map(|x, _| {
            calls += 1;
            x
        });
        assert_eq!(mapped.produce(), Ok(Left(1)));
        drop(mapped);
        assert_eq!(calls, 1);
        assert_eq!(p.pulls(), 1);
    }

    #[test]
    fn stop_stops_the_source_without_a_value() {
        let mut p = TestProducer::<u8, u8, ()>::new(vec![1, 2, 3], Ok(9));
        let mut mapped = (&mut p).map(|x, _| x);
        assert_eq!(mapped.produce(), Ok(Left(1)));
        assert_eq!(mapped.stop(Some(4)), Ok(Some(4)));
        drop(mapped);
        assert_eq!(p.stops(), 1);
        assert_eq!(p.last_stop(), Some(None));
    }

    #[test]
    fn inject_stops_the_source_and_rethrows() {
        let mut p = TestProducer::<u8, (), &str>::new(vec![1, 2, 3], Ok(()));
        let mut mapped = (&mut p).map(|x, _| x);
        assert_eq!(mapped.inject("bad"), Err("bad"));
        drop(mapped);
        assert_eq!(p.stops(), 1);
        assert_eq!(p.pulls(), 0);
    }

    #[test]
    fn inject_rethrows_even_if_the_source_fails_to_stop() {
        let mut p =
            TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(())).with_failing_stop("stuck");
        let mut mapped = (&mut p).map(|x, _| x);
        assert_eq!(mapped.inject("bad"), Err("bad"));
        drop(mapped);
        assert_eq!(p.stops(), 1);

        let mut p =
            TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(())).with_failing_stop("stuck");
        assert_eq!((&mut p).map(|x, _| x).stop(None), Err("stuck"));
    }

    #[test]
    fn forwards_source_errors() {
        let p = TestProducer::<u8, (), &str>::new(vec![1], Err("broken"));
        let mut mapped = p.map(|x, _| x * 2);
        assert_eq!(mapped.produce(), Ok(Left(2)));
        assert_eq!(mapped.produce(), Err("broken"));
    }
}
