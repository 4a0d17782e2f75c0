use either::Either::{self, Left, Right};

use crate::local_nb::Producer;

/// A `Producer` adaptor that discards a fixed number of items of an inner `Producer` and
/// emits the rest.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd, Debug)]
pub struct Skip<P> {
    inner: P,
    to_skip: usize,
}

impl<P> Skip<P> {
    /// Returns a producer that discards the first `amount` items of the inner producer.
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

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        while self.to_skip > 0 {
            match self.inner.produce().await? {
                Left(_) => self.to_skip -= 1,
                Right(fin) => {
                    self.to_skip = 0;
                    return Ok(Right(fin));
                }
            }
        }

        self.inner.produce().await
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

local_nb_producible_by_identity!(impl<P> Skip<P>);

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::producer::TestProducer;
    use crate::common::TestYielder;
    use crate::local_nb::ProducerExt;

    fn yielding(items: Vec<u8>, fin: u8) -> TestProducer<u8, u8, &'static str> {
        TestProducer::with_yielder(
            items,
            Ok(fin),
            TestYielder::new(vec![true, false].into_boxed_slice()),
        )
    }

    #[test]
    fn skips_then_forwards() {
        smol::block_on(async {
            let mut p = yielding(vec![1, 2, 3, 4], 9).skip(2);
            assert_eq!(p.produce().await, Ok(Left(3)));
            assert_eq!(p.produce().await, Ok(Left(4)));
            assert_eq!(p.produce().await, Ok(Right(9)));
        });
    }

    #[test]
    fn skipping_more_than_available_yields_the_final_value() {
        smol::block_on(async {
            let mut source = yielding(vec![1, 2], 7);
            assert_eq!((&mut source).skip(10).produce().await, Ok(Right(7)));
            assert_eq!(source.pulls(), 3);
        });
    }

    #[test]
    fn skipping_is_lazy() {
        let mut source = yielding(vec![1, 2, 3], 0);
        drop((&mut source).skip(2));
        assert_eq!(source.pulls(), 0);
    }

    #[test]
    fn stop_and_inject_reach_the_source() {
        smol::block_on(async {
            let mut source = yielding(vec![1, 2, 3], 0);
            let mut skipped = (&mut source).skip(1);
            assert_eq!(skipped.stop(Some(5)).await, Ok(Some(5)));
            drop(skipped);
            assert_eq!(source.stops(), 1);
            assert_eq!(source.last_stop(), Some(None));

            let mut source = yielding(vec![1, 2, 3], 0).with_failing_stop("stuck");
            let mut skipped = (&mut source).skip(1);
            assert_eq!(skipped.inject("bad").await, Err("bad"));
            drop(skipped);
            assert_eq!(source.stops(), 1);
            assert_eq!(source.pulls(), 0);
        });
    }
}
