use either::Either::{self, Left, Right};

use crate::local_nb::{IntoProducer, Producer};

/// A `Producer` adaptor that maps every item of an inner `Producer` to a sub-sequence and
/// emits the items of all these sub-sequences, in order.
///
/// A sub-sequence is exhausted before the next item of the inner producer is pulled. The
/// final values of the sub-sequences are discarded.
pub struct FlatMap<P, F, S> {
    inner: P,
    fun: F,
    active: Option<S>,
    counter: usize,
}

impl<P: core::fmt::Debug, F, S: core::fmt::Debug> core::fmt::Debug for FlatMap<P, F, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatMap")
            .field("inner", &self.inner)
            .field("active", &self.active)
            .field("counter", &self.counter)
            .finish()
    }
}

impl<P, F, S> FlatMap<P, F, S> {
    /// Returns a producer that emits the items of the sub-sequences `fun` creates from the
    /// items of the wrapped producer.
    pub fn new(inner: P, fun: F) -> Self {
        FlatMap {
            inner,
            fun,
            active: None,
            counter: 0,
        }
    }

    /// Consumes `self` and returns the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P, F, S> FlatMap<P, F, S>
where
    P: Producer,
    S: Producer,
    P::Error: From<S::Error>,
{
    // Stops the active sub-producer and the wrapped producer. The wrapped producer is stopped
    // even if the sub-producer fails to stop; the first error is reported.
    async fn stop_all(&mut self) -> Result<(), P::Error> {
        let sub_result: Result<(), P::Error> = match self.active.take() {
            Some(mut sub) => sub.stop(None).await.map(|_| ()).map_err(From::from),
            None => Ok(()),
        };
        let inner_result = self.inner.stop(None).await.map(|_| ());
        sub_result.and(inner_result)
    }
}

impl<P, F, T, S> Producer for FlatMap<P, F, S>
where
    P: Producer,
    F: FnMut(P::Item, usize) -> T,
    T: IntoProducer<IntoProducer = S>,
    S: Producer,
    P::Error: From<S::Error>,
{
    type Item = S::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        loop {
            if let Some(sub) = self.active.as_mut() {
                match sub.produce().await? {
                    Left(item) => return Ok(Left(item)),
                    Right(_) => self.active = None,
                }
            }

            match self.inner.produce().await? {
                Left(item) => {
                    let sub = (self.fun)(item, self.counter);
                    self.counter += 1;
                    self.active = Some(sub.into_producer());
                }
                Right(fin) => return Ok(Right(fin)),
            }
        }
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.stop_all().await?;
        Ok(fin)
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        // The injected error wins over a failure to clean up.
        let _ = self.stop_all().await;
        Err(err)
    }
}

local_nb_producible_by_identity!(impl<P, F, S> FlatMap<P, F, S>);

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::Cell;

    use crate::common::producer::TestProducer;
    use crate::common::TestYielder;
    use crate::local_nb::ProducerExt;

    #[test]
    fn inject_stops_everything_and_rethrows() {
        smol::block_on(async {
            let mut outer = TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(()));
            let mut flat = (&mut outer).flat_map(|x, _| {
                TestProducer::<u8, (), &str>::with_yielder(
                    vec![x, x, x],
                    Ok(()),
                    TestYielder::new(vec![true].into_boxed_slice()),
                )
            });

            assert_eq!(flat.produce().await, Ok(Left(1)));
            assert_eq!(flat.inject("bad").await, Err("bad"));
            drop(flat);

            assert_eq!(outer.stops(), 1);
            assert_eq!(outer.pulls(), 1);
        });
    }

    struct Sub<'s> {
        items: Vec<u8>,
        stops: &'s Cell<usize>,
        stop_error: Option<&'static str>,
        yielder: TestYielder,
    }

    impl<'s> Sub<'s> {
        fn new(stops: &'s Cell<usize>, stop_error: Option<&'static str>) -> Self {
            Sub {
                items: vec![7, 8, 9],
                stops,
                stop_error,
                yielder: TestYielder::new(vec![true, false].into_boxed_slice()),
            }
        }
    }

    impl Producer for Sub<'_> {
        type Item = u8;
        type Final = ();
        type Error = &'static str;

        async fn produce(&mut self) -> Result<Either<u8, ()>, &'static str> {
            self.yielder.maybe_yield().await;
            if self.items.is_empty() {
                Ok(Right(()))
            } else {
                Ok(Left(self.items.remove(0)))
            }
        }

        async fn stop(&mut self, fin: Option<()>) -> Result<Option<()>, &'static str> {
            self.yielder.maybe_yield().await;
            self.stops.set(self.stops.get() + 1);
            match self.stop_error {
                Some(err) => Err(err),
                None => Ok(fin),
            }
        }
    }

    local_nb_producible_by_identity!(impl<'s> Sub<'s>);

    #[test]
    fn stop_reaches_the_active_sub_producer() {
        smol::block_on(async {
            let stops = Cell::new(0);
            let stops = &stops;
            let mut outer = TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(()));
            let mut flat = (&mut outer).flat_map(move |_, _| Sub::new(stops, None));

            assert_eq!(flat.produce().await, Ok(Left(7)));
            assert_eq!(flat.stop(Some(())).await, Ok(Some(())));
            drop(flat);

            assert_eq!(stops.get(), 1);
            assert_eq!(outer.stops(), 1);
            assert_eq!(outer.last_stop(), Some(None));
        });
    }

    #[test]
    fn failing_sub_stop_still_stops_the_source() {
        smol::block_on(async {
            let stops = Cell::new(0);
            let stops = &stops;
            let mut outer = TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(()));
            let mut flat =
                (&mut outer).flat_map(move |_, _| Sub::new(stops, Some("sub stop failed")));

            assert_eq!(flat.produce().await, Ok(Left(7)));
            assert_eq!(flat.stop(None).await, Err("sub stop failed"));
            drop(flat);

            assert_eq!(stops.get(), 1);
            assert_eq!(outer.stops(), 1);
        });
    }

    #[test]
    fn inject_rethrows_the_injected_error_despite_failing_cleanup() {
        smol::block_on(async {
            let stops = Cell::new(0);
            let stops = &stops;
            let mut outer = TestProducer::<u8, (), &str>::new(vec![1, 2], Ok(()));
            let mut flat =
                (&mut outer).flat_map(move |_, _| Sub::new(stops, Some("sub stop failed")));

            assert_eq!(flat.produce().await, Ok(Left(7)));
            assert_eq!(flat.inject("injected").await, Err("injected"));
            drop(flat);

            assert_eq!(stops.get(), 1);
            assert_eq!(outer.stops(), 1);
        });
    }
}
