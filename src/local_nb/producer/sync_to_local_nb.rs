use either::Either;
use wrapper::Wrapper;

use crate::local_nb::Producer;
use crate::sync;

/// Turns a [`sync::Producer`](crate::sync::Producer) into a [`local_nb::Producer`](crate::local_nb::Producer). Only use this to wrap types that never block and do not perform time-intensive computations.
///
/// Every method computes its result synchronously and returns it from the first poll. In
/// particular, an error the inner producer re-raises from `inject` surfaces before any
/// suspension point. `stop` is forwarded with the exact same argument, so a missing final value
/// stays missing.
#[derive(Debug, Clone)]
pub struct SyncToLocalNb<P>(pub P);

impl<P> AsRef<P> for SyncToLocalNb<P> {
    fn as_ref(&self) -> &P {
        &self.0
    }
}

impl<P> AsMut<P> for SyncToLocalNb<P> {
    fn as_mut(&mut self) -> &mut P {
        &mut self.0
    }
}

impl<P> Wrapper<P> for SyncToLocalNb<P> {
    fn into_inner(self) -> P {
        self.0
    }
}

impl<P: sync::Producer> Producer for SyncToLocalNb<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.produce()
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.0.stop(fin)
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.inject(err)
    }
}

local_nb_producible_by_identity!(impl<P> SyncToLocalNb<P>);
