use core::convert::{AsMut, AsRef};

use either::Either;
use wrapper::Wrapper;

use crate::local_nb::Producer;

/// Wraps an async producer and panics as soon as a caller keeps using it after its sequence
/// is over.
///
/// Only test builds perform the checks; other builds use a transparent twin of this type.
///
/// #### Invariants
///
/// `produce` and `inject` panic once the wrapped producer has emitted its final value or an
/// error, or has been stopped. `stop` never panics.
#[derive(Debug, Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd)]
pub struct Invariant<P> {
    inner: P,
    active: bool,
}

impl<P> Invariant<P> {
    /// Wraps `inner` without changing its behaviour towards well-behaved callers.
    pub fn new(inner: P) -> Self {
        Invariant {
            inner,
            active: true,
        }
    }

    /// Panics if the sequence has ended.
    pub fn check_inactive(&self) {
        if !self.active {
            panic!("may not call `Producer` methods after the sequence has ended");
        }
    }

    fn track<T, F, E>(&mut self, result: &Result<Either<T, F>, E>) {
        if !matches!(result, Ok(Either::Left(_))) {
            self.active = false;
        }
    }
}

impl<P> AsRef<P> for Invariant<P> {
    fn as_ref(&self) -> &P {
        &self.inner
    }
}

impl<P> AsMut<P> for Invariant<P> {
    fn as_mut(&mut self) -> &mut P {
        &mut self.inner
    }
}

impl<P> Wrapper<P> for Invariant<P> {
    fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Producer> Producer for Invariant<P> {
    type Item = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.check_inactive();

        let result = self.inner.produce().await;
        self.track(&result);
        result
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.active = false;
        self.inner.stop(fin).await
    }

    async fn inject(
        &mut self,
        err: Self::Error,
    ) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.check_inactive();

        let result = self.inner.inject(err).await;
        self.track(&result);
        result
    }
}
