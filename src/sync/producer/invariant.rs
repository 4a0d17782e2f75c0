use core::convert::{AsMut, AsRef};

use either::Either;
use wrapper::Wrapper;

use crate::sync::Producer;

/// Wraps a producer and panics as soon as a caller keeps using it after its sequence is over.
///
/// Only test builds perform the checks. Every other build uses a transparent twin of this
/// type, so wrapping costs nothing in production.
///
/// #### Invariants
///
/// `produce` and `inject` panic once the wrapped producer has
///
/// - emitted its final value,
/// - emitted an error, or
/// - been stopped.
///
/// `stop` itself never panics, no matter how often it is called.
#[derive(Debug, Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd)]
pub struct Invariant<P> {
    inner: P,
    // Cleared by the first final value, error, or stop.
    active: bool,
}

impl<P> Invariant<P> {
    /// Wraps `inner`. The result behaves like `inner` for every caller that respects the
    /// producer contract.
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

    fn track<T, F, E>(&mut self, result: Result<Either<T, F>, E>) -> Result<Either<T, F>, E> {
        if !matches!(result, Ok(Either::Left(_))) {
            self.active = false;
        }
        result
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

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.check_inactive();
        let result = self.inner.produce();
        self.track(result)
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.active = false;
        self.inner.stop(fin)
    }

    fn inject(&mut self, err: Self::Error) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.check_inactive();
        let result = self.inner.inject(err);
        self.track(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::producer::TestProducer;

    fn ufo() -> Invariant<TestProducer<u8, (), &'static str>> {
        Invariant::new(TestProducer::new(b"ufo".to_vec(), Ok(())))
    }

    #[test]
    #[should_panic(expected = "may not call `Producer` methods after the sequence has ended")]
    fn panics_on_produce_after_final() {
        let mut p = ufo();
        while let Ok(Either::Left(_)) = p.produce() {}

        let _ = p.produce();
    }

    #[test]
    #[should_panic(expected = "may not call `Producer` methods after the sequence has ended")]
    fn panics_on_produce_after_error() {
        let mut p = Invariant::new(TestProducer::<u8, (), _>::new(vec![], Err("nope")));
        let _ = p.produce();

        let _ = p.produce();
    }

    #[test]
    #[should_panic(expected = "may not call `Producer` methods after the sequence has ended")]
    fn panics_on_produce_after_stop() {
        let mut p = ufo();
        let _ = p.stop(None);

        let _ = p.produce();
    }

    #[test]
    #[should_panic(expected = "may not call `Producer` methods after the sequence has ended")]
    fn panics_on_inject_after_final() {
        let mut p = ufo();
        while let Ok(Either::Left(_)) = p.produce() {}

        let _ = p.inject("late");
    }

    #[test]
    fn allows_stop_after_final() {
        let mut p = ufo();
        while let Ok(Either::Left(_)) = p.produce() {}

        assert_eq!(p.stop(None), Ok(None));
        assert_eq!(p.stop(Some(())), Ok(Some(())));
    }
}
