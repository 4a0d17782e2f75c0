use std::collections::VecDeque;

use arbitrary::Arbitrary;
use either::Either::{self, Left, Right};

use crate::common::TestYielder;
use crate::{local_nb, sync};

/// A scripted producer for tests: emits a fixed list of items, then either a final value or
/// an error.
///
/// It counts how often it was asked to produce and to stop, so tests can check how much of
/// the sequence an operation actually pulled. As an async producer it optionally suspends
/// before each step, according to a [`TestYielder`].
#[derive(Debug, Clone)]
pub struct TestProducer<Item, Final, Error> {
    items: VecDeque<Item>,
    termination: Option<Result<Final, Error>>,
    yielder: Option<TestYielder>,
    pulls: usize,
    stops: usize,
    last_stop: Option<Option<Final>>,
    stop_error: Option<Error>,
}

impl<Item, Final, Error> TestProducer<Item, Final, Error> {
    /// Creates a producer that emits `items` and then terminates with `termination`.
    pub fn new(items: Vec<Item>, termination: Result<Final, Error>) -> Self {
        TestProducer {
            items: items.into(),
            termination: Some(termination),
            yielder: None,
            pulls: 0,
            stops: 0,
            last_stop: None,
            stop_error: None,
        }
    }

    /// Makes the next call to `stop` fail with `err`, after recording the call.
    pub fn with_failing_stop(self, err: Error) -> Self {
        TestProducer {
            stop_error: Some(err),
            ..self
        }
    }

    /// Creates a producer which, when used asynchronously, suspends according to `yielder`.
    pub fn with_yielder(
        items: Vec<Item>,
        termination: Result<Final, Error>,
        yielder: TestYielder,
    ) -> Self {
        TestProducer {
            yielder: Some(yielder),
            ..Self::new(items, termination)
        }
    }

    /// The items that have not been produced yet.
    pub fn remaining(&self) -> &VecDeque<Item> {
        &self.items
    }

    /// How often `produce` was called.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    /// How often `stop` was called.
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// The argument of the most recent call to `stop`, if there was one.
    pub fn last_stop(&self) -> Option<Option<Final>>
    where
        Final: Clone,
    {
        self.last_stop.clone()
    }

    fn step(&mut self) -> Result<Either<Item, Final>, Error> {
        self.pulls += 1;
        match self.items.pop_front() {
            Some(item) => Ok(Left(item)),
            None => match self.termination.take() {
                Some(Ok(fin)) => Ok(Right(fin)),
                Some(Err(err)) => Err(err),
                None => panic!("TestProducer was asked to produce after its sequence had ended"),
            },
        }
    }

    fn record_stop(&mut self, fin: Option<Final>) -> Result<Option<Final>, Error>
    where
        Final: Clone,
    {
        self.stops += 1;
        self.items.clear();
        self.termination = None;
        self.last_stop = Some(fin.clone());
        match self.stop_error.take() {
            Some(err) => Err(err),
            None => Ok(fin),
        }
    }
}

impl<Item, Final: Clone, Error> sync::Producer for TestProducer<Item, Final, Error> {
    type Item = Item;
    type Final = Final;
    type Error = Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.step()
    }

    fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.record_stop(fin)
    }
}

impl<Item, Final: Clone, Error> local_nb::Producer for TestProducer<Item, Final, Error> {
    type Item = Item;
    type Final = Final;
    type Error = Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        if let Some(yielder) = self.yielder.as_mut() {
            yielder.maybe_yield().await;
        }
        self.step()
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        if let Some(yielder) = self.yielder.as_mut() {
            yielder.maybe_yield().await;
        }
        self.record_stop(fin)
    }
}

sync_producible_by_identity!(impl<Item, Final, Error> TestProducer<Item, Final, Error>);
local_nb_producible_by_identity!(impl<Item, Final, Error> TestProducer<Item, Final, Error>);

impl<'a, Item, Final, Error> Arbitrary<'a> for TestProducer<Item, Final, Error>
where
    Item: Arbitrary<'a>,
    Final: Arbitrary<'a>,
    Error: Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let items: Vec<Item> = Arbitrary::arbitrary(u)?;

        let termination: Result<Final, Error> = if Arbitrary::arbitrary(u)? {
            Ok(Arbitrary::arbitrary(u)?)
        } else {
            Err(Arbitrary::arbitrary(u)?)
        };

        let yielder: Option<TestYielder> = Arbitrary::arbitrary(u)?;

        Ok(TestProducer {
            yielder,
            ..TestProducer::new(items, termination)
        })
    }
}
