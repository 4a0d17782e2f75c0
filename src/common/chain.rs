//! Randomized chains of lazy operations, evaluated lazily on producers and eagerly on vectors.
//!
//! Used by the unit tests and the fuzz target to check that both evaluations agree.

use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;

use arbitrary::Arbitrary;
use either::Either;

use crate::common::producer::TestProducer;
use crate::common::TestYielder;
use crate::local_nb::{self, ProducerExt as _};
use crate::sync::{self, ProducerExt as _};

const MAX_ITEMS: usize = 64;
const MAX_OPS: usize = 8;

/// One lazy operation with its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum ChainOp {
    Map(u8),
    Filter(u8),
    Take(u8),
    Skip(u8),
    FlatMap(u8),
}

/// A source sequence and the operations to apply to it.
#[derive(Debug, Clone, Arbitrary)]
pub struct ChainCase {
    pub items: Vec<u8>,
    pub ops: Vec<ChainOp>,
    pub yielder: TestYielder,
}

fn mapped(k: u8, x: u8, i: usize) -> u8 {
    x.wrapping_mul(3).wrapping_add(k).wrapping_add(i as u8)
}

fn kept(k: u8, x: &u8, i: usize) -> bool {
    (*x as usize + i) % (k as usize % 4 + 1) != 0
}

fn expanded(k: u8, x: u8, i: usize) -> Vec<u8> {
    vec![x.wrapping_add(k); (x as usize + i) % 3]
}

impl ChainCase {
    fn items(&self) -> Vec<u8> {
        self.items.iter().copied().take(MAX_ITEMS).collect()
    }

    fn ops(&self) -> &[ChainOp] {
        &self.ops[..self.ops.len().min(MAX_OPS)]
    }

    /// Applies the operations to a vector, eagerly.
    pub fn eager(&self) -> Vec<u8> {
        let mut items = self.items();
        for op in self.ops() {
            items = match *op {
                ChainOp::Map(k) => items
                    .into_iter()
                    .enumerate()
                    .map(|(i, x)| mapped(k, x, i))
                    .collect(),
                ChainOp::Filter(k) => items
                    .into_iter()
                    .enumerate()
                    .filter(|(i, x)| kept(k, x, *i))
                    .map(|(_, x)| x)
                    .collect(),
                ChainOp::Take(n) => {
                    items.truncate(n as usize);
                    items
                }
                ChainOp::Skip(n) => items.into_iter().skip(n as usize).collect(),
                ChainOp::FlatMap(k) => items
                    .into_iter()
                    .enumerate()
                    .flat_map(|(i, x)| expanded(k, x, i))
                    .collect(),
            };
        }
        items
    }

    /// Applies the operations to a sync producer and collects the result.
    pub fn lazy_sync(&self) -> Vec<u8> {
        let source = TestProducer::<u8, (), Infallible>::new(self.items(), Ok(()));
        let mut p: Box<dyn sync::Producer<Item = u8, Final = (), Error = Infallible>> =
            Box::new(source);

        for op in self.ops() {
            p = match *op {
                ChainOp::Map(k) => Box::new(p.map(move |x, i| mapped(k, x, i))),
                ChainOp::Filter(k) => Box::new(p.filter(move |x, i| kept(k, x, i))),
                ChainOp::Take(n) => Box::new(EraseFinal(p.take(n as usize))),
                ChainOp::Skip(n) => Box::new(p.skip(n as usize)),
                ChainOp::FlatMap(k) => Box::new(p.flat_map(move |x, i| expanded(k, x, i))),
            };
        }

        match p.to_vec() {
            Ok(items) => items,
            Err(never) => match never {},
        }
    }

    /// Applies the operations to an async producer that suspends according to the yielder,
    /// and collects the result.
    pub fn lazy_local_nb(&self) -> Vec<u8> {
        let source = TestProducer::<u8, (), Infallible>::with_yielder(
            self.items(),
            Ok(()),
            self.yielder.clone(),
        );
        let mut p = DynProducer::new(source);

        for op in self.ops() {
            p = match *op {
                ChainOp::Map(k) => DynProducer::new(p.map(move |x, i| mapped(k, x, i))),
                ChainOp::Filter(k) => DynProducer::new(p.filter(move |x, i| kept(k, x, i))),
                ChainOp::Take(n) => DynProducer::new(EraseFinal(p.take(n as usize))),
                ChainOp::Skip(n) => DynProducer::new(p.skip(n as usize)),
                ChainOp::FlatMap(k) => {
                    DynProducer::new(p.flat_map(move |x, i| expanded(k, x, i)))
                }
            };
        }

        match futures_lite::future::block_on(p.to_vec()) {
            Ok(items) => items,
            Err(never) => match never {},
        }
    }

    /// Panics if a lazy evaluation disagrees with the eager one.
    pub fn check(&self) {
        let expected = self.eager();
        assert_eq!(self.lazy_sync(), expected, "sync chain {:?}", self.ops());
        assert_eq!(self.lazy_local_nb(), expected, "async chain {:?}", self.ops());
    }
}

/// Forgets whether a `take` cut the sequence short, so that chains keep a uniform type.
struct EraseFinal<P>(P);

impl<P> sync::Producer for EraseFinal<P>
where
    P: sync::Producer<Final = Option<()>>,
{
    type Item = P::Item;
    type Final = ();
    type Error = P::Error;

    fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        Ok(self.0.produce()?.map_right(|_| ()))
    }
}

impl<P> local_nb::Producer for EraseFinal<P>
where
    P: local_nb::Producer<Final = Option<()>>,
{
    type Item = P::Item;
    type Final = ();
    type Error = P::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        Ok(self.0.produce().await?.map_right(|_| ()))
    }
}

type Step<'a> = Pin<Box<dyn Future<Output = Result<Either<u8, ()>, Infallible>> + 'a>>;

// Async producers are not object safe, so chains of runtime-chosen length go through this.
trait ErasedProducer {
    fn produce_erased(&mut self) -> Step<'_>;
}

impl<P> ErasedProducer for P
where
    P: local_nb::Producer<Item = u8, Final = (), Error = Infallible>,
{
    fn produce_erased(&mut self) -> Step<'_> {
        Box::pin(self.produce())
    }
}

struct DynProducer(Box<dyn ErasedProducer>);

impl DynProducer {
    fn new<P>(producer: P) -> Self
    where
        P: local_nb::Producer<Item = u8, Final = (), Error = Infallible> + 'static,
    {
        DynProducer(Box::new(producer))
    }
}

impl local_nb::Producer for DynProducer {
    type Item = u8;
    type Final = ();
    type Error = Infallible;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        self.0.produce_erased().await
    }
}
