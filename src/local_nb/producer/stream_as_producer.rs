use core::convert::Infallible;

use either::Either::{self, Left, Right};
use futures_lite::{Stream, StreamExt};

use crate::local_nb::Producer;

/// Treat a [`Stream`] as a [`local_nb::Producer`](crate::local_nb::Producer).
///
/// Stopping the producer drops the stream. Afterwards, the producer only ever emits its final
/// value.
#[derive(Debug)]
pub struct StreamAsProducer<S> {
    stream: Option<S>,
}

impl<S: Stream + Unpin> StreamAsProducer<S> {
    /// Wraps a stream.
    pub fn new(stream: S) -> Self {
        StreamAsProducer {
            stream: Some(stream),
        }
    }

    /// Returns the wrapped stream, unless the producer has been stopped.
    pub fn into_inner(self) -> Option<S> {
        self.stream
    }
}

impl<S: Stream + Unpin> Producer for StreamAsProducer<S> {
    type Item = S::Item;
    type Final = ();
    type Error = Infallible;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        let next = match self.stream.as_mut() {
            Some(stream) => stream.next().await,
            None => None,
        };

        match next {
            Some(item) => Ok(Left(item)),
            None => {
                self.stream = None;
                Ok(Right(()))
            }
        }
    }

    async fn stop(&mut self, fin: Option<Self::Final>) -> Result<Option<Self::Final>, Self::Error> {
        self.stream = None;
        Ok(fin)
    }
}

local_nb_producible_by_identity!(impl<S> StreamAsProducer<S>);
