use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use arbitrary::Arbitrary;

/// Suspends an async computation according to a fixed pattern, to shake out code that assumes
/// futures complete on their first poll.
///
/// Every call to [`maybe_yield`](TestYielder::maybe_yield) consumes one entry of the pattern;
/// `true` means "return `Pending` once before completing".
// Heavily inspired by https://docs.rs/async-std/latest/src/async_std/task/yield_now.rs.html
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct TestYielder {
    pattern: Box<[bool]>, // nonzero length, at least one bool must be `false`
    index: usize,
}

impl TestYielder {
    pub fn new(pattern: Box<[bool]>) -> TestYielder {
        if pattern.iter().all(|b| *b) {
            // This also handles empty patterns.
            let mut pat = Vec::with_capacity(pattern.len() + 1);
            pat.extend_from_slice(&pattern);
            pat.push(false);

            TestYielder {
                pattern: pat.into_boxed_slice(),
                index: 0,
            }
        } else {
            TestYielder { pattern, index: 0 }
        }
    }

    /// How many times a future returned by `maybe_yield` has been polled.
    pub fn polls(&self) -> usize {
        self.index
    }

    #[inline]
    pub async fn maybe_yield(&mut self) {
        MaybeYield(self).await
    }
}

impl<'a> Arbitrary<'a> for TestYielder {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let pattern = Box::<[bool]>::arbitrary(u)?;
        Ok(Self::new(pattern))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        Box::<[bool]>::size_hint(depth)
    }
}

struct MaybeYield<'s>(&'s mut TestYielder);

impl Future for MaybeYield<'_> {
    type Output = ();

    // Re-schedules the task right away, so executors that poll in FIFO order let other
    // futures progress in between.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let position = self.0.index % self.0.pattern.len();
        let do_yield = self.0.pattern[position];
        self.0.index += 1;

        if do_yield {
            cx.waker().wake_by_ref();
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_true_patterns_still_complete() {
        let mut yielder = TestYielder::new(vec![true, true].into_boxed_slice());
        smol::block_on(yielder.maybe_yield());
        assert_eq!(yielder.polls(), 3);
    }
}
