#![no_main]

use either::Either::Left;
use libfuzzer_sys::fuzz_target;

use ufotofu_helpers::common::producer::TestProducer;
use ufotofu_helpers::sync::{Producer, ProducerExt};

fuzz_target!(|data: (TestProducer<u8, u8, u8>, u8)| {
    let (mut source, limit) = data;
    let available = source.remaining().len();

    let mut taken = (&mut source).take(limit as usize);
    let mut emitted = 0;
    while let Ok(Left(_)) = taken.produce() {
        emitted += 1;
    }
    drop(taken);

    assert!(emitted <= limit as usize);
    assert_eq!(emitted, available.min(limit as usize));
    assert!(source.pulls() <= limit as usize);
});
