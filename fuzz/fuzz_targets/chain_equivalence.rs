#![no_main]

use libfuzzer_sys::fuzz_target;

use ufotofu_helpers::common::chain::ChainCase;

fuzz_target!(|case: ChainCase| {
    case.check();
});
