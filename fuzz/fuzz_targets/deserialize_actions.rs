#![no_main]
use actions_ofp::{ActionList, ActionSet};
use libfuzzer_sys::fuzz_target;

mod common;

fuzz_target!(|data: &[u8]| {
    test_roundtrip!(ActionList, data);
    test_roundtrip!(ActionSet, data);
});
