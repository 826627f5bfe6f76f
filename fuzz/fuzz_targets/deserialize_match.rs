#![no_main]
use libfuzzer_sys::fuzz_target;
use oxm_ofp::{AnyOxm, Match};

mod common;

fuzz_target!(|data: &[u8]| {
    test_roundtrip!(Match, data);
    test_roundtrip!(AnyOxm, data);
});
