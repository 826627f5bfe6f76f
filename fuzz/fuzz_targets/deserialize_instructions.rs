#![no_main]
use instructions_ofp::InstructionSet;
use libfuzzer_sys::fuzz_target;

mod common;

fuzz_target!(|data: &[u8]| {
    test_roundtrip!(InstructionSet, data);
});
