#![no_main]
use libfuzzer_sys::fuzz_target;
use properties_ofp::{
    HelloElementList, MeterBandList, PacketQueue, QueuePropertyList, TableFeatures,
};

mod common;

fuzz_target!(|data: &[u8]| {
    test_roundtrip!(HelloElementList, data);
    test_roundtrip!(MeterBandList, data);
    test_roundtrip!(QueuePropertyList, data);
    test_roundtrip!(PacketQueue, data);
    test_roundtrip!(TableFeatures, data);
});
