#![no_main]
use binary_ofp::WireValue;
use libfuzzer_sys::fuzz_target;
use messages_ofp::{AnyMessage, ErrorMsg};

mod common;

fuzz_target!(|data: &[u8]| {
    match AnyMessage::parse(data) {
        Ok(_) => test_roundtrip!(AnyMessage, data),
        Err(e) => {
            // Every failure must turn into a reply a peer can decode.
            let reply = ErrorMsg::from_error(&e, data);
            let bytes = reply.to_bytes();
            assert_eq!(ErrorMsg::from_bytes(&bytes), Ok(reply));
            let _ = e.to_string();
        }
    }
});
