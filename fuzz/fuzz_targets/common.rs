/// Decodes `$data` as `$ty` and, when that succeeds, checks that the value survives an
/// encode/decode cycle.
///
/// 1. decode the input, ignoring failures;
/// 2. run both validators, which may fail but must not panic;
/// 3. encode, decode again and compare with the first value;
/// 4. encode the second value and compare the bytes.
///
/// ```ignore
/// test_roundtrip!(Match, data);
/// ```
#[macro_export]
macro_rules! test_roundtrip {
    ($ty:ty, $data:expr) => {{
        if let Ok(parsed) = <$ty as binary_ofp::WireValue>::from_bytes($data) {
            let _ = binary_ofp::WireValue::validate(&parsed, &binary_ofp::Shallow);
            let _ = binary_ofp::WireValue::validate(&parsed, &binary_ofp::Recursive);

            let encoded_1 = binary_ofp::WireValue::to_bytes(&parsed);
            assert_eq!(
                encoded_1.len(),
                binary_ofp::WireValue::wire_length(&parsed),
                "Length accounting mismatch"
            );
            let reparsed = <$ty as binary_ofp::WireValue>::from_bytes(&encoded_1)
                .expect("Roundtrip failed: encoder produced invalid bytes");
            assert_eq!(parsed, reparsed, "Decoded value changed");
            assert!(binary_ofp::WireValue::equivalent(&parsed, &reparsed));

            let encoded_2 = binary_ofp::WireValue::to_bytes(&reparsed);
            assert_eq!(encoded_1, encoded_2, "Encoding is not stable");
        }
    }};
}
