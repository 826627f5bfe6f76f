//! # Ofp Properties
//!
//! The smaller value categories of the protocol, each with its own dispatch table:
//!
//! - queue properties, listed inside a [`PacketQueue`];
//! - meter bands, listed in a meter-mod;
//! - table-feature properties, held by [`TableFeatures`] as a keyed set;
//! - hello elements, the only category with an opaque fallback.
//!
//! Queue properties and hello elements have no protocol error type; failures in them are
//! reported with the library reserved error codes.
//!
//! ## Build Options
//! - `prop_test`: implements `quickcheck::Arbitrary` for [`AnyMeterBand`] and
//!   [`AnyHelloElement`].

#![no_std]

extern crate alloc;

pub mod hello;
pub mod meter_band;
pub mod queue;
pub mod table_features;

pub use hello::{AnyHelloElement, HelloElementList, UnknownElement, VersionBitmap};
pub use meter_band::{AnyMeterBand, DscpRemark, MeterBandList};
pub use queue::{AnyQueueProperty, MaxRate, MinRate, PacketQueue, QueuePropertyList};
pub use table_features::{
    AnyTableFeatureProperty, ElementId, TableFeaturePropertySet, TableFeatures,
};

#[cfg(any(test, feature = "prop_test"))]
mod prop {
    use super::*;
    use alloc::vec::Vec;
    use quickcheck::{Arbitrary, Gen};

    impl Arbitrary for AnyMeterBand {
        fn arbitrary(g: &mut Gen) -> Self {
            let rate = u32::arbitrary(g).max(1);
            let burst_size = u32::arbitrary(g);
            match u8::arbitrary(g) % 3 {
                0 => meter_band::Drop::new(rate, burst_size).into(),
                1 => DscpRemark::new(rate, burst_size, u8::arbitrary(g) % 64).into(),
                _ => {
                    let data: Vec<u8> = Vec::<u8>::arbitrary(g).into_iter().take(16).collect();
                    meter_band::Experimenter::new(rate, burst_size, u32::arbitrary(g), &data)
                        .into()
                }
            }
        }
    }

    impl Arbitrary for AnyHelloElement {
        fn arbitrary(g: &mut Gen) -> Self {
            if bool::arbitrary(g) {
                let versions: Vec<u8> = Vec::<u8>::arbitrary(g).into_iter().take(8).collect();
                VersionBitmap::from_versions(&versions).into()
            } else {
                let payload: Vec<u8> = Vec::<u8>::arbitrary(g).into_iter().take(20).collect();
                // Skip the registered type so the element decodes back to the fallback.
                let kind = u16::arbitrary(g).max(2);
                UnknownElement::new(kind, &payload).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use binary_ofp::{Recursive, WireValue};

    #[quickcheck_macros::quickcheck]
    fn test_meter_bands_round_trip(bands: Vec<AnyMeterBand>) -> bool {
        let list: MeterBandList = bands.into_iter().collect();
        let bytes = list.to_bytes();
        bytes.len() == list.wire_length()
            && MeterBandList::from_bytes(&bytes).as_ref() == Ok(&list)
            && list.validate(&Recursive).is_ok()
    }

    #[quickcheck_macros::quickcheck]
    fn test_hello_elements_round_trip(elements: Vec<AnyHelloElement>) -> bool {
        let list: HelloElementList = elements.into_iter().collect();
        let bytes = list.to_bytes();
        bytes.len() % 8 == 0 && HelloElementList::from_bytes(&bytes).as_ref() == Ok(&list)
    }
}
