//! # Ofp Match Fields
//!
//! OpenFlow eXtensible Match (OXM) fields and the match structure that carries them.
//!
//! An OXM field's tag is its 32 bit header with the length byte cleared, so the masked and the
//! unmasked form of a field are distinct members. Both share one canonical key: a match may hold
//! a field once, masked or not.
//!
//! Unknown fields are refused with `UnknownType` (`BAD_MATCH`/`BAD_FIELD`).
//!
//! ## Build Options
//! - `prop_test`: implements `quickcheck::Arbitrary` for [`AnyOxm`].

#![no_std]

extern crate alloc;

mod fields;
mod flow_match;

use binary_ofp::{impl_variant, CanonicalOrder, Category, CategoryId, Decoder, Error, SubHeader};
use const_ofp::OXM_HEADER_SIZE;

pub use fields::*;
pub use flow_match::Match;

pub const fn oxm_tag(class: u16, field: u8, has_mask: bool) -> u32 {
    ((class as u32) << 16) | (((field & 0x7f) as u32) << 9) | ((has_mask as u32) << 8)
}

pub const fn oxm_header(tag: u32, payload_len: u8) -> u32 {
    tag | payload_len as u32
}

pub const fn oxm_tag_of(header: u32) -> u32 {
    header & 0xffff_ff00
}

pub const fn oxm_payload_len(header: u32) -> u8 {
    (header & 0xff) as u8
}

pub const fn oxm_class(tag: u32) -> u16 {
    (tag >> 16) as u16
}

pub const fn oxm_field(tag: u32) -> u8 {
    ((tag >> 9) & 0x7f) as u8
}

pub const fn oxm_has_mask(tag: u32) -> bool {
    tag & 0x100 != 0
}

/// The match field category.
pub struct MatchFields;

impl Category for MatchFields {
    type Tag = u32;
    const ID: CategoryId = CategoryId::MatchField;
    const HEADER_LEN: usize = OXM_HEADER_SIZE;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u32>, Error> {
        let header = src.peek_u32_at(0)?;
        Ok(SubHeader {
            tag: oxm_tag_of(header),
            length: OXM_HEADER_SIZE as u16 + oxm_payload_len(header) as u16,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyOxm {
    InPort(InPort),
    InPhyPort(InPhyPort),
    Metadata(Metadata),
    MetadataMasked(MetadataMasked),
    EthDst(EthDst),
    EthDstMasked(EthDstMasked),
    EthSrc(EthSrc),
    EthType(EthType),
    VlanVid(VlanVid),
    VlanPcp(VlanPcp),
    IpDscp(IpDscp),
    IpProto(IpProto),
    Ipv4Src(Ipv4Src),
    Ipv4SrcMasked(Ipv4SrcMasked),
    Ipv4Dst(Ipv4Dst),
    Ipv4DstMasked(Ipv4DstMasked),
    TcpSrc(TcpSrc),
    TcpDst(TcpDst),
    UdpSrc(UdpSrc),
    UdpDst(UdpDst),
}

impl_variant!(AnyOxm: MatchFields {
    InPort(InPort),
    InPhyPort(InPhyPort),
    Metadata(Metadata),
    MetadataMasked(MetadataMasked),
    EthDst(EthDst),
    EthDstMasked(EthDstMasked),
    EthSrc(EthSrc),
    EthType(EthType),
    VlanVid(VlanVid),
    VlanPcp(VlanPcp),
    IpDscp(IpDscp),
    IpProto(IpProto),
    Ipv4Src(Ipv4Src),
    Ipv4SrcMasked(Ipv4SrcMasked),
    Ipv4Dst(Ipv4Dst),
    Ipv4DstMasked(Ipv4DstMasked),
    TcpSrc(TcpSrc),
    TcpDst(TcpDst),
    UdpSrc(UdpSrc),
    UdpDst(UdpDst),
});

impl CanonicalOrder for AnyOxm {
    /// Class and field, the mask bit is ignored.
    fn canonical_key(tag: u32) -> u64 {
        (tag >> 9) as u64
    }
}

impl AnyOxm {
    pub fn has_mask(&self) -> bool {
        oxm_has_mask(binary_ofp::Variant::tag(self))
    }
}

#[cfg(any(test, feature = "prop_test"))]
mod prop {
    use super::*;
    use quickcheck::{Arbitrary, Gen};

    fn mac(g: &mut Gen) -> MacAddr {
        let mut mac = [0_u8; 6];
        mac.iter_mut().for_each(|b| *b = u8::arbitrary(g));
        mac
    }

    impl Arbitrary for AnyOxm {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 10 {
                0 => InPort::new(u32::arbitrary(g)).into(),
                1 => {
                    let mask = u64::arbitrary(g);
                    MetadataMasked::new(u64::arbitrary(g) & mask, mask).into()
                }
                2 => EthDst::new(mac(g)).into(),
                3 => EthSrc::new(mac(g)).into(),
                4 => EthType::new(u16::arbitrary(g)).into(),
                5 => VlanVid::new(u16::arbitrary(g) & const_ofp::OFPVID_MAX).into(),
                6 => IpProto::new(u8::arbitrary(g)).into(),
                7 => {
                    let mask = u32::arbitrary(g);
                    Ipv4SrcMasked::new(u32::arbitrary(g) & mask, mask).into()
                }
                8 => TcpDst::new(u16::arbitrary(g)).into(),
                _ => IpDscp::new(u8::arbitrary(g) % (const_ofp::IP_DSCP_MAX + 1)).into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use binary_ofp::{KeyedSet, OrderedList, Recursive, Shallow, Variant, WireValue};
    use const_ofp::*;

    #[test]
    fn test_tag_layout() {
        let tag = oxm_tag(OXM_CLASS_OPENFLOW_BASIC, OXM_FIELD_IPV4_SRC, true);
        assert_eq!(tag, 0x8000_1700);
        assert_eq!(oxm_class(tag), OXM_CLASS_OPENFLOW_BASIC);
        assert_eq!(oxm_field(tag), OXM_FIELD_IPV4_SRC);
        assert!(oxm_has_mask(tag));
        assert_eq!(oxm_header(tag, 8), 0x8000_1708);
    }

    #[test]
    fn test_masked_ipv4_wire_format() {
        let field = AnyOxm::from(Ipv4SrcMasked::new(0x0a00_0000, 0xff00_0000));
        assert_eq!(
            field.to_bytes(),
            vec![0x80, 0x00, 0x17, 0x08, 0x0a, 0, 0, 0, 0xff, 0, 0, 0]
        );
        assert!(field.has_mask());
        assert_eq!(field.length(), 12);
    }

    #[test]
    fn test_unknown_field() {
        let header = oxm_header(oxm_tag(OXM_CLASS_OPENFLOW_BASIC, 40, false), 2);
        let mut bytes = header.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0]);
        let err = AnyOxm::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownType {
                category: CategoryId::MatchField,
                tag: oxm_tag(OXM_CLASS_OPENFLOW_BASIC, 40, false) as u64,
            }
        );
        assert_eq!(
            err.code(),
            binary_ofp::ErrorCode::protocol(binary_ofp::ErrorType::BadMatch, BAD_MATCH_BAD_FIELD)
        );
    }

    #[test]
    fn test_wrong_payload_length() {
        // in_port claiming 2 bytes of payload.
        let bytes = [0x80, 0x00, 0x00, 0x02, 0x00, 0x01];
        assert!(matches!(
            AnyOxm::from_bytes(&bytes),
            Err(Error::BadLength {
                declared: 6,
                rule: binary_ofp::LengthRule::Exact(8),
                ..
            })
        ));
    }

    #[test]
    fn test_masked_equivalence() {
        let a = Ipv4DstMasked::new(0x0a01_0203, 0xffff_0000);
        let b = Ipv4DstMasked::new(0x0a01_0000, 0xffff_0000);
        assert!(a.equivalent(&b));
        assert!(!a.byte_eq(&b));
        assert!(a.validate(&Shallow).is_err());
        assert!(b.validate(&Shallow).is_ok());
        let c = Ipv4DstMasked::new(0x0a01_0000, 0xff00_0000);
        assert!(!b.equivalent(&c));
    }

    #[test]
    fn test_mac_mask() {
        let ok = EthDstMasked::new([1, 0, 0, 0, 0, 0], [0xff, 0, 0, 0, 0, 0]);
        let bad = EthDstMasked::new([1, 0, 0, 0, 0, 1], [0xff, 0, 0, 0, 0, 0]);
        assert!(ok.validate(&Shallow).is_ok());
        assert!(bad.validate(&Shallow).is_err());
        assert!(ok.equivalent(&bad));
    }

    #[test]
    fn test_masked_and_plain_share_a_key() {
        assert_eq!(
            AnyOxm::key_of::<Metadata>(),
            AnyOxm::key_of::<MetadataMasked>()
        );
        assert_ne!(AnyOxm::key_of::<Ipv4Src>(), AnyOxm::key_of::<Ipv4Dst>());
    }

    #[quickcheck_macros::quickcheck]
    fn test_round_trip(fields: alloc::vec::Vec<AnyOxm>) -> bool {
        let list: OrderedList<AnyOxm> = fields.into_iter().collect();
        let bytes = list.to_bytes();
        match OrderedList::<AnyOxm>::from_bytes(&bytes) {
            Ok(decoded) => decoded == list && decoded.to_bytes() == bytes,
            Err(_) => false,
        }
    }

    #[quickcheck_macros::quickcheck]
    fn test_generated_fields_are_valid(field: AnyOxm) -> bool {
        field.validate(&Recursive).is_ok()
    }

    #[quickcheck_macros::quickcheck]
    fn test_length_is_sum_of_fields(fields: alloc::vec::Vec<AnyOxm>) -> bool {
        let set: KeyedSet<AnyOxm> = fields.iter().cloned().collect();
        let sum: usize = fields.iter().map(|f| f.length() as usize).sum();
        set.total_wire_length(4) == 4 + sum
    }
}
