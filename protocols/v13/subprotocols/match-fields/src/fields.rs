//! OXM fields of the `OPENFLOW_BASIC` class.
//!
//! Every field is a TLV: a 4 byte header (`class:16 | field:7 | hasmask:1 | length:8`) followed by
//! the value and, for masked fields, a mask of the same size.

use alloc::vec::Vec;
use core::fmt;

use binary_ofp::{Decoder, Encoder, Error, LengthRule, Member, Validator, WireValue};
use const_ofp::*;

use crate::{oxm_header, oxm_payload_len, oxm_tag, oxm_tag_of, MatchFields};

pub type MacAddr = [u8; 6];

/// A value that can sit in an OXM TLV.
pub trait OxmPayload: Copy + Eq + fmt::Debug {
    const SIZE: u8;

    fn read(src: &mut Decoder<'_>) -> Result<Self, Error>;

    fn write(&self, dst: &mut Vec<u8>);

    fn and(self, mask: Self) -> Self;

    /// Bits set in `self` but not in `mask`.
    fn outside(self, mask: Self) -> Self;

    fn is_zero(self) -> bool;
}

macro_rules! impl_oxm_payload_for_unsigned {
    ($t:ty, $size:expr, $put:ident, $read:ident) => {
        impl OxmPayload for $t {
            const SIZE: u8 = $size;

            fn read(src: &mut Decoder<'_>) -> Result<Self, Error> {
                src.$read()
            }

            fn write(&self, dst: &mut Vec<u8>) {
                dst.$put(*self);
            }

            fn and(self, mask: Self) -> Self {
                self & mask
            }

            fn outside(self, mask: Self) -> Self {
                self & !mask
            }

            fn is_zero(self) -> bool {
                self == 0
            }
        }
    };
}
impl_oxm_payload_for_unsigned!(u8, 1, put_u8, read_u8);
impl_oxm_payload_for_unsigned!(u16, 2, put_u16, read_u16);
impl_oxm_payload_for_unsigned!(u32, 4, put_u32, read_u32);
impl_oxm_payload_for_unsigned!(u64, 8, put_u64, read_u64);

impl OxmPayload for MacAddr {
    const SIZE: u8 = 6;

    fn read(src: &mut Decoder<'_>) -> Result<Self, Error> {
        src.read_array()
    }

    fn write(&self, dst: &mut Vec<u8>) {
        dst.put_slice(self);
    }

    fn and(self, mask: Self) -> Self {
        let mut out = self;
        out.iter_mut().zip(mask.iter()).for_each(|(b, m)| *b &= m);
        out
    }

    fn outside(self, mask: Self) -> Self {
        let mut out = self;
        out.iter_mut().zip(mask.iter()).for_each(|(b, m)| *b &= !m);
        out
    }

    fn is_zero(self) -> bool {
        self.iter().all(|b| *b == 0)
    }
}

/// Reads and checks the header of field `T` carrying `payload_len` bytes.
pub(crate) fn read_oxm_header<T: Member<Category = MatchFields>>(
    src: &mut Decoder<'_>,
    payload_len: u8,
) -> Result<(), Error> {
    let header = src.read_u32()?;
    let tag = oxm_tag_of(header);
    if tag != T::TAG {
        return Err(Error::WrongVariant {
            category: binary_ofp::CategoryId::MatchField,
            expected: T::TAG as u64,
            actual: tag as u64,
        });
    }
    let len = oxm_payload_len(header);
    if len != payload_len {
        return Err(Error::bad_length(
            OXM_HEADER_SIZE + len as usize,
            LengthRule::exact(OXM_HEADER_SIZE + payload_len as usize),
        ));
    }
    Ok(())
}

macro_rules! oxm_field {
    ($(#[$doc:meta])* $name:ident, $field:expr, $t:ty $(, max = $max:expr)?) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub value: $t,
        }

        impl $name {
            pub fn new(value: $t) -> Self {
                Self { value }
            }
        }

        impl Member for $name {
            type Category = MatchFields;
            const TAG: u32 = oxm_tag(OXM_CLASS_OPENFLOW_BASIC, $field, false);
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = OXM_HEADER_SIZE as u16 + <$t as OxmPayload>::SIZE as u16;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                Self::MIN_LENGTH as usize
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                dst.put_u32(oxm_header(Self::TAG, <$t as OxmPayload>::SIZE));
                self.value.write(dst);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                read_oxm_header::<Self>(src, <$t as OxmPayload>::SIZE)?;
                Ok(Self {
                    value: <$t as OxmPayload>::read(src)?,
                })
            }

            $(
                fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
                    if self.value > $max {
                        return Err(Error::invalid(
                            BAD_MATCH_BAD_VALUE,
                            concat!(stringify!($name), " out of range"),
                        ));
                    }
                    Ok(())
                }
            )?
        }
    };
}

macro_rules! oxm_masked_field {
    ($(#[$doc:meta])* $name:ident, $field:expr, $t:ty) => {
        $(#[$doc])*
        ///
        /// Bits of `value` outside `mask` must be zero. Two fields are equivalent when their masks
        /// are equal and they agree on the masked bits.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub value: $t,
            pub mask: $t,
        }

        impl $name {
            pub fn new(value: $t, mask: $t) -> Self {
                Self { value, mask }
            }
        }

        impl Member for $name {
            type Category = MatchFields;
            const TAG: u32 = oxm_tag(OXM_CLASS_OPENFLOW_BASIC, $field, true);
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 =
                OXM_HEADER_SIZE as u16 + 2 * <$t as OxmPayload>::SIZE as u16;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                Self::MIN_LENGTH as usize
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                dst.put_u32(oxm_header(Self::TAG, 2 * <$t as OxmPayload>::SIZE));
                self.value.write(dst);
                self.mask.write(dst);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                read_oxm_header::<Self>(src, 2 * <$t as OxmPayload>::SIZE)?;
                Ok(Self {
                    value: <$t as OxmPayload>::read(src)?,
                    mask: <$t as OxmPayload>::read(src)?,
                })
            }

            fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
                if !self.value.outside(self.mask).is_zero() {
                    return Err(Error::invalid(
                        BAD_MATCH_BAD_WILDCARDS,
                        concat!(stringify!($name), " has bits set outside its mask"),
                    ));
                }
                Ok(())
            }

            fn equivalent(&self, other: &Self) -> bool {
                self.mask == other.mask
                    && self.value.and(self.mask) == other.value.and(other.mask)
            }
        }
    };
}

oxm_field!(
    /// Switch input port.
    InPort, OXM_FIELD_IN_PORT, u32
);
oxm_field!(
    /// Switch physical input port.
    InPhyPort, OXM_FIELD_IN_PHY_PORT, u32
);
oxm_field!(Metadata, OXM_FIELD_METADATA, u64);
oxm_masked_field!(
    /// Metadata passed between tables.
    MetadataMasked, OXM_FIELD_METADATA, u64
);
oxm_field!(EthDst, OXM_FIELD_ETH_DST, MacAddr);
oxm_masked_field!(EthDstMasked, OXM_FIELD_ETH_DST, MacAddr);
oxm_field!(EthSrc, OXM_FIELD_ETH_SRC, MacAddr);
oxm_field!(EthType, OXM_FIELD_ETH_TYPE, u16);
oxm_field!(
    /// VLAN id, with `OFPVID_PRESENT` set when a tag is present.
    VlanVid, OXM_FIELD_VLAN_VID, u16, max = OFPVID_MAX
);
oxm_field!(VlanPcp, OXM_FIELD_VLAN_PCP, u8, max = VLAN_PCP_MAX);
oxm_field!(IpDscp, OXM_FIELD_IP_DSCP, u8, max = IP_DSCP_MAX);
oxm_field!(IpProto, OXM_FIELD_IP_PROTO, u8);
oxm_field!(Ipv4Src, OXM_FIELD_IPV4_SRC, u32);
oxm_masked_field!(Ipv4SrcMasked, OXM_FIELD_IPV4_SRC, u32);
oxm_field!(Ipv4Dst, OXM_FIELD_IPV4_DST, u32);
oxm_masked_field!(Ipv4DstMasked, OXM_FIELD_IPV4_DST, u32);
oxm_field!(TcpSrc, OXM_FIELD_TCP_SRC, u16);
oxm_field!(TcpDst, OXM_FIELD_TCP_DST, u16);
oxm_field!(UdpSrc, OXM_FIELD_UDP_SRC, u16);
oxm_field!(UdpDst, OXM_FIELD_UDP_DST, u16);
