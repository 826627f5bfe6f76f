//! Queue properties and the queue description they are listed in.
//!
//! Every property starts with an 8 byte header (`property:u16, len:u16, pad[4]`). The protocol
//! has no error codes for malformed properties, they are reported under the library reserved
//! `BadQueueProperty` category.

use alloc::vec::Vec;

use binary_ofp::{
    check_length_field, impl_variant, peek_tlv_header, read_tlv_header, write_tlv_header, Category, CategoryId,
    Decoder, Encoder, Error, LengthRule, Member, OrderedList, SubHeader, Validator, WireValue,
};
use const_ofp::*;

pub struct QueueProperties;

impl Category for QueueProperties {
    type Tag = u16;
    const ID: CategoryId = CategoryId::QueueProperty;
    const HEADER_LEN: usize = QUEUE_PROPERTY_HEADER_SIZE;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

macro_rules! rate_property {
    ($(#[$doc:meta])* $name:ident = $tag:expr) => {
        $(#[$doc])*
        ///
        /// The rate is in tenths of a percent. Any rate above 1000 disables the property, all
        /// disabled rates are equivalent.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub header_pad: [u8; 4],
            pub rate: u16,
            pub pad: [u8; 6],
        }

        impl $name {
            pub fn new(rate: u16) -> Self {
                Self {
                    header_pad: [0; 4],
                    rate,
                    pad: [0; 6],
                }
            }

            pub fn disabled() -> Self {
                Self::new(QUEUE_RATE_UNCONFIGURED)
            }

            pub fn is_disabled(&self) -> bool {
                self.rate > QUEUE_RATE_MAX
            }
        }

        impl Member for $name {
            type Category = QueueProperties;
            const TAG: u16 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = 16;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                16
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
                dst.put_slice(&self.header_pad);
                dst.put_u16(self.rate);
                dst.put_slice(&self.pad);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                read_tlv_header::<Self>(src)?;
                Ok(Self {
                    header_pad: src.read_array()?,
                    rate: src.read_u16()?,
                    pad: src.read_array()?,
                })
            }

            fn equivalent(&self, other: &Self) -> bool {
                self.rate == other.rate || (self.is_disabled() && other.is_disabled())
            }
        }
    };
}

rate_property!(
    /// Guaranteed minimum rate.
    MinRate = QUEUE_PROPERTY_MIN_RATE
);
rate_property!(
    /// Maximum rate.
    MaxRate = QUEUE_PROPERTY_MAX_RATE
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experimenter {
    pub header_pad: [u8; 4],
    pub experimenter: u32,
    pub pad: [u8; 4],
    pub data: Vec<u8>,
}

impl Experimenter {
    pub fn new(experimenter: u32, data: &[u8]) -> Self {
        Self {
            header_pad: [0; 4],
            experimenter,
            pad: [0; 4],
            data: data.to_vec(),
        }
    }
}

impl Member for Experimenter {
    type Category = QueueProperties;
    const TAG: u16 = QUEUE_PROPERTY_EXPERIMENTER;
}

impl WireValue for Experimenter {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        16 + self.data.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, self.wire_length() as u16);
        dst.put_slice(&self.header_pad);
        dst.put_u32(self.experimenter);
        dst.put_slice(&self.pad);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_tlv_header::<Self>(src)? as usize;
        Ok(Self {
            header_pad: src.read_array()?,
            experimenter: src.read_u32()?,
            pad: src.read_array()?,
            data: src.read_bytes(len - 16)?.to_vec(),
        })
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.experimenter == other.experimenter && self.data == other.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyQueueProperty {
    MinRate(MinRate),
    MaxRate(MaxRate),
    Experimenter(Experimenter),
}

impl_variant!(AnyQueueProperty: QueueProperties {
    MinRate(MinRate),
    MaxRate(MaxRate),
    Experimenter(Experimenter),
});

pub type QueuePropertyList = OrderedList<AnyQueueProperty>;

/// A queue attached to a port, as listed in a queue configuration reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketQueue {
    pub queue_id: u32,
    pub port: u32,
    pub pad: [u8; 6],
    pub properties: QueuePropertyList,
}

impl PacketQueue {
    pub fn new(queue_id: u32, port: u32, properties: QueuePropertyList) -> Self {
        Self {
            queue_id,
            port,
            pad: [0; 6],
            properties,
        }
    }

    /// Header and properties.
    pub fn declared_length(&self) -> usize {
        self.properties.total_wire_length(PACKET_QUEUE_HEADER_SIZE)
    }

    /// Value of the length field, header included.
    pub fn length(&self) -> u16 {
        self.declared_length() as u16
    }

    fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let queue_id = src.read_u32()?;
        let port = src.read_u32()?;
        let len = src.read_u16()? as usize;
        if len < PACKET_QUEUE_HEADER_SIZE {
            return Err(Error::bad_length(
                len,
                LengthRule::AtLeast(PACKET_QUEUE_HEADER_SIZE as u16),
            ));
        }
        let pad = src.read_array()?;
        let properties = QueuePropertyList::decode_bounded(src, len - PACKET_QUEUE_HEADER_SIZE)?;
        Ok(Self {
            queue_id,
            port,
            pad,
            properties,
        })
    }
}

impl WireValue for PacketQueue {
    const MIN_LENGTH: u16 = PACKET_QUEUE_HEADER_SIZE as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.declared_length()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u32(self.queue_id);
        dst.put_u32(self.port);
        dst.put_u16(self.length());
        dst.put_slice(&self.pad);
        self.properties.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Self::decode_inner(src).map_err(|e| e.within_category(CategoryId::QueueProperty))
    }

    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_length_field(self.declared_length())
            .map_err(|e| e.within_category(CategoryId::QueueProperty))?;
        validator.nested(&self.properties)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.queue_id == other.queue_id
            && self.port == other.port
            && self.properties.equivalent(&other.properties)
    }
}
