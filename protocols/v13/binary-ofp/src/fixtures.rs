//! Two small categories used by the unit tests of the generic containers: `Shapes` is padded to 8
//! bytes and has an opaque fallback, `Colors` is unpadded and has none.

use alloc::vec::Vec;

use crate::codec::{Decoder, Encoder, Validator, WireValue};
use crate::datatypes::padding::Padding;
use crate::datatypes::set::CanonicalOrder;
use crate::datatypes::tlv::peek_tlv_header;
use crate::datatypes::variant::{Category, Member, Opaque, SubHeader};
use crate::error::{CategoryId, Error, LengthRule};

pub struct Shapes;

impl Category for Shapes {
    type Tag = u16;
    const ID: CategoryId = CategoryId::HelloElement;
    const HEADER_LEN: usize = 4;
    const ALIGNMENT: usize = 8;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    pub side: u32,
}

impl WireValue for Square {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(1);
        dst.put_u16(8);
        dst.put_u32(self.side);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        src.skip(4)?;
        Ok(Self {
            side: src.read_u32()?,
        })
    }
}

impl Member for Square {
    type Category = Shapes;
    const TAG: u16 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: Vec<u8>,
    pub pad: Padding,
}

impl Label {
    pub fn new(text: &[u8]) -> Self {
        Self {
            text: text.to_vec(),
            pad: Padding::to_align(4 + text.len(), 8),
        }
    }
}

impl WireValue for Label {
    const MIN_LENGTH: u16 = 4;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        4 + self.text.len() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(2);
        dst.put_u16((4 + self.text.len()) as u16);
        dst.put_slice(&self.text);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        src.skip(2)?;
        let len = src.read_u16()? as usize;
        if len < 4 {
            return Err(Error::bad_length(len, LengthRule::AtLeast(4)));
        }
        let text = src.read_bytes(len - 4)?.to_vec();
        let pad = Padding::decode_to_align(src, len, 8)?;
        Ok(Self { text, pad })
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Member for Label {
    type Category = Shapes;
    const TAG: u16 = 2;

    fn declared_length(&self) -> usize {
        4 + self.text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Other {
    pub kind: u16,
    pub payload: Vec<u8>,
    pub pad: Padding,
}

impl WireValue for Other {
    const MIN_LENGTH: u16 = 4;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        4 + self.payload.len() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(self.kind);
        dst.put_u16((4 + self.payload.len()) as u16);
        dst.put_slice(&self.payload);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let kind = src.read_u16()?;
        let len = src.read_u16()? as usize;
        if len < 4 {
            return Err(Error::bad_length(len, LengthRule::AtLeast(4)));
        }
        let payload = src.read_bytes(len - 4)?.to_vec();
        let pad = Padding::decode_to_align(src, len, 8)?;
        Ok(Self { kind, payload, pad })
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

impl Opaque for Other {
    type Category = Shapes;

    fn tag(&self) -> u16 {
        self.kind
    }

    fn declared_length(&self) -> usize {
        4 + self.payload.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyShape {
    Square(Square),
    Label(Label),
    Other(Other),
}

crate::impl_variant!(AnyShape: Shapes {
    Square(Square),
    Label(Label),
} fallback Other(Other));

impl CanonicalOrder for AnyShape {
    fn canonical_key(tag: u16) -> u64 {
        match tag {
            2 => 0,
            1 => 1,
            t => 0x1_0000 + t as u64,
        }
    }
}

pub struct Colors;

impl Category for Colors {
    type Tag = u16;
    const ID: CategoryId = CategoryId::Action;
    const HEADER_LEN: usize = 4;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Red {
    pub level: u16,
    pub pad: [u8; 2],
}

impl Red {
    pub fn new(level: u16) -> Self {
        Self { level, pad: [0; 2] }
    }
}

impl WireValue for Red {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(1);
        dst.put_u16(8);
        dst.put_u16(self.level);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        src.skip(4)?;
        Ok(Self {
            level: src.read_u16()?,
            pad: src.read_array()?,
        })
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.level == other.level
    }
}

impl Member for Red {
    type Category = Colors;
    const TAG: u16 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blue {
    pub level: u32,
}

impl WireValue for Blue {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(2);
        dst.put_u16(8);
        dst.put_u32(self.level);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        src.skip(4)?;
        Ok(Self {
            level: src.read_u32()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        if self.level > 100 {
            return Err(Error::invalid(5, "level above 100"));
        }
        Ok(())
    }
}

impl Member for Blue {
    type Category = Colors;
    const TAG: u16 = 2;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyColor {
    Red(Red),
    Blue(Blue),
}

crate::impl_variant!(AnyColor: Colors {
    Red(Red),
    Blue(Blue),
});

impl CanonicalOrder for AnyColor {
    fn canonical_key(tag: u16) -> u64 {
        tag as u64
    }
}

/// Two members sharing one layout, told apart only by their tag. Padded to 8 bytes.
pub struct Blobs;

impl Category for Blobs {
    type Tag = u16;
    const ID: CategoryId = CategoryId::TableFeatureProperty;
    const HEADER_LEN: usize = 4;
    const ALIGNMENT: usize = 8;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob<const TAG: u16> {
    pub payload: Vec<u8>,
    pub pad: Padding,
}

impl<const TAG: u16> Blob<TAG> {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            pad: Padding::to_align(4 + payload.len(), 8),
        }
    }
}

impl<const TAG: u16> WireValue for Blob<TAG> {
    const MIN_LENGTH: u16 = 4;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        4 + self.payload.len() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(TAG);
        dst.put_u16((4 + self.payload.len()) as u16);
        dst.put_slice(&self.payload);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = crate::datatypes::tlv::read_tlv_header::<Self>(src)? as usize;
        let payload = src.read_bytes(len - 4)?.to_vec();
        let pad = Padding::decode_to_align(src, len, 8)?;
        Ok(Self { payload, pad })
    }
}

impl<const TAG: u16> Member for Blob<TAG> {
    type Category = Blobs;
    const TAG: u16 = TAG;

    fn declared_length(&self) -> usize {
        4 + self.payload.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyBlob {
    A(Blob<1>),
    B(Blob<2>),
}

crate::impl_variant!(AnyBlob: Blobs {
    A(Blob<1>),
    B(Blob<2>),
});
