//! Hello elements. New element types may appear in later protocol versions, so unregistered
//! types are kept as [`UnknownElement`] instead of failing the hello.

use alloc::vec::Vec;

use binary_ofp::{
    impl_variant, pad_len, peek_tlv_header, read_tlv_header, write_tlv_header, Category,
    CategoryId, Decoder, Encoder, Error, LengthRule, Member, Opaque, OrderedList, Padding,
    SubHeader, Validator, WireValue, TLV_HEADER_LEN,
};
use const_ofp::*;

pub struct HelloElements;

impl Category for HelloElements {
    type Tag = u16;
    const ID: CategoryId = CategoryId::HelloElement;
    const HEADER_LEN: usize = HELLO_ELEMENT_HEADER_SIZE;
    const ALIGNMENT: usize = OFP_ALIGNMENT;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

/// Versions supported by the sender. Bit `n` of bitmap `i` stands for version `32 * i + n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBitmap {
    pub bitmaps: Vec<u32>,
    pub pad: Padding,
}

impl VersionBitmap {
    pub fn new(bitmaps: Vec<u32>) -> Self {
        let len = TLV_HEADER_LEN + 4 * bitmaps.len();
        Self {
            bitmaps,
            pad: Padding::to_align(len, OFP_ALIGNMENT),
        }
    }

    pub fn from_versions(versions: &[u8]) -> Self {
        let words = versions.iter().map(|v| *v as usize / 32 + 1).max().unwrap_or(0);
        let mut bitmaps = Vec::new();
        bitmaps.resize(words, 0u32);
        for v in versions {
            bitmaps[*v as usize / 32] |= 1 << (*v % 32);
        }
        Self::new(bitmaps)
    }

    pub fn supports(&self, version: u8) -> bool {
        self.bitmaps
            .get(version as usize / 32)
            .map_or(false, |word| word & (1 << (version % 32)) != 0)
    }

    /// Highest version supported by both bitmaps.
    pub fn highest_common(&self, other: &Self) -> Option<u8> {
        (0..=u8::MAX)
            .rev()
            .find(|v| self.supports(*v) && other.supports(*v))
    }
}

impl Member for VersionBitmap {
    type Category = HelloElements;
    const TAG: u16 = HELLO_ELEMENT_VERSION_BITMAP;

    fn declared_length(&self) -> usize {
        TLV_HEADER_LEN + 4 * self.bitmaps.len()
    }
}

impl WireValue for VersionBitmap {
    const MIN_LENGTH: u16 = TLV_HEADER_LEN as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.declared_length() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Member::length(self));
        for word in &self.bitmaps {
            dst.put_u32(*word);
        }
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_tlv_header::<Self>(src)? as usize;
        let body = len - TLV_HEADER_LEN;
        if body % 4 != 0 {
            return Err(Error::bad_length(len, LengthRule::MultipleOf(4)));
        }
        let mut bitmaps = Vec::with_capacity(body / 4);
        for _ in 0..body / 4 {
            bitmaps.push(src.read_u32()?);
        }
        let pad = Padding::decode_to_align(src, len, OFP_ALIGNMENT)?;
        Ok(Self { bitmaps, pad })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        self.pad.check_aligns(self.declared_length(), OFP_ALIGNMENT)
    }

    /// Trailing empty words do not change the supported versions.
    fn equivalent(&self, other: &Self) -> bool {
        let trim = |b: &[u32]| {
            let end = b.iter().rposition(|w| *w != 0).map_or(0, |i| i + 1);
            b[..end].to_vec()
        };
        trim(&self.bitmaps) == trim(&other.bitmaps)
    }
}

/// An element of a type this library does not know, payload kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownElement {
    pub kind: u16,
    pub payload: Vec<u8>,
    pub pad: Padding,
}

impl UnknownElement {
    pub fn new(kind: u16, payload: &[u8]) -> Self {
        Self {
            kind,
            payload: payload.to_vec(),
            pad: Padding::zeroed(pad_len(TLV_HEADER_LEN + payload.len(), OFP_ALIGNMENT)),
        }
    }
}

impl Opaque for UnknownElement {
    type Category = HelloElements;

    fn tag(&self) -> u16 {
        self.kind
    }

    fn declared_length(&self) -> usize {
        TLV_HEADER_LEN + self.payload.len()
    }
}

impl WireValue for UnknownElement {
    const MIN_LENGTH: u16 = TLV_HEADER_LEN as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        TLV_HEADER_LEN + self.payload.len() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, self.kind, Opaque::length(self));
        dst.put_slice(&self.payload);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let kind = src.read_u16()?;
        let len = src.read_u16()? as usize;
        if len < TLV_HEADER_LEN {
            return Err(Error::bad_length(
                len,
                LengthRule::AtLeast(TLV_HEADER_LEN as u16),
            ));
        }
        Ok(Self {
            kind,
            payload: src.read_bytes(len - TLV_HEADER_LEN)?.to_vec(),
            pad: Padding::decode_to_align(src, len, OFP_ALIGNMENT)?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        self.pad.check_aligns(self.declared_length(), OFP_ALIGNMENT)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyHelloElement {
    VersionBitmap(VersionBitmap),
    Unknown(UnknownElement),
}

impl_variant!(AnyHelloElement: HelloElements {
    VersionBitmap(VersionBitmap),
} fallback Unknown(UnknownElement));

pub type HelloElementList = OrderedList<AnyHelloElement>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use binary_ofp::{ErrorCode, LibraryCategory, LibraryCode, Shallow, Variant};

    #[test]
    fn test_version_bitmap() {
        let bitmap = VersionBitmap::from_versions(&[1, 4]);
        assert_eq!(bitmap.bitmaps, vec![0b1_0010]);
        assert!(bitmap.supports(OFP_VERSION));
        assert!(!bitmap.supports(2));
        assert!(!bitmap.supports(200));
        let bytes = bitmap.to_bytes();
        assert_eq!(bytes, vec![0, 1, 0, 8, 0, 0, 0, 0x12]);

        let other = VersionBitmap::from_versions(&[1, 2, 4, 5]);
        assert_eq!(bitmap.highest_common(&other), Some(4));
        assert_eq!(
            VersionBitmap::from_versions(&[3]).highest_common(&bitmap),
            None
        );
    }

    #[test]
    fn test_trailing_empty_words_are_equivalent() {
        let a = AnyHelloElement::from(VersionBitmap::new(vec![0x10]));
        let b = AnyHelloElement::from(VersionBitmap::new(vec![0x10, 0]));
        assert!(a.equivalent(&b));
        assert!(!a.byte_eq(&b));
    }

    #[test]
    fn test_unknown_element_is_kept() {
        let bytes = [0, 7, 0, 6, 0xaa, 0xbb, 0x11, 0x22, 0, 1, 0, 8, 0, 0, 0, 0x10];
        let list = HelloElementList::from_bytes(&bytes).unwrap();
        assert_eq!(list.len(), 2);
        let unknown = list.get(0).unwrap();
        assert_eq!(unknown.tag(), 7);
        assert_eq!(unknown.length(), 6);
        match unknown {
            AnyHelloElement::Unknown(e) => {
                assert_eq!(e.payload, vec![0xaa, 0xbb]);
                assert_eq!(e.pad.as_bytes(), &[0x11, 0x22]);
            }
            other => panic!("unexpected element {:?}", other),
        }
        assert!(list.get(1).unwrap().get::<VersionBitmap>().unwrap().supports(4));
        assert_eq!(list.to_bytes(), bytes);
        assert!(list
            .get(0)
            .unwrap()
            .equivalent(&UnknownElement::new(7, &[0xaa, 0xbb]).into()));
    }

    #[test]
    fn test_bad_bitmap_length_is_library_error() {
        let bytes = [0, 1, 0, 6, 0, 0, 0, 0];
        assert_eq!(
            AnyHelloElement::from_bytes(&bytes).unwrap_err().code(),
            ErrorCode::library(LibraryCategory::BadHelloElement, LibraryCode::BadLength)
        );
    }

    #[test]
    fn test_padding_must_follow_the_elements() {
        let mut bitmap = VersionBitmap::from_versions(&[4]);
        bitmap.bitmaps.push(0);
        assert_eq!(
            AnyHelloElement::from(bitmap.clone())
                .validate(&Shallow)
                .unwrap_err()
                .code(),
            ErrorCode::library(LibraryCategory::BadHelloElement, LibraryCode::BadLength)
        );
        bitmap.pad = Padding::to_align(12, OFP_ALIGNMENT);
        assert_eq!(bitmap.validate(&Shallow), Ok(()));

        let mut unknown = UnknownElement::new(7, &[1, 2]);
        unknown.payload.push(3);
        assert!(unknown.validate(&Shallow).is_err());
    }

    #[quickcheck_macros::quickcheck]
    fn test_from_versions_supports_exactly_those(versions: Vec<u8>) -> bool {
        let bitmap = VersionBitmap::from_versions(&versions);
        let decoded = VersionBitmap::from_bytes(&bitmap.to_bytes());
        (0..=u8::MAX).all(|v| bitmap.supports(v) == versions.contains(&v))
            && decoded.as_ref() == Ok(&bitmap)
    }
}
