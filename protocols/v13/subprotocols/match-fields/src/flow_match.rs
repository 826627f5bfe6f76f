use alloc::vec::Vec;

use binary_ofp::{
    check_length_field, CategoryId, Decoder, Encoder, Error, KeyedSet, LengthRule, Padding,
    Validator, WireValue,
};
use const_ofp::{BAD_MATCH_BAD_TYPE, MATCH_HEADER_SIZE, MATCH_TYPE_OXM, OFP_ALIGNMENT};

use crate::AnyOxm;

/// The match of a flow entry or packet-out: an OXM header followed by the match fields, padded
/// to 8 bytes. The length field covers the header and fields but not the padding.
///
/// Each field may appear once. Duplicates decode fine and are reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub fields: KeyedSet<AnyOxm>,
    pub pad: Padding,
}

impl Match {
    pub fn new(fields: KeyedSet<AnyOxm>) -> Self {
        let pad = Padding::to_align(MATCH_HEADER_SIZE + fields.wire_length(), OFP_ALIGNMENT);
        Self { fields, pad }
    }

    /// Matches every packet.
    pub fn all() -> Self {
        Self::new(KeyedSet::new())
    }

    /// Header and fields, padding excluded.
    pub fn declared_length(&self) -> usize {
        self.fields.total_wire_length(MATCH_HEADER_SIZE)
    }

    /// Value of the length field.
    pub fn length(&self) -> u16 {
        self.declared_length() as u16
    }

    fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let kind = src.read_u16()?;
        if kind != MATCH_TYPE_OXM {
            return Err(Error::invalid(BAD_MATCH_BAD_TYPE, "only OXM matches are supported"));
        }
        let len = src.read_u16()? as usize;
        if len < MATCH_HEADER_SIZE {
            return Err(Error::bad_length(
                len,
                LengthRule::AtLeast(MATCH_HEADER_SIZE as u16),
            ));
        }
        let fields = KeyedSet::decode_bounded(src, len - MATCH_HEADER_SIZE)?;
        let pad = Padding::decode_to_align(src, len, OFP_ALIGNMENT)?;
        Ok(Self { fields, pad })
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::all()
    }
}

impl WireValue for Match {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.declared_length() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(MATCH_TYPE_OXM);
        dst.put_u16(self.length());
        self.fields.encode(dst);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Self::decode_inner(src).map_err(|e| e.within_category(CategoryId::MatchField))
    }

    /// Duplicate fields and stale padding are always refused, field values are checked when the
    /// validator recurses.
    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        let len = self.declared_length();
        check_length_field(len)
            .and_then(|()| self.pad.check_aligns(len, OFP_ALIGNMENT))
            .map_err(|e| e.within_category(CategoryId::MatchField))?;
        self.fields.validate(validator)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.fields.equivalent_as_set(&other.fields)
    }
}
