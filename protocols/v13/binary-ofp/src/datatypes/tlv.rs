//! The `type:u16, len:u16` prefix shared by actions, instructions, queue properties, meter bands,
//! table-feature properties and hello elements.

use alloc::vec::Vec;

use super::variant::{Category, Member, SubHeader};
use crate::codec::{Decoder, Encoder, WireValue};
use crate::error::Error;

pub const TLV_HEADER_LEN: usize = 4;

/// Peeks the type and length at the start of `src`.
pub fn peek_tlv_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
    Ok(SubHeader {
        tag: src.peek_u16_at(0)?,
        length: src.peek_u16_at(2)?,
    })
}

pub fn write_tlv_header(dst: &mut Vec<u8>, tag: u16, length: u16) {
    dst.put_u16(tag);
    dst.put_u16(length);
}

/// Reads the prefix of member `T` and returns the declared length.
///
/// Fails with `WrongVariant` when the type is not `T::TAG` and with `BadLength` when the length
/// breaks the length rule of `T`.
pub fn read_tlv_header<T>(src: &mut Decoder<'_>) -> Result<u16, Error>
where
    T: Member,
    T::Category: Category<Tag = u16>,
{
    let tag = src.read_u16()?;
    if tag != T::TAG {
        return Err(Error::WrongVariant {
            category: <T::Category as Category>::ID,
            expected: T::TAG as u64,
            actual: tag as u64,
        });
    }
    let length = src.read_u16()?;
    let rule = T::length_rule();
    if !rule.admits(length) {
        return Err(Error::bad_length(length as usize, rule));
    }
    Ok(length)
}
