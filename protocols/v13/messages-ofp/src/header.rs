use std::sync::atomic::{AtomicU32, Ordering};

use binary_ofp::{
    check_length_field, Category, CategoryId, Decoder, Encoder, Error, Member, SubHeader,
    WireValue,
};
use const_ofp::{BAD_REQUEST_BAD_VERSION, OFP_HEADER_LEN_OFFSET, OFP_HEADER_SIZE, OFP_VERSION};

/// The message category. Every message starts with a [`Header`]; the tag is the message type.
pub struct Messages;

impl Category for Messages {
    type Tag = u8;
    const ID: CategoryId = CategoryId::Message;
    const HEADER_LEN: usize = OFP_HEADER_SIZE;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u8>, Error> {
        if src.remaining() < OFP_HEADER_SIZE {
            return Err(Error::truncated(OFP_HEADER_SIZE, src.remaining()));
        }
        check_version(src.peek_u8_at(0)?)?;
        Ok(SubHeader {
            tag: src.peek_u8_at(1)?,
            length: src.peek_u16_at(OFP_HEADER_LEN_OFFSET)?,
        })
    }
}

fn check_version(version: u8) -> Result<(), Error> {
    if version != OFP_VERSION {
        return Err(Error::invalid(
            BAD_REQUEST_BAD_VERSION,
            "unsupported protocol version",
        ));
    }
    Ok(())
}

/// `version:u8, type:u8, length:u16, xid:u32`. The length covers the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub kind: u8,
    pub length: u16,
    pub xid: u32,
}

impl Header {
    pub const SIZE: usize = OFP_HEADER_SIZE;

    pub fn new(kind: u8, length: u16, xid: u32) -> Self {
        Self {
            version: OFP_VERSION,
            kind,
            length,
            xid,
        }
    }

    /// Length of the message body, header excluded.
    pub fn body_len(&self) -> usize {
        (self.length as usize).saturating_sub(Self::SIZE)
    }
}

impl WireValue for Header {
    const MIN_LENGTH: u16 = OFP_HEADER_SIZE as u16;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u8(self.version);
        dst.put_u8(self.kind);
        dst.put_u16(self.length);
        dst.put_u32(self.xid);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(Self {
            version: src.read_u8()?,
            kind: src.read_u8()?,
            length: src.read_u16()?,
            xid: src.read_u32()?,
        })
    }
}

/// Reads the header of message `T` and checks it against `T`: version, type, length rule and
/// that the whole body is there.
pub(crate) fn read_message_header<T>(src: &mut Decoder<'_>) -> Result<Header, Error>
where
    T: Member<Category = Messages>,
{
    read_checked::<T>(src).map_err(|e| e.within(CategoryId::Message, T::TAG as u64))
}

fn read_checked<T>(src: &mut Decoder<'_>) -> Result<Header, Error>
where
    T: Member<Category = Messages>,
{
    let header = Header::decode(src)?;
    check_version(header.version)?;
    if header.kind != T::TAG {
        return Err(Error::WrongVariant {
            category: CategoryId::Message,
            expected: T::TAG as u64,
            actual: header.kind as u64,
        });
    }
    let rule = T::length_rule();
    if !rule.admits(header.length) {
        return Err(Error::bad_length(header.length as usize, rule));
    }
    if src.remaining() < header.body_len() {
        return Err(Error::truncated(header.body_len(), src.remaining()));
    }
    Ok(header)
}

pub(crate) fn write_message_header<T>(dst: &mut Vec<u8>, message: &T, xid: u32)
where
    T: Member<Category = Messages>,
{
    Header::new(T::TAG, message.wire_length() as u16, xid).encode(dst);
}

/// Tags a validation failure of message `T` with the message type, so that it is classified
/// under the error type of that message.
pub(crate) fn within_message<T>(result: Result<(), Error>) -> Result<(), Error>
where
    T: Member<Category = Messages>,
{
    result.map_err(|e| e.within(CategoryId::Message, T::TAG as u64))
}

/// Refuses a message whose length does not fit the length field of its header.
pub(crate) fn check_message_length<T>(message: &T) -> Result<(), Error>
where
    T: Member<Category = Messages>,
{
    within_message::<T>(check_length_field(message.wire_length()))
}

/// Decodes `T` values back to back until `body` is exhausted.
pub(crate) fn decode_all<T: WireValue>(body: &mut Decoder<'_>) -> Result<Vec<T>, Error> {
    let mut values = Vec::new();
    while !body.is_empty() {
        values.push(T::decode(body)?);
    }
    Ok(values)
}

/// Hands out transaction ids for outbound requests.
///
/// The factory is shared by reference (or in an `Arc`) between everything that builds requests
/// on one connection. Ids start at 1 and wrap around.
#[derive(Debug, Default)]
pub struct XidFactory {
    state: AtomicU32,
}

impl XidFactory {
    pub fn new() -> Self {
        Self {
            state: AtomicU32::new(0),
        }
    }

    /// The first call to [`XidFactory::next`] returns `xid`.
    pub fn starting_at(xid: u32) -> Self {
        Self {
            state: AtomicU32::new(xid.wrapping_sub(1)),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> u32 {
        self.state.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}
