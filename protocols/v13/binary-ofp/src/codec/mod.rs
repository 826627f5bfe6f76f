//! The uniform contract every wire value fulfils.
//!
//! A wire value knows its smallest legal length, whether that length is fixed, how many bytes it
//! encodes to, how to append itself to a buffer and how to read itself back from a bounded
//! [`Decoder`]. Decoding re-reads the value's own sub-header, so a value can be decoded on its own
//! as well as through the dispatch table of its category.
//!
//! Two notions of equality are kept apart:
//! - [`WireValue::byte_eq`]: the encodings are identical, padding included. `PartialEq` on the
//!   types of this workspace means the same thing.
//! - [`WireValue::equivalent`]: the values mean the same thing to the protocol (padding ignored,
//!   disabled values compared as equal, masked bits ignored, sets compared without order).

pub mod decoder;
pub mod encoder;

use alloc::vec::Vec;

pub use decoder::Decoder;
pub use encoder::Encoder;

use crate::error::{Error, LengthRule};

pub trait WireValue: Sized {
    /// Smallest legal wire length.
    const MIN_LENGTH: u16;
    /// When `true` the wire length is always [`WireValue::MIN_LENGTH`].
    const FIXED_LENGTH: bool;

    /// Number of bytes [`WireValue::encode`] appends, own padding included.
    fn wire_length(&self) -> usize;

    /// Appends the exact wire bytes of `self` to `dst`.
    fn encode(&self, dst: &mut Vec<u8>);

    /// Reads one value from `src`, consuming exactly its own bytes.
    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error>;

    /// Checks the invariants the protocol puts on the value. Nested values are only checked when
    /// the validator asks for it.
    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        Ok(())
    }

    fn byte_eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.byte_eq(other)
    }

    fn length_rule() -> LengthRule {
        if Self::FIXED_LENGTH {
            LengthRule::Exact(Self::MIN_LENGTH)
        } else {
            LengthRule::AtLeast(Self::MIN_LENGTH)
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut dst = Vec::with_capacity(self.wire_length());
        self.encode(&mut dst);
        dst
    }

    /// Decodes a value that must span the whole of `data`.
    fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut src = Decoder::new(data);
        let value = Self::decode(&mut src)?;
        if src.is_empty() {
            Ok(value)
        } else {
            Err(Error::bad_length(
                data.len(),
                LengthRule::exact(src.position()),
            ))
        }
    }
}

/// Fails with `BadLength` when `len` does not fit the `u16` field that declares it on the wire.
pub fn check_length_field(len: usize) -> Result<(), Error> {
    if len > u16::MAX as usize {
        return Err(Error::bad_length(len, LengthRule::AtMost(u16::MAX)));
    }
    Ok(())
}

/// How deep [`WireValue::validate`] goes.
pub trait Validator {
    /// Called by containers for each nested value.
    fn nested<T: WireValue>(&self, value: &T) -> Result<(), Error>;
}

/// Checks each value's own fields, leaving nested values alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Shallow;

/// Checks each value and everything nested in it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Recursive;

impl Validator for Shallow {
    fn nested<T: WireValue>(&self, _value: &T) -> Result<(), Error> {
        Ok(())
    }
}

impl Validator for Recursive {
    fn nested<T: WireValue>(&self, value: &T) -> Result<(), Error> {
        value.validate(self)
    }
}

macro_rules! impl_wire_value_for_unsigned {
    ($t:ty, $size:expr, $put:ident, $read:ident) => {
        impl WireValue for $t {
            const MIN_LENGTH: u16 = $size;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                $size
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                dst.$put(*self);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                src.$read()
            }
        }
    };
}
impl_wire_value_for_unsigned!(u8, 1, put_u8, read_u8);
impl_wire_value_for_unsigned!(u16, 2, put_u16, read_u16);
impl_wire_value_for_unsigned!(u32, 4, put_u32, read_u32);
impl_wire_value_for_unsigned!(u64, 8, put_u64, read_u64);
