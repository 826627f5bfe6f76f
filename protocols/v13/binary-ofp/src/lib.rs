//! Defines the data format shared by every ofp value: how values are laid out on the wire, how a
//! category of values is dispatched on its tag, and the two containers values are grouped in.
//!
//! # Overview
//!
//! All integers are big-endian. Values are appended to a growable `Vec<u8>` by
//! [`WireValue::encode`] and read back from a bounded [`Decoder`] by [`WireValue::decode`].
//!
//! ```txt
//! WireValue         <-> any fixed or variable length value
//! Member            <-> a concrete type registered in a Category under a tag
//! Any* (Variant)    <-> one member of a category, selected by the dispatch table
//! OrderedList<V>    <-> elements back to back, each padded as its category says
//! KeyedSet<V>       <-> same wire shape, one element per canonical key
//! ```
//!
//! # Equality
//!
//! `PartialEq` and [`WireValue::byte_eq`] compare encodings, padding included.
//! [`WireValue::equivalent`] compares what the protocol considers meaningful.
//!
//! # Error Handling
//!
//! Every failure is an [`Error`] carrying the category and tag it happened in. [`Error::code`]
//! classifies it into the [`ErrorCode`] a peer would be sent, and [`render`] turns an error code
//! into text.
//!
//! # Logging
//!
//! Dispatch decisions are traced with `tracing`; unregistered tags are logged at `debug`.

#![no_std]

extern crate alloc;

mod codec;
mod datatypes;
mod error;
pub mod error_code;
#[cfg(test)]
mod fixtures;

pub use crate::codec::{
    check_length_field, Decoder, Encoder, Recursive, Shallow, Validator, WireValue,
};
pub use crate::datatypes::{
    decode_fallback, decode_member, decode_variant, pad_len, padded_len, peek_tlv_header,
    read_tlv_header, unknown_type, write_tlv_header, CanonicalOrder, Category, KeyedSet, Member,
    MemberOf, Opaque, OrderedList, Padding, SubHeader, TagOf, Variant, TLV_HEADER_LEN,
};
pub use crate::error::{CategoryId, Context, Error, LengthRule};
pub use crate::error_code::{render, ErrorCode, ErrorType, LibraryCategory, LibraryCode};

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec::Vec;
}
