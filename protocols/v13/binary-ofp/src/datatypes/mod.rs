pub mod list;
pub mod padding;
pub mod set;
pub mod tlv;
pub mod variant;

pub use list::OrderedList;
pub use padding::{pad_len, padded_len, Padding};
pub use set::{CanonicalOrder, KeyedSet};
pub use tlv::{peek_tlv_header, read_tlv_header, write_tlv_header, TLV_HEADER_LEN};
pub use variant::{
    decode_fallback, decode_member, decode_variant, unknown_type, Category, Member, MemberOf,
    Opaque, SubHeader, TagOf, Variant,
};
