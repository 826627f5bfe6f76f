//! Type-erased values and the per-category decoder dispatch.
//!
//! Every category of wire value (actions, instructions, match fields, ...) implements
//! [`Category`]: it says how to peek the tag and declared length out of the next sub-header
//! without consuming it. Each concrete type of the category implements [`Member`] and carries its
//! tag as an associated constant.
//!
//! A category's `Any*` enum holds exactly one member at a time. Its dispatch table is generated by
//! [`impl_variant!`](crate::impl_variant) from the list of members, so registering a new member is
//! a one-line change. Dispatch goes through these steps:
//!
//! 1. peek the sub-header, failing with `Truncated` if it is not all there;
//! 2. refuse declared lengths shorter than the sub-header (`BadLength`) and buffers shorter than
//!    the declared length plus alignment padding (`Truncated`);
//! 3. find the member registered for the tag;
//! 4. check the declared length against the member's length rule (`BadLength`);
//! 5. let the member decode itself from a decoder bounded to exactly its bytes. Bytes the member
//!    leaves unread are a `BadLength`.
//!
//! An unregistered tag yields `UnknownType`, unless the category registers an [`Opaque`] fallback
//! which then keeps the raw payload.

use core::fmt;

use tracing::{debug, trace};

use super::padding::padded_len;
use crate::codec::{Decoder, WireValue};
use crate::error::{CategoryId, Error, LengthRule};

/// Tag and declared length of the next value, read without consuming anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubHeader<T> {
    pub tag: T,
    pub length: u16,
}

pub trait Category {
    type Tag: Copy + Eq + fmt::Debug + Into<u64>;
    const ID: CategoryId;
    /// Size of the sub-header every member starts with.
    const HEADER_LEN: usize;
    /// Values are followed by padding up to this alignment. The padding is not part of the
    /// declared length.
    const ALIGNMENT: usize = 1;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<Self::Tag>, Error>;
}

pub type TagOf<C> = <C as Category>::Tag;

/// A concrete type registered in a category.
pub trait Member: WireValue {
    type Category: Category;
    const TAG: TagOf<Self::Category>;

    /// The length the sub-header declares, alignment padding excluded.
    fn declared_length(&self) -> usize {
        self.wire_length()
    }

    /// The length written in the sub-header. Only meaningful once `validate` has checked that
    /// [`Member::declared_length`] fits.
    fn length(&self) -> u16 {
        self.declared_length() as u16
    }
}

/// Catch-all member of an extensible category, holding an unregistered tag and its raw payload.
pub trait Opaque: WireValue {
    type Category: Category;

    fn tag(&self) -> TagOf<Self::Category>;

    fn declared_length(&self) -> usize;

    fn length(&self) -> u16 {
        self.declared_length() as u16
    }
}

/// The `Any*` enum of a category.
pub trait Variant: WireValue + Clone + fmt::Debug {
    type Category: Category;

    fn tag(&self) -> TagOf<Self::Category>;

    /// Declared length of the held member.
    fn declared_length(&self) -> usize;

    fn length(&self) -> u16 {
        self.declared_length() as u16
    }

    /// Selects, checks and decodes the member registered for `header.tag`.
    fn dispatch(
        header: &SubHeader<TagOf<Self::Category>>,
        src: &mut Decoder<'_>,
    ) -> Result<Self, Error>;

    fn get<T: MemberOf<Self>>(&self) -> Result<&T, Error> {
        T::from_variant(self).ok_or_else(|| wrong_variant::<Self, T>(self))
    }

    fn into_member<T: MemberOf<Self>>(self) -> Result<T, Error> {
        T::from_variant_owned(self).map_err(|v| wrong_variant::<Self, T>(&v))
    }

    fn is<T: MemberOf<Self>>(&self) -> bool {
        T::from_variant(self).is_some()
    }
}

/// Casts between a variant and one of its members. Implemented by
/// [`impl_variant!`](crate::impl_variant).
pub trait MemberOf<V: Variant>: Member<Category = <V as Variant>::Category> + Into<V> {
    fn from_variant(value: &V) -> Option<&Self>;

    fn from_variant_owned(value: V) -> Result<Self, V>;
}

fn wrong_variant<V: Variant, T: Member>(value: &V) -> Error {
    Error::WrongVariant {
        category: <V::Category as Category>::ID,
        expected: T::TAG.into(),
        actual: value.tag().into(),
    }
}

/// Decodes the next value of the category of `V`, whatever member it is.
pub fn decode_variant<V: Variant>(src: &mut Decoder<'_>) -> Result<V, Error> {
    let id = <V::Category as Category>::ID;
    let header_len = <V::Category as Category>::HEADER_LEN;
    let header =
        <V::Category as Category>::peek_header(src).map_err(|e| e.within_category(id))?;
    let tag: u64 = header.tag.into();
    let declared = header.length as usize;
    if declared < header_len {
        return Err(
            Error::bad_length(declared, LengthRule::AtLeast(header_len as u16)).within(id, tag),
        );
    }
    let size = padded_len(declared, <V::Category as Category>::ALIGNMENT);
    if src.remaining() < size {
        return Err(Error::truncated(size, src.remaining()).within(id, tag));
    }
    trace!("Dispatching {} 0x{:x} of {} bytes", id, tag, declared);
    V::dispatch(&header, src)
}

/// Checks the declared length against the length rule of `T` and decodes `T` from exactly its
/// bytes.
pub fn decode_member<T: Member>(
    header: &SubHeader<TagOf<T::Category>>,
    src: &mut Decoder<'_>,
) -> Result<T, Error> {
    let id = <T::Category as Category>::ID;
    let tag: u64 = T::TAG.into();
    let rule = T::length_rule();
    if !rule.admits(header.length) {
        return Err(Error::bad_length(header.length as usize, rule).within(id, tag));
    }
    decode_bounded::<T, T::Category>(header.length, src).map_err(|e| e.within(id, tag))
}

/// Decodes the opaque fallback of a category for an unregistered tag.
pub fn decode_fallback<O: Opaque>(
    header: &SubHeader<TagOf<O::Category>>,
    src: &mut Decoder<'_>,
) -> Result<O, Error> {
    let id = <O::Category as Category>::ID;
    let tag: u64 = header.tag.into();
    debug!("Unregistered {} type 0x{:x}, keeping its payload opaque", id, tag);
    decode_bounded::<O, O::Category>(header.length, src).map_err(|e| e.within(id, tag))
}

fn decode_bounded<T: WireValue, C: Category>(
    length: u16,
    src: &mut Decoder<'_>,
) -> Result<T, Error> {
    let size = padded_len(length as usize, C::ALIGNMENT);
    let mut body = src.take(size)?;
    let value = T::decode(&mut body)?;
    if !body.is_empty() {
        return Err(Error::bad_length(
            length as usize,
            LengthRule::exact(size - body.remaining()),
        ));
    }
    Ok(value)
}

/// Error for a tag with no registered member in a category without fallback.
pub fn unknown_type<C: Category>(tag: C::Tag) -> Error {
    let tag: u64 = tag.into();
    debug!("Unknown {} type 0x{:x}", C::ID, tag);
    Error::UnknownType { category: C::ID, tag }
}

/// Implements [`Variant`], [`WireValue`], `From<Member>` and [`MemberOf`] for the `Any*` enum of a
/// category.
///
/// ```ignore
/// impl_variant!(AnyHelloElement: HelloElements {
///     VersionBitmap(VersionBitmap),
/// } fallback Unknown(UnknownElement));
/// ```
#[macro_export]
macro_rules! impl_variant {
    (
        $name:ident : $category:ty {
            $( $member:ident($ty:ty) ),+ $(,)?
        }
        $( fallback $fallback:ident($fty:ty) )?
    ) => {
        impl $crate::Variant for $name {
            type Category = $category;

            fn tag(&self) -> <$category as $crate::Category>::Tag {
                match self {
                    $( $name::$member(_) => <$ty as $crate::Member>::TAG, )+
                    $( $name::$fallback(v) => <$fty as $crate::Opaque>::tag(v), )?
                }
            }

            fn declared_length(&self) -> usize {
                match self {
                    $( $name::$member(v) => <$ty as $crate::Member>::declared_length(v), )+
                    $( $name::$fallback(v) => <$fty as $crate::Opaque>::declared_length(v), )?
                }
            }

            #[allow(unreachable_code)]
            fn dispatch(
                header: &$crate::SubHeader<<$category as $crate::Category>::Tag>,
                src: &mut $crate::Decoder<'_>,
            ) -> Result<Self, $crate::Error> {
                $(
                    if header.tag == <$ty as $crate::Member>::TAG {
                        return $crate::decode_member::<$ty>(header, src).map($name::$member);
                    }
                )+
                $(
                    return $crate::decode_fallback::<$fty>(header, src).map($name::$fallback);
                )?
                Err($crate::unknown_type::<$category>(header.tag))
            }
        }

        impl $crate::WireValue for $name {
            const MIN_LENGTH: u16 = <$category as $crate::Category>::HEADER_LEN as u16;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                match self {
                    $( $name::$member(v) => $crate::WireValue::wire_length(v), )+
                    $( $name::$fallback(v) => $crate::WireValue::wire_length(v), )?
                }
            }

            fn encode(&self, dst: &mut $crate::__private::Vec<u8>) {
                match self {
                    $( $name::$member(v) => $crate::WireValue::encode(v, dst), )+
                    $( $name::$fallback(v) => $crate::WireValue::encode(v, dst), )?
                }
            }

            fn decode(src: &mut $crate::Decoder<'_>) -> Result<Self, $crate::Error> {
                $crate::decode_variant::<$name>(src)
            }

            fn validate<Vd: $crate::Validator>(
                &self,
                validator: &Vd,
            ) -> Result<(), $crate::Error> {
                let result = $crate::check_length_field($crate::Variant::declared_length(self))
                    .and_then(|()| match self {
                        $( $name::$member(v) => $crate::WireValue::validate(v, validator), )+
                        $( $name::$fallback(v) => $crate::WireValue::validate(v, validator), )?
                    });
                result.map_err(|e| {
                    e.within(
                        <$category as $crate::Category>::ID,
                        $crate::Variant::tag(self).into(),
                    )
                })
            }

            #[allow(unreachable_patterns)]
            fn byte_eq(&self, other: &Self) -> bool {
                match (self, other) {
                    $( ($name::$member(a), $name::$member(b)) => $crate::WireValue::byte_eq(a, b), )+
                    $( ($name::$fallback(a), $name::$fallback(b)) => $crate::WireValue::byte_eq(a, b), )?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn equivalent(&self, other: &Self) -> bool {
                match (self, other) {
                    $( ($name::$member(a), $name::$member(b)) => $crate::WireValue::equivalent(a, b), )+
                    $( ($name::$fallback(a), $name::$fallback(b)) => $crate::WireValue::equivalent(a, b), )?
                    _ => false,
                }
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    $name::$member(v)
                }
            }

            impl $crate::MemberOf<$name> for $ty {
                #[allow(unreachable_patterns)]
                fn from_variant(value: &$name) -> Option<&Self> {
                    match value {
                        $name::$member(v) => Some(v),
                        _ => None,
                    }
                }

                #[allow(unreachable_patterns)]
                fn from_variant_owned(value: $name) -> Result<Self, $name> {
                    match value {
                        $name::$member(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )+

        $(
            impl From<$fty> for $name {
                fn from(v: $fty) -> Self {
                    $name::$fallback(v)
                }
            }
        )?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Recursive, Shallow};
    use crate::fixtures::*;
    use alloc::vec;

    #[test]
    fn test_dispatch_selects_member() {
        let bytes = Square { side: 7 }.to_bytes();
        let shape = AnyShape::from_bytes(&bytes).unwrap();
        assert_eq!(shape.tag(), 1);
        assert_eq!(shape.length(), 8);
        assert_eq!(shape.get::<Square>().unwrap().side, 7);
        assert!(shape.is::<Square>());
        assert!(!shape.is::<Label>());
    }

    #[test]
    fn test_wrong_variant() {
        let shape = AnyShape::from(Square { side: 7 });
        assert_eq!(
            shape.get::<Label>(),
            Err(Error::WrongVariant {
                category: CategoryId::HelloElement,
                expected: 2,
                actual: 1,
            })
        );
        assert!(shape.clone().into_member::<Label>().is_err());
        assert_eq!(shape.into_member::<Square>(), Ok(Square { side: 7 }));
    }

    #[test]
    fn test_unknown_type_without_fallback() {
        let bytes = [0x00, 0x09, 0x00, 0x08, 0, 0, 0, 0];
        assert_eq!(
            AnyColor::from_bytes(&bytes),
            Err(Error::UnknownType {
                category: CategoryId::Action,
                tag: 9,
            })
        );
    }

    #[test]
    fn test_unknown_type_with_fallback_keeps_payload() {
        let bytes = [0x00, 0x09, 0x00, 0x06, 0xaa, 0xbb, 0x01, 0x02];
        let shape = AnyShape::from_bytes(&bytes).unwrap();
        assert_eq!(shape.tag(), 9);
        assert_eq!(shape.length(), 6);
        assert_eq!(shape.wire_length(), 8);
        let other = match &shape {
            AnyShape::Other(o) => o,
            _ => panic!("expected the opaque fallback"),
        };
        assert_eq!(other.payload, vec![0xaa, 0xbb]);
        assert_eq!(shape.to_bytes(), bytes);
    }

    #[test]
    fn test_member_longer_than_length_field() {
        let shape = AnyShape::from(Label::new(&vec![b'a'; 70_000]));
        assert_eq!(shape.declared_length(), 70_004);
        assert_eq!(
            shape.validate(&Shallow),
            Err(Error::BadLength {
                context: crate::Context::new(CategoryId::HelloElement, 2),
                declared: 70_004,
                rule: LengthRule::AtMost(u16::MAX),
            })
        );
        let shape = AnyShape::from(Label::new(&vec![b'a'; 60_000]));
        assert_eq!(shape.validate(&Shallow), Ok(()));
    }

    #[test]
    fn test_fixed_length_mismatch_is_bad_length() {
        // A square declaring 12 bytes.
        let bytes = [0x00, 0x01, 0x00, 0x0c, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            AnyShape::from_bytes(&bytes),
            Err(Error::BadLength {
                context: crate::Context::new(CategoryId::HelloElement, 1),
                declared: 12,
                rule: LengthRule::Exact(8),
            })
        );
    }

    #[test]
    fn test_length_shorter_than_header_is_bad_length() {
        let bytes = [0x00, 0x02, 0x00, 0x02, 0, 0, 0, 0];
        assert!(matches!(
            AnyShape::from_bytes(&bytes),
            Err(Error::BadLength { declared: 2, .. })
        ));
    }

    #[test]
    fn test_declared_length_past_end_is_truncated() {
        let bytes = [0x00, 0x02, 0x00, 0x0a, b'a', b'b', b'c', b'd'];
        assert!(matches!(
            AnyShape::from_bytes(&bytes),
            Err(Error::Truncated { required: 16, remaining: 8, .. })
        ));
    }

    #[test]
    fn test_members_of_different_types_never_compare_equal() {
        let a = AnyColor::from(Red::new(3));
        let b = AnyColor::from(Blue { level: 3 });
        assert!(!a.byte_eq(&b));
        assert!(!a.equivalent(&b));
        assert!(a.equivalent(&a.clone()));
    }

    #[test]
    fn test_validate_adds_category_context() {
        let color = AnyColor::from(Blue { level: 101 });
        let err = color.validate(&Shallow).unwrap_err();
        assert_eq!(err.context(), crate::Context::new(CategoryId::Action, 2));
        assert!(color.validate(&Recursive).is_err());
        assert!(AnyColor::from(Blue { level: 100 }).validate(&Shallow).is_ok());
    }

    #[quickcheck_macros::quickcheck]
    fn test_label_round_trip(text: alloc::vec::Vec<u8>) -> bool {
        let text: alloc::vec::Vec<u8> = text.into_iter().take(200).collect();
        let label = AnyShape::from(Label::new(&text));
        let bytes = label.to_bytes();
        bytes.len() % 8 == 0
            && AnyShape::from_bytes(&bytes) == Ok(label.clone())
            && label.length() as usize == 4 + text.len()
    }
}
