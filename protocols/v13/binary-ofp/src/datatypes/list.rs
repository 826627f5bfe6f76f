use alloc::vec::Vec;
use core::{mem, slice};

use super::variant::{decode_variant, Variant};
use crate::codec::{Decoder, Validator, WireValue};
use crate::error::Error;

/// Insertion ordered sequence of values of one category.
///
/// On the wire the elements follow each other, each with the padding its category prescribes.
/// There is no count or length prefix: the enclosing structure supplies the bound (usually a
/// length field) and decoding consumes elements until the bound is reached.
///
/// Moving a list is O(1). [`OrderedList::take`] (or `core::mem::take`) leaves an empty list
/// behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList<V> {
    inner: Vec<V>,
}

impl<V> Default for OrderedList<V> {
    fn default() -> Self {
        Self { inner: Vec::new() }
    }
}

impl<V: Variant> OrderedList<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: Into<V>>(&mut self, value: T) {
        self.inner.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.inner.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[V] {
        &self.inner
    }

    pub fn into_inner(self) -> Vec<V> {
        self.inner
    }

    /// Moves the elements out, leaving an empty list.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// `base` plus the padded length of every element.
    pub fn total_wire_length(&self, base: usize) -> usize {
        base + self.inner.iter().map(|v| v.wire_length()).sum::<usize>()
    }

    /// Decodes a list spanning the next `len` bytes of `src`.
    pub fn decode_bounded(src: &mut Decoder<'_>, len: usize) -> Result<Self, Error> {
        let mut body = src.take(len)?;
        Self::decode(&mut body)
    }
}

impl<V: Variant> WireValue for OrderedList<V> {
    const MIN_LENGTH: u16 = 0;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.total_wire_length(0)
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        for value in &self.inner {
            value.encode(dst);
        }
    }

    /// Consumes elements until `src` is exhausted.
    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut inner = Vec::new();
        while !src.is_empty() {
            inner.push(decode_variant::<V>(src)?);
        }
        Ok(Self { inner })
    }

    fn validate<Vd: Validator>(&self, validator: &Vd) -> Result<(), Error> {
        self.inner.iter().try_for_each(|v| validator.nested(v))
    }

    fn byte_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .inner
                .iter()
                .zip(other.inner.iter())
                .all(|(a, b)| a.byte_eq(b))
    }

    /// Element-wise in order.
    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .inner
                .iter()
                .zip(other.inner.iter())
                .all(|(a, b)| a.equivalent(b))
    }
}

impl<V> From<Vec<V>> for OrderedList<V> {
    fn from(inner: Vec<V>) -> Self {
        Self { inner }
    }
}

impl<V> FromIterator<V> for OrderedList<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<V> Extend<V> for OrderedList<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.inner.extend(iter)
    }
}

impl<V> IntoIterator for OrderedList<V> {
    type Item = V;
    type IntoIter = alloc::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a OrderedList<V> {
    type Item = &'a V;
    type IntoIter = slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Recursive, Shallow};
    use crate::fixtures::*;
    use alloc::vec;

    fn two_shapes() -> OrderedList<AnyShape> {
        let mut list = OrderedList::new();
        list.push(Label::new(b"abcdef"));
        list.push(Square { side: 3 });
        list
    }

    #[test]
    fn test_encode_in_insertion_order_with_padding() {
        let list = two_shapes();
        let bytes = list.to_bytes();
        assert_eq!(
            bytes,
            vec![
                0, 2, 0, 10, b'a', b'b', b'c', b'd', b'e', b'f', 0, 0, 0, 0, 0, 0, // label
                0, 1, 0, 8, 0, 0, 0, 3, // square
            ]
        );
        assert_eq!(list.total_wire_length(8), 8 + 16 + 8);
        assert_eq!(OrderedList::<AnyShape>::from_bytes(&bytes), Ok(list));
    }

    #[test]
    fn test_empty_list() {
        let list = OrderedList::<AnyShape>::from_bytes(&[]).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.total_wire_length(4), 4);
    }

    #[test]
    fn test_decode_bounded_stops_at_bound() {
        let mut bytes = two_shapes().to_bytes();
        bytes.extend_from_slice(&[0xff; 4]);
        let mut src = Decoder::new(&bytes);
        let list = OrderedList::<AnyShape>::decode_bounded(&mut src, 24).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(src.remaining(), 4);
    }

    #[test]
    fn test_take_leaves_empty_list() {
        let mut list = two_shapes();
        let moved = list.take();
        assert!(list.is_empty());
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_validate_is_shallow_unless_recursive() {
        let list: OrderedList<AnyColor> =
            vec![AnyColor::from(Red::new(1)), AnyColor::from(Blue { level: 500 })].into();
        assert!(list.validate(&Shallow).is_ok());
        assert!(matches!(
            list.validate(&Recursive),
            Err(Error::InvalidValue { code: 5, .. })
        ));
    }

    #[test]
    fn test_equivalence_is_ordered() {
        let a: OrderedList<AnyColor> =
            vec![AnyColor::from(Red::new(1)), AnyColor::from(Blue { level: 2 })].into();
        let b: OrderedList<AnyColor> =
            vec![AnyColor::from(Blue { level: 2 }), AnyColor::from(Red::new(1))].into();
        assert!(!a.equivalent(&b));
        assert!(a.equivalent(&a.clone()));
    }

    #[test]
    fn test_two_tags_aligned_to_eight() {
        let mut list = OrderedList::<AnyBlob>::new();
        list.push(Blob::<1>::new(&[0x00]));
        list.push(Blob::<2>::new(&[0xff]));
        let bytes = list.to_bytes();
        // 5 bytes each, plus 3 bytes of padding each.
        assert_eq!(bytes.len(), 5 + 3 + 5 + 3);
        assert_eq!(list.total_wire_length(0), bytes.len());
        assert_eq!(
            bytes,
            vec![0, 1, 0, 5, 0x00, 0, 0, 0, 0, 2, 0, 5, 0xff, 0, 0, 0]
        );

        let decoded = OrderedList::<AnyBlob>::from_bytes(&bytes).unwrap();
        let tags: Vec<u16> = decoded.iter().map(|v| v.tag()).collect();
        assert_eq!(tags, vec![1, 2]);
        assert_eq!(decoded.get(0).unwrap().get::<Blob<1>>().unwrap().payload, vec![0x00]);
        assert_eq!(decoded.get(1).unwrap().get::<Blob<2>>().unwrap().payload, vec![0xff]);
        assert!(decoded.byte_eq(&list));
    }

    #[test]
    fn test_padding_divergence() {
        let zero = [0, 1, 0, 8, 0, 7, 0, 0];
        let junk = [0, 1, 0, 8, 0, 7, 0xab, 0xcd];
        let a = OrderedList::<AnyColor>::from_bytes(&zero).unwrap();
        let b = OrderedList::<AnyColor>::from_bytes(&junk).unwrap();
        assert!(!a.byte_eq(&b));
        assert!(a.equivalent(&b));
        assert_eq!(b.to_bytes(), junk);
    }

    #[quickcheck_macros::quickcheck]
    fn test_every_prefix_is_truncated(sides: Vec<u32>, texts: Vec<Vec<u8>>) -> bool {
        let mut list = OrderedList::<AnyShape>::new();
        for (side, text) in sides.into_iter().zip(texts).take(8) {
            list.push(Square { side });
            list.push(Label::new(&text[..text.len().min(40)]));
        }
        let bytes = list.to_bytes();
        (0..bytes.len()).all(|cut| {
            // Cuts at an element boundary decode a shorter valid list.
            match OrderedList::<AnyShape>::from_bytes(&bytes[..cut]) {
                Ok(shorter) => shorter.wire_length() == cut,
                Err(Error::Truncated { .. }) => true,
                Err(_) => false,
            }
        }) && OrderedList::<AnyShape>::from_bytes(&bytes) == Ok(list)
    }
}
