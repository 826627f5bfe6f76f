//! Collections where each canonical key may appear once.
//!
//! A [`KeyedSet`] has the same wire shape as an [`OrderedList`] but its elements are identified by
//! a canonical key derived from their tag. Duplicates are accepted when building or decoding a
//! set and reported by [`WireValue::validate`] as `DuplicateKey`, so a peer's message can be
//! decoded first and rejected with a precise error afterwards.

use alloc::vec;
use alloc::vec::Vec;
use core::{mem, slice};

use super::list::OrderedList;
use super::variant::{Category, Member, MemberOf, TagOf, Variant};
use crate::codec::{Decoder, Validator, WireValue};
use crate::error::Error;

/// Maps a category's tags onto the order the protocol processes them in.
pub trait CanonicalOrder: Variant {
    fn canonical_key(tag: TagOf<Self::Category>) -> u64;

    /// Key of this value. Categories may refine it beyond the tag, keeping the tag's canonical
    /// key as the sort order.
    fn key(&self) -> u64 {
        Self::canonical_key(self.tag())
    }

    /// The tag key of member `T`, known without a value.
    fn key_of<T: MemberOf<Self>>() -> u64 {
        Self::canonical_key(<T as Member>::TAG)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    key: u64,
    value: V,
}

/// Insertion ordered set of values keyed by [`CanonicalOrder::key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedSet<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for KeyedSet<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: CanonicalOrder> KeyedSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value`. A value with the same key already in the set is not replaced, the
    /// duplicate is reported by `validate`.
    pub fn insert<T: Into<V>>(&mut self, value: T) {
        let value = value.into();
        self.entries.push(Entry {
            key: value.key(),
            value,
        });
    }

    /// Replaces the element sharing the key of `value`, or appends it. Returns the replaced
    /// element.
    pub fn replace<T: Into<V>>(&mut self, value: T) -> Option<V> {
        let value = value.into();
        let key = value.key();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => Some(mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(Entry { key, value });
                None
            }
        }
    }

    /// Removes the first element with `key`.
    pub fn remove(&mut self, key: u64) -> Option<V> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index).value)
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    /// The first element of member type `T`, if present.
    pub fn find<T: MemberOf<V>>(&self) -> Option<&T> {
        self.entries.iter().find_map(|e| T::from_variant(&e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First key held by more than one element, in insertion order.
    pub fn first_duplicate(&self) -> Option<u64> {
        self.entries
            .iter()
            .enumerate()
            .find(|(i, e)| self.entries[..*i].iter().any(|p| p.key == e.key))
            .map(|(_, e)| e.key)
    }

    /// The same elements sorted by ascending canonical key. Elements sharing a key keep their
    /// relative order.
    pub fn into_canonical(mut self) -> Self {
        self.entries.sort_by_key(|e| e.key);
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].key <= w[1].key)
    }

    /// Same elements under the same keys, in any order. Each element of `other` stands for one
    /// element of `self` only, so repeated keys must be repeated as often on both sides.
    pub fn equivalent_as_set(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut used = vec![false; other.len()];
        self.entries.iter().all(|e| {
            let found = other.entries.iter().zip(used.iter_mut()).find(|(o, taken)| {
                !**taken && o.key == e.key && o.value.equivalent(&e.value)
            });
            match found {
                Some((_, taken)) => {
                    *taken = true;
                    true
                }
                None => false,
            }
        })
    }

    pub fn total_wire_length(&self, base: usize) -> usize {
        base + self
            .entries
            .iter()
            .map(|e| e.value.wire_length())
            .sum::<usize>()
    }

    /// Moves the elements out, leaving an empty set.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    pub fn into_list(self) -> OrderedList<V> {
        self.entries.into_iter().map(|e| e.value).collect()
    }

    /// Decodes a set spanning the next `len` bytes of `src`.
    pub fn decode_bounded(src: &mut Decoder<'_>, len: usize) -> Result<Self, Error> {
        OrderedList::<V>::decode_bounded(src, len).map(Self::from)
    }
}

impl<V: CanonicalOrder> WireValue for KeyedSet<V> {
    const MIN_LENGTH: u16 = 0;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.total_wire_length(0)
    }

    /// Insertion order. Call sites needing the protocol order encode
    /// [`KeyedSet::into_canonical`].
    fn encode(&self, dst: &mut Vec<u8>) {
        for entry in &self.entries {
            entry.value.encode(dst);
        }
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        OrderedList::<V>::decode(src).map(Self::from)
    }

    fn validate<Vd: Validator>(&self, validator: &Vd) -> Result<(), Error> {
        if let Some(key) = self.first_duplicate() {
            return Err(Error::DuplicateKey {
                category: <V::Category as Category>::ID,
                key,
            });
        }
        self.entries
            .iter()
            .try_for_each(|e| validator.nested(&e.value))
    }

    fn byte_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.value.byte_eq(&b.value))
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.equivalent_as_set(other)
    }
}

impl<V: CanonicalOrder> From<OrderedList<V>> for KeyedSet<V> {
    fn from(list: OrderedList<V>) -> Self {
        list.into_iter().collect()
    }
}

impl<V: CanonicalOrder> FromIterator<V> for KeyedSet<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<V: CanonicalOrder> Extend<V> for KeyedSet<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

pub struct Iter<'a, V> {
    inner: slice::Iter<'a, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|e| &e.value)
    }
}

impl<'a, V: CanonicalOrder> IntoIterator for &'a KeyedSet<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> IntoIterator for KeyedSet<V> {
    type Item = V;
    type IntoIter = alloc::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(|e| e.value)
            .collect::<Vec<_>>()
            .into_iter()
    }
}
