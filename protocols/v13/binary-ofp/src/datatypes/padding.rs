use alloc::vec::Vec;

use crate::codec::{Decoder, Encoder};
use crate::error::{Error, LengthRule};

/// Length of `len` rounded up to the next multiple of `alignment`.
pub const fn padded_len(len: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        len
    } else {
        (len + alignment - 1) / alignment * alignment
    }
}

/// Number of padding bytes needed after a value of `len` bytes.
pub const fn pad_len(len: usize, alignment: usize) -> usize {
    padded_len(len, alignment) - len
}

/// Trailing padding owned by a value.
///
/// The bytes are kept as received so that re-encoding a decoded value reproduces the input
/// exactly. Values built locally get zeroed padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Padding(Vec<u8>);

impl Padding {
    pub fn zeroed(len: usize) -> Self {
        let mut bytes = Vec::new();
        bytes.resize(len, 0);
        Self(bytes)
    }

    /// Zeroed padding that aligns a value of `len` bytes.
    pub fn to_align(len: usize, alignment: usize) -> Self {
        Self::zeroed(pad_len(len, alignment))
    }

    pub fn decode(src: &mut Decoder<'_>, len: usize) -> Result<Self, Error> {
        Ok(Self(src.read_bytes(len)?.to_vec()))
    }

    /// Reads the padding that follows a value of `len` bytes.
    pub fn decode_to_align(
        src: &mut Decoder<'_>,
        len: usize,
        alignment: usize,
    ) -> Result<Self, Error> {
        Self::decode(src, pad_len(len, alignment))
    }

    pub fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_slice(&self.0);
    }

    /// Fails with `BadLength` unless this is the padding that aligns a value of `len` bytes.
    pub fn check_aligns(&self, len: usize, alignment: usize) -> Result<(), Error> {
        if self.len() != pad_len(len, alignment) {
            return Err(Error::bad_length(
                len + self.len(),
                LengthRule::exact(padded_len(len, alignment)),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zeroed(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Padding {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0, 8), 0);
        assert_eq!(padded_len(6, 8), 8);
        assert_eq!(padded_len(8, 8), 8);
        assert_eq!(padded_len(9, 8), 16);
        assert_eq!(padded_len(9, 1), 9);
        assert_eq!(pad_len(12, 8), 4);
    }

    #[test]
    fn test_decoded_padding_is_kept_verbatim() {
        let data = [0xde, 0xad, 0xbe, 0xef];
        let mut src = Decoder::new(&data);
        let pad = Padding::decode_to_align(&mut src, 12, 8).unwrap();
        assert!(!pad.is_zeroed());
        let mut dst = vec![];
        pad.encode(&mut dst);
        assert_eq!(dst, data);
    }

    #[test]
    fn test_check_aligns() {
        assert_eq!(Padding::zeroed(4).check_aligns(12, 8), Ok(()));
        assert_eq!(Padding::zeroed(0).check_aligns(16, 8), Ok(()));
        assert_eq!(
            Padding::zeroed(4).check_aligns(14, 8),
            Err(Error::bad_length(18, LengthRule::Exact(16)))
        );
    }

    #[quickcheck_macros::quickcheck]
    fn test_to_align_reaches_alignment(len: u16) -> bool {
        let len = len as usize;
        let pad = Padding::to_align(len, 8);
        (len + pad.len()) % 8 == 0 && pad.len() < 8 && pad.is_zeroed()
    }
}
