use byteorder::{BigEndian, ByteOrder};

use crate::error::Error;

/// Read cursor over a borrowed byte slice.
///
/// The end of the slice is the decode bound: nothing past it is ever read. Enclosing length
/// fields are turned into tighter bounds with [`Decoder::take`].
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, required: usize) -> Result<(), Error> {
        let remaining = self.remaining();
        if remaining < required {
            Err(Error::truncated(required, remaining))
        } else {
            Ok(())
        }
    }

    /// Returns the next `len` bytes without consuming them.
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8], Error> {
        self.ensure(len)?;
        Ok(&self.data[self.position..self.position + len])
    }

    pub fn peek_u8_at(&self, offset: usize) -> Result<u8, Error> {
        Ok(self.peek_bytes(offset + 1)?[offset])
    }

    pub fn peek_u16_at(&self, offset: usize) -> Result<u16, Error> {
        let bytes = self.peek_bytes(offset + 2)?;
        Ok(BigEndian::read_u16(&bytes[offset..]))
    }

    pub fn peek_u32_at(&self, offset: usize) -> Result<u32, Error> {
        let bytes = self.peek_bytes(offset + 4)?;
        Ok(BigEndian::read_u32(&bytes[offset..]))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let bytes = self.peek_bytes(len)?;
        self.position += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.read_bytes(len).map(|_| ())
    }

    /// Consumes `len` bytes and returns a decoder bounded to exactly those bytes.
    pub fn take(&mut self, len: usize) -> Result<Decoder<'a>, Error> {
        Ok(Decoder::new(self.read_bytes(len)?))
    }

    /// Consumes everything up to the bound.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        self.position = self.data.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut d = Decoder::new(&data);
        assert_eq!(d.read_u8().unwrap(), 0x01);
        assert_eq!(d.read_u16().unwrap(), 0x0203);
        assert_eq!(d.read_u32().unwrap(), 0x0405_0607);
        assert!(d.is_empty());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let data = [0xaa, 0xbb, 0x00, 0x10];
        let d = Decoder::new(&data);
        assert_eq!(d.peek_u16_at(2).unwrap(), 0x0010);
        assert_eq!(d.peek_u8_at(0).unwrap(), 0xaa);
        assert_eq!(d.remaining(), 4);
    }

    #[test]
    fn test_read_past_bound_is_truncated() {
        let data = [0_u8; 3];
        let mut d = Decoder::new(&data);
        assert!(matches!(
            d.read_u32(),
            Err(Error::Truncated {
                required: 4,
                remaining: 3,
                ..
            })
        ));
        // A failed read consumes nothing.
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn test_take_bounds_the_sub_decoder() {
        let data = [1, 2, 3, 4, 5];
        let mut d = Decoder::new(&data);
        let mut sub = d.take(2).unwrap();
        assert_eq!(d.remaining(), 3);
        assert_eq!(sub.read_u16().unwrap(), 0x0102);
        assert!(sub.read_u8().is_err());
        assert_eq!(d.read_rest(), &[3, 4, 5]);
    }

    #[quickcheck_macros::quickcheck]
    fn test_read_u64_matches_from_be_bytes(v: u64) -> bool {
        let bytes = v.to_be_bytes();
        Decoder::new(&bytes).read_u64() == Ok(v)
    }
}
