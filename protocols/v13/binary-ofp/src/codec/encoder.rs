use alloc::vec::Vec;
use byteorder::{BigEndian, ByteOrder};

/// Big-endian append operations on the growable output buffer.
///
/// Appending to a `Vec<u8>` cannot fail, so neither can encoding.
pub trait Encoder {
    fn put_u8(&mut self, v: u8);
    fn put_u16(&mut self, v: u16);
    fn put_u32(&mut self, v: u32);
    fn put_u64(&mut self, v: u64);
    fn put_slice(&mut self, v: &[u8]);
    fn put_zeros(&mut self, len: usize);
}

impl Encoder for Vec<u8> {
    fn put_u8(&mut self, v: u8) {
        self.push(v);
    }

    fn put_u16(&mut self, v: u16) {
        let mut buf = [0_u8; 2];
        BigEndian::write_u16(&mut buf, v);
        self.extend_from_slice(&buf);
    }

    fn put_u32(&mut self, v: u32) {
        let mut buf = [0_u8; 4];
        BigEndian::write_u32(&mut buf, v);
        self.extend_from_slice(&buf);
    }

    fn put_u64(&mut self, v: u64) {
        let mut buf = [0_u8; 8];
        BigEndian::write_u64(&mut buf, v);
        self.extend_from_slice(&buf);
    }

    fn put_slice(&mut self, v: &[u8]) {
        self.extend_from_slice(v);
    }

    fn put_zeros(&mut self, len: usize) {
        self.resize(self.len() + len, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_appends_big_endian() {
        let mut buf = vec![0xff];
        buf.put_u16(0x0102);
        buf.put_u32(0x0304_0506);
        buf.put_zeros(2);
        buf.put_u8(7);
        assert_eq!(buf, vec![0xff, 1, 2, 3, 4, 5, 6, 0, 0, 7]);
    }

    #[quickcheck_macros::quickcheck]
    fn test_put_u64_matches_to_be_bytes(v: u64) -> bool {
        let mut buf = Vec::new();
        buf.put_u64(v);
        buf == v.to_be_bytes()
    }
}
