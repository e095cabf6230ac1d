// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bounds-checked big-endian reader over a borrowed buffer.

use byteorder::{BigEndian, ByteOrder};

use crate::config::CHECKSUM_BASE;
use crate::error::{ProofError, Result};

/// A position within a borrowed byte slice.
///
/// The cursor is `Copy`: nested readers take their own copy, advance it, and
/// the caller only adopts the new position once the nested read succeeded.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Bytes consumed since `start`.
    pub fn since(&self, start: usize) -> &'a [u8] {
        &self.buf[start..self.pos]
    }

    pub fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(ProofError::Truncated {
                what,
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub fn read_i32(&mut self, what: &'static str) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4, what)?))
    }

    pub fn read_i64(&mut self, what: &'static str) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8, what)?))
    }

    /// Reads the next 8 bytes as a class id without advancing.
    pub fn peek_i64(&self, what: &'static str) -> Result<i64> {
        let mut probe = *self;
        probe.read_i64(what)
    }

    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    /// Reads `[length: i32][checksum: i32]?[bytes; length]`.
    ///
    /// The length must lie in `min..=max`; when present, the checksum must equal
    /// `101 - length`.
    pub fn read_length_and_bytes(
        &mut self,
        min: usize,
        max: usize,
        has_checksum: bool,
        what: &'static str,
    ) -> Result<&'a [u8]> {
        let length_offset = self.pos;
        let length = self.read_i32(what)?;
        if length < 0 || (length as usize) < min || (length as usize) > max {
            let expected = if min == max {
                format!("length {min}")
            } else {
                format!("length in [{min}, {max}]")
            };
            return Err(ProofError::malformed(what, length_offset, expected, length));
        }

        if has_checksum {
            let checksum_offset = self.pos;
            let checksum = self.read_i32(what)?;
            let expected = CHECKSUM_BASE - length;
            if checksum != expected {
                return Err(ProofError::malformed(
                    what,
                    checksum_offset,
                    format!("checksum {expected}"),
                    checksum,
                ));
            }
        }

        self.take(length as usize, what)
    }

    /// Fails with `ExtraData` if anything is left.
    pub fn expect_end(&self, what: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ProofError::ExtraData {
                what,
                offset: self.pos,
                remaining: self.remaining(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_integers_big_endian() {
        let buf = [0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 1, 0, 9];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.read_i32("int").unwrap(), 5);
        assert_eq!(cursor.read_i64("long").unwrap(), 256);
        assert_eq!(cursor.read_u8("byte").unwrap(), 9);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_take_past_end_is_truncated() {
        let buf = [1, 2, 3];
        let mut cursor = ByteCursor::new(&buf);
        cursor.read_u8("byte").unwrap();
        match cursor.read_i32("int") {
            Err(ProofError::Truncated { offset, needed, available, .. }) => {
                assert_eq!((offset, needed, available), (1, 4, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
        // Failed reads leave the position untouched.
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_length_and_checksum() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&3i32.to_be_bytes());
        buf.extend_from_slice(&98i32.to_be_bytes());
        buf.extend_from_slice(b"abc");

        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.read_length_and_bytes(1, 10, true, "sig").unwrap(), b"abc");

        buf[7] = 99;
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            cursor.read_length_and_bytes(1, 10, true, "sig"),
            Err(ProofError::Malformed { offset: 4, .. })
        ));
    }

    #[test]
    fn test_length_out_of_bounds() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&47i32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 47]);
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            cursor.read_length_and_bytes(48, 48, false, "hash"),
            Err(ProofError::Malformed { .. })
        ));

        let negative = (-1i32).to_be_bytes();
        let mut cursor = ByteCursor::new(&negative);
        assert!(matches!(
            cursor.read_length_and_bytes(0, 10, false, "bytes"),
            Err(ProofError::Malformed { .. })
        ));
    }

    #[test]
    fn test_expect_end() {
        let buf = [1, 2];
        let mut cursor = ByteCursor::new(&buf);
        cursor.read_u8("byte").unwrap();
        assert!(matches!(
            cursor.expect_end("file"),
            Err(ProofError::ExtraData { offset: 1, remaining: 1, .. })
        ));
    }
}
