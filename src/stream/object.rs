// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stream object framing: `[class_id: i64][class_version: i32][body]`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::config::STREAM_OBJECT_HEADER_LENGTH;
use crate::error::{ProofError, Result};
use crate::stream::cursor::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamObjectHeader {
    pub class_id: i64,
    pub class_version: i32,
}

impl StreamObjectHeader {
    pub const SIZE: usize = STREAM_OBJECT_HEADER_LENGTH;

    pub fn new(class_id: i64, class_version: i32) -> Self {
        Self { class_id, class_version }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut probe = *cursor;
        let class_id = probe.read_i64("stream object header")?;
        let class_version = probe.read_i32("stream object header")?;
        *cursor = probe;
        Ok(Self { class_id, class_version })
    }

    /// Wire order, as read from the stream.
    pub fn to_be_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        BigEndian::write_i64(&mut buf[0..8], self.class_id);
        BigEndian::write_i32(&mut buf[8..12], self.class_version);
        buf
    }

    /// Byte order fed into the running hash.
    pub fn to_le_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_i64(&mut buf[0..8], self.class_id);
        LittleEndian::write_i32(&mut buf[8..12], self.class_version);
        buf
    }
}

/// A typed, length-framed record in a record or signature stream.
pub trait StreamObject: Sized {
    const CLASS_ID: i64;
    const NAME: &'static str;

    /// Reads the body following `header`; the cursor ends just past the body.
    fn read_body(header: StreamObjectHeader, cursor: &mut ByteCursor<'_>) -> Result<Self>;

    fn header(&self) -> StreamObjectHeader;

    fn body_len(&self) -> usize;

    /// Header plus body, i.e. how far to advance past this object.
    fn len(&self) -> usize {
        StreamObjectHeader::SIZE + self.body_len()
    }

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut probe = *cursor;
        let offset = probe.position();
        let header = StreamObjectHeader::read(&mut probe)?;
        if header.class_id != Self::CLASS_ID {
            return Err(ProofError::malformed(
                Self::NAME,
                offset,
                format!("class id {:#018x}", Self::CLASS_ID),
                format!("{:#018x}", header.class_id),
            ));
        }
        let object = Self::read_body(header, &mut probe)?;
        debug_assert_eq!(probe.position() - offset, object.len());
        *cursor = probe;
        Ok(object)
    }

    /// Parses a buffer holding exactly one object.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let object = Self::read(&mut cursor)?;
        cursor.expect_end(Self::NAME)?;
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_byte_orders() {
        let header = StreamObjectHeader::new(0x0102030405060708, 0x0a0b0c0d);
        assert_eq!(
            header.to_be_bytes(),
            [1, 2, 3, 4, 5, 6, 7, 8, 0x0a, 0x0b, 0x0c, 0x0d]
        );
        assert_eq!(
            header.to_le_bytes(),
            [8, 7, 6, 5, 4, 3, 2, 1, 0x0d, 0x0c, 0x0b, 0x0a]
        );

        let bytes = header.to_be_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(StreamObjectHeader::read(&mut cursor).unwrap(), header);
    }

    #[test]
    fn test_short_header_is_truncated() {
        let bytes = [0u8; 11];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            StreamObjectHeader::read(&mut cursor),
            Err(ProofError::Truncated { .. })
        ));
        assert_eq!(cursor.position(), 0);
    }
}
