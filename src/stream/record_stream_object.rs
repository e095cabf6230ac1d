// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `[header][record_len: i32][record][transaction_len: i32][transaction]`

use crate::config::{
    MAX_RECORD_LENGTH, MAX_TRANSACTION_LENGTH, RECORD_STREAM_OBJECT_CLASS_ID,
    STREAM_OBJECT_CLASS_VERSION,
};
use crate::error::Result;
use crate::stream::cursor::ByteCursor;
use crate::stream::object::{StreamObject, StreamObjectHeader};
use crate::stream::running_hash::sha384;
use crate::stream::Hash384;

/// One transaction and its record, both as raw protobuf bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStreamObject {
    pub header: StreamObjectHeader,
    pub record: Vec<u8>,
    pub transaction: Vec<u8>,
}

impl RecordStreamObject {
    pub fn new(record: Vec<u8>, transaction: Vec<u8>) -> Self {
        Self {
            header: StreamObjectHeader::new(
                RECORD_STREAM_OBJECT_CLASS_ID,
                STREAM_OBJECT_CLASS_VERSION,
            ),
            record,
            transaction,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(&self.header.to_be_bytes());
        buf.extend_from_slice(&(self.record.len() as i32).to_be_bytes());
        buf.extend_from_slice(&self.record);
        buf.extend_from_slice(&(self.transaction.len() as i32).to_be_bytes());
        buf.extend_from_slice(&self.transaction);
        buf
    }

    /// SHA-384 over the serialized object, header included.
    pub fn hash(&self) -> Hash384 {
        sha384(&self.to_bytes())
    }
}

impl StreamObject for RecordStreamObject {
    const CLASS_ID: i64 = RECORD_STREAM_OBJECT_CLASS_ID;
    const NAME: &'static str = "record stream object";

    fn read_body(header: StreamObjectHeader, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let record = cursor.read_length_and_bytes(0, MAX_RECORD_LENGTH, false, Self::NAME)?;
        let transaction =
            cursor.read_length_and_bytes(0, MAX_TRANSACTION_LENGTH, false, Self::NAME)?;

        Ok(Self {
            header,
            record: record.to_vec(),
            transaction: transaction.to_vec(),
        })
    }

    fn header(&self) -> StreamObjectHeader {
        self.header
    }

    fn body_len(&self) -> usize {
        4 + self.record.len() + 4 + self.transaction.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProofError;

    #[test]
    fn test_record_stream_object_layout() {
        let object = RecordStreamObject::new(vec![1, 2, 3], vec![4, 5]);
        let bytes = object.to_bytes();
        assert_eq!(bytes.len(), 12 + 4 + 3 + 4 + 2);
        assert_eq!(&bytes[16..19], &[1, 2, 3]);

        let parsed = RecordStreamObject::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, object);
        assert_eq!(parsed.hash(), sha384(&bytes));
    }

    #[test]
    fn test_truncated_transaction() {
        let bytes = RecordStreamObject::new(vec![1, 2, 3], vec![4, 5, 6, 7]).to_bytes();
        assert!(matches!(
            RecordStreamObject::from_bytes(&bytes[..bytes.len() - 1]),
            Err(ProofError::Truncated { .. })
        ));
    }

    #[test]
    fn test_oversized_record_rejected() {
        let bytes = RecordStreamObject::new(vec![0; MAX_RECORD_LENGTH + 1], vec![]).to_bytes();
        assert!(matches!(
            RecordStreamObject::from_bytes(&bytes),
            Err(ProofError::Malformed { offset: 12, .. })
        ));
    }
}
