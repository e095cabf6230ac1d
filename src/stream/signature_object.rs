// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `[header][signature_type: i32][length: i32][checksum: i32][signature; length]`

use crate::config::{
    CHECKSUM_BASE, MAX_SIGNATURE_LENGTH, SIGNATURE_OBJECT_CLASS_ID, SIGNATURE_TYPE_SHA384_WITH_RSA,
    STREAM_OBJECT_CLASS_VERSION,
};
use crate::error::{ProofError, Result};
use crate::stream::cursor::ByteCursor;
use crate::stream::object::{StreamObject, StreamObjectHeader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureObject {
    pub header: StreamObjectHeader,
    pub signature_type: i32,
    pub signature: Vec<u8>,
}

impl SignatureObject {
    /// An RSA-SHA384 signature object with the standard header.
    pub fn new(signature: Vec<u8>) -> Self {
        Self {
            header: StreamObjectHeader::new(SIGNATURE_OBJECT_CLASS_ID, STREAM_OBJECT_CLASS_VERSION),
            signature_type: SIGNATURE_TYPE_SHA384_WITH_RSA,
            signature,
        }
    }

    pub fn checksum(&self) -> i32 {
        CHECKSUM_BASE - self.signature.len() as i32
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(&self.header.to_be_bytes());
        buf.extend_from_slice(&self.signature_type.to_be_bytes());
        buf.extend_from_slice(&(self.signature.len() as i32).to_be_bytes());
        buf.extend_from_slice(&self.checksum().to_be_bytes());
        buf.extend_from_slice(&self.signature);
        buf
    }
}

impl StreamObject for SignatureObject {
    const CLASS_ID: i64 = SIGNATURE_OBJECT_CLASS_ID;
    const NAME: &'static str = "signature object";

    fn read_body(header: StreamObjectHeader, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let signature_type = cursor.read_i32(Self::NAME)?;
        if signature_type != SIGNATURE_TYPE_SHA384_WITH_RSA {
            return Err(ProofError::UnsupportedVersion {
                what: "signature type",
                version: signature_type as i64,
            });
        }

        let signature = cursor
            .read_length_and_bytes(1, MAX_SIGNATURE_LENGTH, true, Self::NAME)?
            .to_vec();

        Ok(Self { header, signature_type, signature })
    }

    fn header(&self) -> StreamObjectHeader {
        self.header
    }

    fn body_len(&self) -> usize {
        4 + 4 + 4 + self.signature.len()
    }
}
