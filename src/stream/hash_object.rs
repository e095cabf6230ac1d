// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `[header][digest_type: i32][length: i32 = 48][digest; 48]`

use crate::config::{
    DIGEST_TYPE_SHA384, HASH_OBJECT_CLASS_ID, PROTO_HASH_ALGORITHM_SHA384, SHA384_LENGTH,
    STREAM_OBJECT_CLASS_VERSION,
};
use crate::error::{ProofError, Result};
use crate::proto;
use crate::stream::cursor::ByteCursor;
use crate::stream::object::{StreamObject, StreamObjectHeader};
use crate::stream::Hash384;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashObject {
    pub header: StreamObjectHeader,
    pub digest_type: i32,
    pub digest: Hash384,
}

impl HashObject {
    pub const SIZE: usize = StreamObjectHeader::SIZE + 4 + 4 + SHA384_LENGTH;

    /// A SHA-384 hash object with the standard header.
    pub fn new(digest: Hash384) -> Self {
        Self {
            header: StreamObjectHeader::new(HASH_OBJECT_CLASS_ID, STREAM_OBJECT_CLASS_VERSION),
            digest_type: DIGEST_TYPE_SHA384,
            digest,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.extend_from_slice(&self.header.to_be_bytes());
        buf.extend_from_slice(&self.digest_type.to_be_bytes());
        buf.extend_from_slice(&(SHA384_LENGTH as i32).to_be_bytes());
        buf.extend_from_slice(&self.digest);
        buf
    }

    /// Converts the protobuf envelope used by v6 files into the framed form.
    pub fn from_proto(object: &proto::HashObject, what: &'static str) -> Result<Self> {
        if object.algorithm != PROTO_HASH_ALGORITHM_SHA384 {
            return Err(ProofError::malformed(
                what,
                0,
                format!("hash algorithm {PROTO_HASH_ALGORITHM_SHA384}"),
                object.algorithm,
            ));
        }
        if object.length != SHA384_LENGTH as i32 || object.hash.len() != SHA384_LENGTH {
            return Err(ProofError::malformed(
                what,
                0,
                format!("hash length {SHA384_LENGTH}"),
                format!("declared {}, actual {}", object.length, object.hash.len()),
            ));
        }
        let mut digest = [0u8; SHA384_LENGTH];
        digest.copy_from_slice(&object.hash);
        Ok(Self::new(digest))
    }

    pub fn to_proto(&self) -> proto::HashObject {
        proto::HashObject {
            algorithm: PROTO_HASH_ALGORITHM_SHA384,
            length: SHA384_LENGTH as i32,
            hash: self.digest.to_vec(),
        }
    }
}

impl StreamObject for HashObject {
    const CLASS_ID: i64 = HASH_OBJECT_CLASS_ID;
    const NAME: &'static str = "hash object";

    fn read_body(header: StreamObjectHeader, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let digest_type = cursor.read_i32(Self::NAME)?;
        if digest_type != DIGEST_TYPE_SHA384 {
            return Err(ProofError::malformed(
                Self::NAME,
                offset,
                format!("digest type {DIGEST_TYPE_SHA384:#x}"),
                format!("{digest_type:#x}"),
            ));
        }

        let bytes = cursor.read_length_and_bytes(SHA384_LENGTH, SHA384_LENGTH, false, Self::NAME)?;
        let mut digest = [0u8; SHA384_LENGTH];
        digest.copy_from_slice(bytes);

        Ok(Self { header, digest_type, digest })
    }

    fn header(&self) -> StreamObjectHeader {
        self.header
    }

    fn body_len(&self) -> usize {
        4 + 4 + SHA384_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_object_layout() {
        let object = HashObject::new([0xab; 48]);
        let bytes = object.to_bytes();
        assert_eq!(bytes.len(), HashObject::SIZE);
        assert_eq!(HashObject::from_bytes(&bytes).unwrap(), object);
        assert_eq!(object.len(), 68);
    }

    #[test]
    fn test_wrong_digest_length_is_malformed() {
        let mut bytes = HashObject::new([1; 48]).to_bytes();
        // Declared length 47.
        bytes[19] = 47;
        assert!(matches!(
            HashObject::from_bytes(&bytes),
            Err(ProofError::Malformed { offset: 16, .. })
        ));
    }

    #[test]
    fn test_truncated_digest() {
        let bytes = HashObject::new([1; 48]).to_bytes();
        assert!(matches!(
            HashObject::from_bytes(&bytes[..60]),
            Err(ProofError::Truncated { .. })
        ));
    }

    #[test]
    fn test_proto_envelope() {
        let object = HashObject::new([9; 48]);
        assert_eq!(HashObject::from_proto(&object.to_proto(), "hash").unwrap(), object);

        let mut short = object.to_proto();
        short.hash.pop();
        assert!(matches!(
            HashObject::from_proto(&short, "hash"),
            Err(ProofError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unknown_digest_type() {
        let mut bytes = HashObject::new([1; 48]).to_bytes();
        bytes[12] ^= 0xff;
        assert!(matches!(
            HashObject::from_bytes(&bytes),
            Err(ProofError::Malformed { offset: 12, .. })
        ));
    }
}
