// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-node signature files (v2, v5, v6), keyed by their first byte.
//!
//! ```text
//! v2: [4][file hash; 48][3][len: i32][signature]
//! v5: [5][object stream signature version: i32]
//!     [file hash: HashObject][file signature: SignatureObject]
//!     [metadata hash: HashObject][metadata signature: SignatureObject]
//! v6: [6][SignatureFile protobuf]
//! ```

use prost::Message;

use crate::config::{
    CHECKSUM_BASE, MAX_SIGNATURE_LENGTH, OBJECT_STREAM_SIGNATURE_VERSION,
    PROTO_SIGNATURE_TYPE_SHA384_WITH_RSA, SHA384_LENGTH,
    SIGNATURE_FILE_V2_HASH_MARKER, SIGNATURE_FILE_V2_SIGNATURE_MARKER,
};
use crate::error::{ProofError, Result};
use crate::proto;
use crate::stream::{ByteCursor, Hash384, HashObject, SignatureObject, StreamObject};

pub const V2_VERSION: u8 = 2;
pub const V5_VERSION: u8 = 5;
pub const V6_VERSION: u8 = 6;

/// The hashes one node signed, and its signatures over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFile {
    pub version: u8,
    pub file_hash: Hash384,
    pub file_hash_signature: Vec<u8>,
    pub metadata_hash: Option<Hash384>,
    pub metadata_hash_signature: Option<Vec<u8>>,
}

/// A parsed signature file attributed to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFileEntry {
    pub node_id: String,
    pub file_hash: Hash384,
    pub file_hash_signature: Vec<u8>,
    pub metadata_hash: Option<Hash384>,
    pub metadata_hash_signature: Option<Vec<u8>>,
}

impl SignatureFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        match cursor.read_u8("signature file version")? {
            SIGNATURE_FILE_V2_HASH_MARKER => parse_v2(cursor),
            V5_VERSION => parse_v5(cursor),
            V6_VERSION => parse_v6(cursor),
            other => Err(ProofError::UnsupportedVersion {
                what: "signature file",
                version: other as i64,
            }),
        }
    }

    pub fn into_entry(self, node_id: impl Into<String>) -> SignatureFileEntry {
        SignatureFileEntry {
            node_id: node_id.into(),
            file_hash: self.file_hash,
            file_hash_signature: self.file_hash_signature,
            metadata_hash: self.metadata_hash,
            metadata_hash_signature: self.metadata_hash_signature,
        }
    }
}

fn parse_v2(mut cursor: ByteCursor<'_>) -> Result<SignatureFile> {
    const WHAT: &str = "v2 signature file";

    let file_hash: Hash384 = cursor.read_array(WHAT)?;
    let marker_offset = cursor.position();
    let marker = cursor.read_u8(WHAT)?;
    if marker != SIGNATURE_FILE_V2_SIGNATURE_MARKER {
        return Err(ProofError::malformed(
            WHAT,
            marker_offset,
            SIGNATURE_FILE_V2_SIGNATURE_MARKER,
            marker,
        ));
    }
    let signature = cursor.read_length_and_bytes(1, MAX_SIGNATURE_LENGTH, false, WHAT)?;
    cursor.expect_end(WHAT)?;

    Ok(SignatureFile {
        version: V2_VERSION,
        file_hash,
        file_hash_signature: signature.to_vec(),
        metadata_hash: None,
        metadata_hash_signature: None,
    })
}

fn parse_v5(mut cursor: ByteCursor<'_>) -> Result<SignatureFile> {
    const WHAT: &str = "v5 signature file";

    let signature_version_offset = cursor.position();
    let signature_version = cursor.read_i32(WHAT)?;
    if signature_version != OBJECT_STREAM_SIGNATURE_VERSION {
        return Err(ProofError::malformed(
            WHAT,
            signature_version_offset,
            OBJECT_STREAM_SIGNATURE_VERSION,
            signature_version,
        ));
    }
    let file_hash = HashObject::read(&mut cursor)?;
    let file_signature = SignatureObject::read(&mut cursor)?;
    let metadata_hash = HashObject::read(&mut cursor)?;
    let metadata_signature = SignatureObject::read(&mut cursor)?;
    cursor.expect_end(WHAT)?;

    Ok(SignatureFile {
        version: V5_VERSION,
        file_hash: file_hash.digest,
        file_hash_signature: file_signature.signature,
        metadata_hash: Some(metadata_hash.digest),
        metadata_hash_signature: Some(metadata_signature.signature),
    })
}

fn parse_v6(cursor: ByteCursor<'_>) -> Result<SignatureFile> {
    const WHAT: &str = "v6 signature file";

    let file = proto::SignatureFile::decode(cursor.rest()).map_err(ProofError::decode(WHAT))?;
    let (file_hash, file_hash_signature) = match &file.file_signature {
        Some(signature) => signed_hash(signature, "v6 file signature")?,
        None => return Err(ProofError::malformed(WHAT, 1, "file signature", "none")),
    };
    let metadata = file
        .metadata_signature
        .as_ref()
        .map(|signature| signed_hash(signature, "v6 metadata signature"))
        .transpose()?;
    let (metadata_hash, metadata_hash_signature) = match metadata {
        Some((hash, signature)) => (Some(hash), Some(signature)),
        None => (None, None),
    };

    Ok(SignatureFile {
        version: V6_VERSION,
        file_hash,
        file_hash_signature,
        metadata_hash,
        metadata_hash_signature,
    })
}

/// Applies the same length, checksum and type rules as the framed v5 objects.
fn signed_hash(object: &proto::SignatureObject, what: &'static str) -> Result<(Hash384, Vec<u8>)> {
    if object.r#type != PROTO_SIGNATURE_TYPE_SHA384_WITH_RSA {
        return Err(ProofError::UnsupportedVersion {
            what: "signature type",
            version: object.r#type as i64,
        });
    }

    let length = object.signature.len();
    if length == 0 || length > MAX_SIGNATURE_LENGTH || object.length as usize != length {
        return Err(ProofError::malformed(
            what,
            0,
            format!("length {} in [1, {MAX_SIGNATURE_LENGTH}]", object.length),
            length,
        ));
    }
    if object.checksum != CHECKSUM_BASE - object.length {
        return Err(ProofError::malformed(
            what,
            0,
            format!("checksum {}", CHECKSUM_BASE - object.length),
            object.checksum,
        ));
    }

    let hash = object
        .hash_object
        .as_ref()
        .ok_or_else(|| ProofError::malformed(what, 0, format!("{SHA384_LENGTH} byte hash object"), "none"))
        .and_then(|hash| HashObject::from_proto(hash, what))?;

    Ok((hash.digest, object.signature.clone()))
}
