// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Version 1 and 2 record files.
//!
//! ```text
//! [version: i32][protocol version: i32][marker: u8 = 1][previous file hash; 48]
//! ([marker: u8 = 2][len: i32][transaction][len: i32][record])*
//! ```

use crate::config::{
    MAX_RECORD_LENGTH, MAX_TRANSACTION_LENGTH, PRE_V5_HEADER_LENGTH, PRE_V5_PREV_HASH_MARKER,
    PRE_V5_RECORD_MARKER,
};
use crate::error::{ProofError, Result};
use crate::stream::running_hash::{sha384, sha384_concat};
use crate::stream::{ByteCursor, Hash384};
use crate::transaction::{successful_transaction, SuccessIndex};

const WHAT: &str = "pre-v5 record file";

#[derive(Debug)]
pub struct PreV5RecordFile {
    pub(crate) version: i32,
    pub(crate) protocol_version: i32,
    pub(crate) previous_hash: Hash384,
    pub(crate) file_hash: Hash384,
    pub(crate) transaction_count: usize,
    pub(crate) success_index: SuccessIndex,
}

impl PreV5RecordFile {
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn protocol_version(&self) -> i32 {
        self.protocol_version
    }

    pub fn previous_hash(&self) -> &Hash384 {
        &self.previous_hash
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }
}

pub fn parse(bytes: &[u8]) -> Result<PreV5RecordFile> {
    let mut cursor = ByteCursor::new(bytes);
    let version = cursor.read_i32(WHAT)?;
    let protocol_version = cursor.read_i32(WHAT)?;

    let marker_offset = cursor.position();
    let marker = cursor.read_u8(WHAT)?;
    if marker != PRE_V5_PREV_HASH_MARKER {
        return Err(ProofError::malformed(WHAT, marker_offset, PRE_V5_PREV_HASH_MARKER, marker));
    }
    let previous_hash: Hash384 = cursor.read_array(WHAT)?;

    let mut success_index = SuccessIndex::default();
    let mut transaction_count = 0;
    while !cursor.is_empty() {
        let marker_offset = cursor.position();
        let marker = cursor.read_u8(WHAT)?;
        if marker != PRE_V5_RECORD_MARKER {
            return Err(ProofError::malformed(WHAT, marker_offset, PRE_V5_RECORD_MARKER, marker));
        }

        let _transaction = cursor.read_length_and_bytes(0, MAX_TRANSACTION_LENGTH, false, WHAT)?;
        let record = cursor.read_length_and_bytes(0, MAX_RECORD_LENGTH, false, WHAT)?;
        transaction_count += 1;

        if let Some(key) = successful_transaction(record)? {
            success_index.insert(key, None);
        }
    }

    Ok(PreV5RecordFile {
        version,
        protocol_version,
        previous_hash,
        file_hash: file_hash(version, bytes),
        transaction_count,
        success_index,
    })
}

/// v1 hashes the whole file. v2 hashes the header followed by the hash of
/// everything after it, so the header can be swapped without rehashing the body.
fn file_hash(version: i32, bytes: &[u8]) -> Hash384 {
    if version == 1 {
        sha384(bytes)
    } else {
        let (header, body) = bytes.split_at(PRE_V5_HEADER_LENGTH);
        sha384_concat(&[header, &sha384(body)])
    }
}
