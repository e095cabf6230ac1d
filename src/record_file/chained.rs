// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record files whose records are linked by a running hash (v5 and v6).

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};
use crate::record_file::compact::CompactProof;
use crate::stream::running_hash::sha384_concat;
use crate::stream::{Hash384, HashObject, RecordStreamObject};
use crate::transaction::{successful_transaction, SuccessIndex, TransactionKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapiVersion {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl fmt::Display for HapiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug)]
pub(crate) enum Records {
    /// Every record of the file, in stream order.
    Full(Vec<RecordStreamObject>),
    /// One record plus the hashes of its neighbours.
    Compact {
        hashes_before: Vec<Hash384>,
        target: RecordStreamObject,
        hashes_after: Vec<Hash384>,
    },
}

/// A parsed v5 or v6 record file, either complete or reduced to a compact proof.
#[derive(Debug)]
pub struct ChainedRecordFile {
    pub(crate) version: i32,
    pub(crate) hapi_version: HapiVersion,
    pub(crate) head: Vec<u8>,
    pub(crate) start: HashObject,
    pub(crate) end: HashObject,
    pub(crate) block_number: Option<i64>,
    pub(crate) records: Records,
    pub(crate) file_hash: Option<Hash384>,
    pub(crate) metadata_hash: Hash384,
    pub(crate) success_index: SuccessIndex,
    record_hashes: OnceLock<Vec<Hash384>>,
}

impl ChainedRecordFile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        version: i32,
        hapi_version: HapiVersion,
        head: Vec<u8>,
        start: HashObject,
        end: HashObject,
        block_number: Option<i64>,
        records: Records,
        file_hash: Option<Hash384>,
    ) -> Result<Self> {
        let metadata_hash = metadata_hash(version, &head, &start, &end, block_number)?;

        let mut success_index = SuccessIndex::default();
        match &records {
            Records::Full(objects) => {
                for (position, object) in objects.iter().enumerate() {
                    if let Some(key) = successful_transaction(&object.record)? {
                        success_index.entry(key).or_insert(Some(position));
                    }
                }
            }
            Records::Compact { hashes_before, target, .. } => {
                if let Some(key) = successful_transaction(&target.record)? {
                    success_index.insert(key, Some(hashes_before.len()));
                }
            }
        }

        Ok(Self {
            version,
            hapi_version,
            head,
            start,
            end,
            block_number,
            records,
            file_hash,
            metadata_hash,
            success_index,
            record_hashes: OnceLock::new(),
        })
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn hapi_version(&self) -> HapiVersion {
        self.hapi_version
    }

    pub fn block_number(&self) -> Option<i64> {
        self.block_number
    }

    pub fn start_running_hash(&self) -> &Hash384 {
        &self.start.digest
    }

    pub fn end_running_hash(&self) -> &Hash384 {
        &self.end.digest
    }

    /// Whether this file was rebuilt from a compact proof.
    pub fn is_compact(&self) -> bool {
        matches!(self.records, Records::Compact { .. })
    }

    pub fn record_count(&self) -> usize {
        match &self.records {
            Records::Full(objects) => objects.len(),
            Records::Compact { hashes_before, hashes_after, .. } => {
                hashes_before.len() + 1 + hashes_after.len()
            }
        }
    }

    /// Extracts the proof that `key` is part of this file's running hash.
    pub fn to_compact_object(&self, key: &TransactionKey) -> Result<CompactProof> {
        let position = self
            .success_index
            .get(key)
            .copied()
            .flatten()
            .ok_or_else(|| ProofError::TransactionNotFound(key.to_string()))?;

        let (hashes_before, target, hashes_after) = match &self.records {
            Records::Full(objects) => {
                let hashes = self
                    .record_hashes
                    .get_or_init(|| objects.iter().map(RecordStreamObject::hash).collect());
                (&hashes[..position], &objects[position], &hashes[position + 1..])
            }
            Records::Compact { hashes_before, target, hashes_after } => {
                (hashes_before.as_slice(), target, hashes_after.as_slice())
            }
        };

        Ok(CompactProof {
            head: self.head.clone(),
            start_running_hash_object: self.start.to_bytes(),
            hashes_before: hashes_before.iter().map(|h| h.to_vec()).collect(),
            record_stream_object: target.to_bytes(),
            hashes_after: hashes_after.iter().map(|h| h.to_vec()).collect(),
            end_running_hash_object: self.end.to_bytes(),
            block_number: self.block_number,
        })
    }
}

/// v5: `sha384(head || start object || end object)`.
/// v6: `sha384(head || start digest || end digest || block number)`.
pub(crate) fn metadata_hash(
    version: i32,
    head: &[u8],
    start: &HashObject,
    end: &HashObject,
    block_number: Option<i64>,
) -> Result<Hash384> {
    match version {
        5 => Ok(sha384_concat(&[head, &start.to_bytes(), &end.to_bytes()])),
        6 => {
            let block_number = block_number.ok_or_else(|| {
                ProofError::malformed("v6 metadata", head.len(), "block number", "none")
            })?;
            Ok(sha384_concat(&[
                head,
                &start.digest,
                &end.digest,
                &block_number.to_be_bytes(),
            ]))
        }
        other => Err(ProofError::UnsupportedVersion {
            what: "record file",
            version: other as i64,
        }),
    }
}
