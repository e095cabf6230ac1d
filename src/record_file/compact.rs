// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Compact proofs: one record of a v5/v6 file plus the running-hash chain
//! around it.
//!
//! A verifier folds the start running hash, the hashes of the records before
//! the target, the hash of the target itself and the hashes after it. The
//! result must equal the end running hash, so no record can be dropped,
//! reordered or substituted without detection.

use serde::{Deserialize, Serialize};

use crate::config::SHA384_LENGTH;
use crate::error::{ProofError, Result};
use crate::record_file::chained::{ChainedRecordFile, HapiVersion, Records};
use crate::stream::running_hash::sha384;
use crate::stream::{ByteCursor, Hash384, HashObject, RecordStreamObject, RunningHash, StreamObject};

/// Length of `head` for v5: version, HAPI major/minor/patch, object stream version.
pub const V5_HEAD_LENGTH: usize = 20;
/// Length of `head` for v6: version, HAPI major/minor/patch.
pub const V6_HEAD_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactProof {
    pub head: Vec<u8>,
    pub start_running_hash_object: Vec<u8>,
    pub hashes_before: Vec<Vec<u8>>,
    pub record_stream_object: Vec<u8>,
    pub hashes_after: Vec<Vec<u8>>,
    pub end_running_hash_object: Vec<u8>,
    /// Present for v6, whose metadata hash covers the block number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<i64>,
}

impl CompactProof {
    /// Version tag at the front of `head`.
    pub fn version(&self) -> Result<i32> {
        ByteCursor::new(&self.head).read_i32("compact proof head")
    }

    /// Re-derives the end running hash and rebuilds the record file view.
    pub fn verify(&self) -> Result<ChainedRecordFile> {
        const WHAT: &str = "compact proof head";

        let mut cursor = ByteCursor::new(&self.head);
        let version = cursor.read_i32(WHAT)?;
        let expected_head = match version {
            5 => V5_HEAD_LENGTH,
            6 => V6_HEAD_LENGTH,
            other => {
                return Err(ProofError::UnsupportedVersion {
                    what: "compact record file",
                    version: other as i64,
                })
            }
        };
        if self.head.len() != expected_head {
            return Err(ProofError::malformed(
                WHAT,
                0,
                format!("{expected_head} bytes"),
                format!("{} bytes", self.head.len()),
            ));
        }
        let hapi_version = HapiVersion {
            major: cursor.read_i32(WHAT)?,
            minor: cursor.read_i32(WHAT)?,
            patch: cursor.read_i32(WHAT)?,
        };

        let start = HashObject::from_bytes(&self.start_running_hash_object)?;
        let end = HashObject::from_bytes(&self.end_running_hash_object)?;
        let target = RecordStreamObject::from_bytes(&self.record_stream_object)?;
        let hashes_before = to_digests(&self.hashes_before, "hashes before")?;
        let hashes_after = to_digests(&self.hashes_after, "hashes after")?;

        let mut running_hash = RunningHash::new(start.header, start.digest);
        for digest in &hashes_before {
            running_hash.update(&target.header, digest);
        }
        running_hash.update(&target.header, &sha384(&self.record_stream_object));
        for digest in &hashes_after {
            running_hash.update(&target.header, digest);
        }

        if running_hash.digest() != end.digest {
            return Err(ProofError::HashChainMismatch {
                expected: hex::encode(end.digest),
                computed: hex::encode(running_hash.digest()),
            });
        }

        ChainedRecordFile::new(
            version,
            hapi_version,
            self.head.clone(),
            start,
            end,
            self.block_number.filter(|_| version == 6),
            Records::Compact { hashes_before, target, hashes_after },
            None,
        )
    }
}

fn to_digests(hashes: &[Vec<u8>], what: &'static str) -> Result<Vec<Hash384>> {
    hashes
        .iter()
        .enumerate()
        .map(|(i, hash)| {
            <Hash384>::try_from(hash.as_slice()).map_err(|_| {
                ProofError::malformed(what, i, format!("{SHA384_LENGTH} byte digest"), hash.len())
            })
        })
        .collect()
}
