// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record stream files of every supported version behind one type.

pub mod pre_v5;
pub mod v5;
pub mod v6;
pub mod compact;
mod chained;

use crate::error::{ProofError, Result};
use crate::stream::{ByteCursor, Hash384};
use crate::transaction::{SuccessIndex, TransactionKey};

pub use chained::{ChainedRecordFile, HapiVersion};
pub use compact::CompactProof;
pub use pre_v5::PreV5RecordFile;

#[derive(Debug)]
pub enum RecordFile {
    PreV5(PreV5RecordFile),
    V5(ChainedRecordFile),
    V6(ChainedRecordFile),
}

/// A recogniser inspecting the version tag at offset 0, and its parser.
struct Variant {
    accepts: fn(&[u8]) -> bool,
    parse: fn(&[u8]) -> Result<RecordFile>,
}

/// Consulted in order; the first match parses the buffer.
const VARIANTS: [Variant; 3] = [
    Variant {
        accepts: |bytes| matches!(version_tag(bytes), Some(1) | Some(2)),
        parse: |bytes| pre_v5::parse(bytes).map(RecordFile::PreV5),
    },
    Variant {
        accepts: |bytes| version_tag(bytes) == Some(v5::VERSION),
        parse: |bytes| v5::parse(bytes).map(RecordFile::V5),
    },
    Variant {
        accepts: |bytes| version_tag(bytes) == Some(v6::VERSION),
        parse: |bytes| v6::parse(bytes).map(RecordFile::V6),
    },
];

fn version_tag(bytes: &[u8]) -> Option<i32> {
    ByteCursor::new(bytes).read_i32("record file version").ok()
}

impl RecordFile {
    /// Parses a complete record file, picking the variant from its version tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let version = ByteCursor::new(bytes).read_i32("record file version")?;
        let variant = VARIANTS
            .iter()
            .find(|variant| (variant.accepts)(bytes))
            .ok_or(ProofError::UnsupportedVersion {
                what: "record file",
                version: version as i64,
            })?;
        (variant.parse)(bytes)
    }

    /// Rebuilds a v5/v6 record file from a compact proof, checking its hash chain.
    pub fn from_compact(proof: &CompactProof) -> Result<Self> {
        let file = proof.verify()?;
        Ok(match file.version() {
            v5::VERSION => RecordFile::V5(file),
            _ => RecordFile::V6(file),
        })
    }

    pub fn version(&self) -> i32 {
        match self {
            RecordFile::PreV5(file) => file.version(),
            RecordFile::V5(file) | RecordFile::V6(file) => file.version(),
        }
    }

    /// Pre-v5 files do not record the HAPI version.
    pub fn hapi_version(&self) -> Option<HapiVersion> {
        match self {
            RecordFile::PreV5(_) => None,
            RecordFile::V5(file) | RecordFile::V6(file) => Some(file.hapi_version()),
        }
    }

    /// `None` when rebuilt from a compact proof, which lacks the full file bytes.
    pub fn file_hash(&self) -> Option<Hash384> {
        match self {
            RecordFile::PreV5(file) => Some(file.file_hash),
            RecordFile::V5(file) | RecordFile::V6(file) => file.file_hash,
        }
    }

    /// Only v5 and later have a metadata hash.
    pub fn metadata_hash(&self) -> Option<Hash384> {
        match self {
            RecordFile::PreV5(_) => None,
            RecordFile::V5(file) | RecordFile::V6(file) => Some(file.metadata_hash),
        }
    }

    /// Whether `key` was executed successfully in this file.
    pub fn contains_transaction(&self, key: &TransactionKey) -> bool {
        self.success_index().contains_key(key)
    }

    pub fn successful_transactions(&self) -> impl Iterator<Item = &TransactionKey> {
        self.success_index().keys()
    }

    /// Records in the file, successful or not.
    pub fn transaction_count(&self) -> usize {
        match self {
            RecordFile::PreV5(file) => file.transaction_count(),
            RecordFile::V5(file) | RecordFile::V6(file) => file.record_count(),
        }
    }

    pub fn is_compact(&self) -> bool {
        match self {
            RecordFile::PreV5(_) => false,
            RecordFile::V5(file) | RecordFile::V6(file) => file.is_compact(),
        }
    }

    pub fn to_compact_object(&self, key: &TransactionKey) -> Result<CompactProof> {
        match self {
            RecordFile::PreV5(file) => Err(ProofError::UnsupportedOperation {
                operation: "compact proof",
                version: file.version(),
            }),
            RecordFile::V5(file) | RecordFile::V6(file) => file.to_compact_object(key),
        }
    }

    fn success_index(&self) -> &SuccessIndex {
        match self {
            RecordFile::PreV5(file) => &file.success_index,
            RecordFile::V5(file) | RecordFile::V6(file) => &file.success_index,
        }
    }
}
