// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! State proof: is a transaction part of output that enough nodes signed?
//!
//! 1. The transaction must be among the record file's successful records.
//! 2. Every node's signature over the hash it claims is checked against the
//!    newest address book. Nodes that fail are dropped, not fatal.
//! 3. Verified nodes vote with the hash they signed; the most common hash
//!    wins if at least `ceil(verified / 3)` nodes back it. A tie for the top
//!    count has no winner.
//! 4. The winner must equal the hash computed from the record file itself.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use serde::Serialize;
use sha2::Sha384;

use crate::address_book::{self, AddressBook};
use crate::error::{ProofError, Result};
use crate::observer::{ProofEvent, ProofObserver, TracingObserver};
use crate::record_file::{CompactProof, RecordFile};
use crate::signature_file::{SignatureFile, SignatureFileEntry};
use crate::stream::Hash384;
use crate::transaction::TransactionKey;

/// The record file as shipped in a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFileInput {
    Full(Vec<u8>),
    Compact(CompactProof),
}

/// Everything needed to prove one transaction, already decoded from transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateProofBundle {
    /// Oldest first; the last one is authoritative.
    pub address_books: Vec<Vec<u8>>,
    pub record_file: RecordFileInput,
    /// Node id (`shard.realm.num`) to raw signature file.
    pub signature_files: BTreeMap<String, Vec<u8>>,
}

/// Hashes computed from the record file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFileHashes {
    pub file_hash: Option<Hash384>,
    pub metadata_hash: Option<Hash384>,
}

impl RecordFileHashes {
    pub fn of(record_file: &RecordFile) -> Self {
        Self {
            file_hash: record_file.file_hash(),
            metadata_hash: record_file.metadata_hash(),
        }
    }
}

/// Which signed hash the nodes vote with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VotedHash {
    FileHash,
    /// Used when only a compact proof is available, which has no file hash.
    MetadataHash,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsensusResult {
    pub hash: Option<Hash384>,
    pub corroborating_node_count: usize,
}

/// Result of the signature and consensus phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOutcome {
    pub valid: bool,
    pub voted_hash: Option<VotedHash>,
    pub consensus: ConsensusResult,
    pub required_nodes: usize,
    pub verified_nodes: Vec<String>,
    pub rejected_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateProofReport {
    pub valid: bool,
    pub transaction: String,
    pub record_file_version: i32,
    pub compact: bool,
    pub file_hash: Option<String>,
    pub metadata_hash: Option<String>,
    pub voted_hash: Option<VotedHash>,
    pub consensus_hash: Option<String>,
    pub corroborating_nodes: usize,
    pub required_nodes: usize,
    pub verified_nodes: Vec<String>,
    pub rejected_nodes: Vec<String>,
}

/// Minimum number of corroborating nodes among `verified` signers.
///
/// This is one third rounded up, which is weaker than the usual two-thirds
/// Byzantine bound.
pub fn consensus_threshold(verified: usize) -> usize {
    verified.div_ceil(3)
}

/// Counts votes per hash and returns the best supported one. When several
/// hashes share the top count there is no winner: `hash` is `None` and only
/// the count is reported.
pub fn tally<'a>(votes: impl IntoIterator<Item = &'a Hash384>) -> ConsensusResult {
    let mut counts: BTreeMap<&Hash384, usize> = BTreeMap::new();
    for hash in votes {
        *counts.entry(hash).or_default() += 1;
    }

    counts
        .into_iter()
        .fold(ConsensusResult::default(), |best, (hash, count)| {
            match count.cmp(&best.corroborating_node_count) {
                Ordering::Greater => ConsensusResult {
                    hash: Some(*hash),
                    corroborating_node_count: count,
                },
                Ordering::Equal => ConsensusResult { hash: None, ..best },
                Ordering::Less => best,
            }
        })
}

pub fn verify_signature(
    public_key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> std::result::Result<(), String> {
    let signature = Signature::try_from(signature).map_err(|e| e.to_string())?;
    VerifyingKey::<Sha384>::new(public_key.clone())
        .verify(message, &signature)
        .map_err(|e| e.to_string())
}

/// Checks one node's signatures and returns the hash it votes for.
fn verify_entry(
    address_book: &AddressBook,
    entry: &SignatureFileEntry,
    voted_hash: VotedHash,
    observer: &dyn ProofObserver,
) -> Option<Hash384> {
    let reject = |artifact: &'static str, reason: String| {
        observer.on_event(&ProofEvent::SignatureRejected {
            node_id: entry.node_id.clone(),
            artifact,
            reason,
        });
        None
    };

    let Some(node) = address_book.get(&entry.node_id) else {
        observer.on_event(&ProofEvent::UnknownNode { node_id: entry.node_id.clone() });
        return None;
    };
    let public_key = match node.public_key() {
        Ok(key) => key,
        Err(reason) => return reject("public key", reason),
    };

    if let Err(reason) = verify_signature(&public_key, &entry.file_hash, &entry.file_hash_signature) {
        return reject("file hash", reason);
    }
    if let (Some(hash), Some(signature)) = (&entry.metadata_hash, &entry.metadata_hash_signature) {
        if let Err(reason) = verify_signature(&public_key, hash, signature) {
            return reject("metadata hash", reason);
        }
    }

    let vote = match voted_hash {
        VotedHash::FileHash => entry.file_hash,
        VotedHash::MetadataHash => match (entry.metadata_hash, &entry.metadata_hash_signature) {
            (Some(hash), Some(_)) => hash,
            _ => return reject("metadata hash", "signature file has no signed metadata hash".into()),
        },
    };

    observer.on_event(&ProofEvent::SignatureVerified {
        node_id: entry.node_id.clone(),
        hash: hex::encode(vote),
    });
    Some(vote)
}

/// Runs signature verification and the consensus vote for parsed inputs.
pub fn perform_state_proof(
    address_book: &AddressBook,
    entries: &[SignatureFileEntry],
    hashes: &RecordFileHashes,
    observer: &dyn ProofObserver,
) -> ProofOutcome {
    let (voted_hash, expected) = match (hashes.file_hash, hashes.metadata_hash) {
        (Some(file_hash), _) => (VotedHash::FileHash, file_hash),
        (None, Some(metadata_hash)) => (VotedHash::MetadataHash, metadata_hash),
        (None, None) => {
            return ProofOutcome {
                valid: false,
                voted_hash: None,
                consensus: ConsensusResult::default(),
                required_nodes: 0,
                verified_nodes: Vec::new(),
                rejected_nodes: entries.iter().map(|e| e.node_id.clone()).collect(),
            }
        }
    };

    // Each entry is checked independently; the tally below only starts once
    // all of them are done.
    let results: Vec<(&SignatureFileEntry, Option<Hash384>)> = entries
        .iter()
        .map(|entry| (entry, verify_entry(address_book, entry, voted_hash, observer)))
        .collect();

    let mut verified_nodes = Vec::new();
    let mut rejected_nodes = Vec::new();
    let mut votes = Vec::new();
    for (entry, vote) in &results {
        match vote {
            Some(hash) => {
                verified_nodes.push(entry.node_id.clone());
                votes.push(hash);
            }
            None => rejected_nodes.push(entry.node_id.clone()),
        }
    }

    let consensus = tally(votes.iter().copied());
    let required_nodes = consensus_threshold(votes.len());

    let valid = match consensus.hash {
        Some(hash) if consensus.corroborating_node_count >= required_nodes => {
            observer.on_event(&ProofEvent::ConsensusReached {
                hash: hex::encode(hash),
                corroborating_nodes: consensus.corroborating_node_count,
                required_nodes,
            });
            if hash == expected {
                true
            } else {
                observer.on_event(&ProofEvent::HashMismatch {
                    consensus: hex::encode(hash),
                    record_file: hex::encode(expected),
                });
                false
            }
        }
        _ => {
            observer.on_event(&ProofEvent::ConsensusNotReached {
                best_count: consensus.corroborating_node_count,
                required_nodes,
            });
            false
        }
    };

    ProofOutcome {
        valid,
        voted_hash: Some(voted_hash),
        consensus,
        required_nodes,
        verified_nodes,
        rejected_nodes,
    }
}

/// Verifies state proofs, reporting progress to an observer.
pub struct StateProof<'o> {
    observer: &'o dyn ProofObserver,
}

impl Default for StateProof<'static> {
    fn default() -> Self {
        Self { observer: &TracingObserver }
    }
}

impl<'o> StateProof<'o> {
    pub fn with_observer(observer: &'o dyn ProofObserver) -> Self {
        Self { observer }
    }

    /// Proves that `transaction` succeeded in the bundle's record file.
    ///
    /// Malformed inputs are errors. A well-formed bundle that does not prove
    /// the transaction yields a report with `valid == false`.
    pub fn verify(
        &self,
        bundle: &StateProofBundle,
        transaction: &TransactionKey,
    ) -> Result<StateProofReport> {
        let address_book = address_book::latest(&bundle.address_books)?;
        let record_file = match &bundle.record_file {
            RecordFileInput::Full(bytes) => RecordFile::from_bytes(bytes)?,
            RecordFileInput::Compact(proof) => RecordFile::from_compact(proof)?,
        };
        let hashes = RecordFileHashes::of(&record_file);

        let mut report = StateProofReport {
            valid: false,
            transaction: transaction.to_string(),
            record_file_version: record_file.version(),
            compact: record_file.is_compact(),
            file_hash: hashes.file_hash.map(hex::encode),
            metadata_hash: hashes.metadata_hash.map(hex::encode),
            voted_hash: None,
            consensus_hash: None,
            corroborating_nodes: 0,
            required_nodes: 0,
            verified_nodes: Vec::new(),
            rejected_nodes: Vec::new(),
        };

        if !record_file.contains_transaction(transaction) {
            self.observer.on_event(&ProofEvent::TransactionMissing {
                transaction: report.transaction.clone(),
            });
            return Ok(report);
        }

        let entries = bundle
            .signature_files
            .iter()
            .map(|(node_id, bytes)| {
                SignatureFile::from_bytes(bytes)
                    .map(|file| file.into_entry(node_id.clone()))
                    .map_err(|source| ProofError::SignatureFile {
                        node: node_id.clone(),
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let outcome = perform_state_proof(&address_book, &entries, &hashes, self.observer);
        if outcome.valid {
            self.observer.on_event(&ProofEvent::ProofValid {
                transaction: report.transaction.clone(),
            });
        }

        report.valid = outcome.valid;
        report.voted_hash = outcome.voted_hash;
        report.consensus_hash = outcome.consensus.hash.map(hex::encode);
        report.corroborating_nodes = outcome.consensus.corroborating_node_count;
        report.required_nodes = outcome.required_nodes;
        report.verified_nodes = outcome.verified_nodes;
        report.rejected_nodes = outcome.rejected_nodes;
        Ok(report)
    }
}
