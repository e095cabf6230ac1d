// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! mirror-stateproof: offline verification that a transaction reached consensus.
//!
//! A state proof bundles a record stream file (or a compact proof cut from
//! one), the signature files of the consensus nodes and the address book
//! holding their keys. Verification checks that the transaction succeeded in
//! the record file, that enough nodes signed the same hash, and that this hash
//! is the one computed from the record file.

pub mod config;
pub mod error;
pub mod proto;
pub mod stream;
pub mod transaction;
pub mod record_file;
pub mod signature_file;
pub mod address_book;
pub mod observer;
pub mod state_proof;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

#[cfg(test)]
mod tests;

pub use address_book::{AddressBook, AddressBookEntry};
pub use error::{ProofError, Result};
pub use observer::{ProofEvent, ProofObserver, RecordingObserver, TracingObserver};
pub use record_file::{CompactProof, RecordFile};
pub use signature_file::{SignatureFile, SignatureFileEntry};
pub use state_proof::{
    consensus_threshold, perform_state_proof, RecordFileInput, StateProof, StateProofBundle,
    StateProofReport,
};
pub use stream::Hash384;
pub use transaction::{TransactionId, TransactionKey};
