// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProofError {
    #[error("{what}: truncated at offset {offset}, needed {needed} bytes but only {available} available")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{what}: malformed at offset {offset}, expected {expected}, found {found}")]
    Malformed {
        what: &'static str,
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("{what}: {remaining} bytes of extra data at offset {offset}")]
    ExtraData {
        what: &'static str,
        offset: usize,
        remaining: usize,
    },

    #[error("Unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: i64 },

    #[error("Running hash mismatch: expected {expected}, computed {computed}")]
    HashChainMismatch { expected: String, computed: String },

    #[error("Transaction {0} not found in record file")]
    TransactionNotFound(String),

    #[error("{operation} is not supported for record file version {version}")]
    UnsupportedOperation { operation: &'static str, version: i32 },

    #[error("Protobuf decode error in {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    #[error("Signature file of node {node}: {source}")]
    SignatureFile {
        node: String,
        #[source]
        source: Box<ProofError>,
    },

    #[error("Invalid transaction id: {0}")]
    InvalidTransactionId(String),

    #[error("No address book supplied")]
    MissingAddressBook,
}

impl ProofError {
    pub(crate) fn malformed(
        what: &'static str,
        offset: usize,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        ProofError::Malformed {
            what,
            offset,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn decode(what: &'static str) -> impl FnOnce(prost::DecodeError) -> Self {
        move |source| ProofError::Decode { what, source }
    }
}

pub type Result<T> = std::result::Result<T, ProofError>;
