// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Diagnostic events raised while a state proof runs.
//!
//! The verifier never logs directly; it reports to a `ProofObserver`. The
//! default observer forwards to `tracing`.

use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofEvent {
    TransactionMissing {
        transaction: String,
    },
    UnknownNode {
        node_id: String,
    },
    SignatureVerified {
        node_id: String,
        hash: String,
    },
    SignatureRejected {
        node_id: String,
        artifact: &'static str,
        reason: String,
    },
    ConsensusReached {
        hash: String,
        corroborating_nodes: usize,
        required_nodes: usize,
    },
    ConsensusNotReached {
        best_count: usize,
        required_nodes: usize,
    },
    HashMismatch {
        consensus: String,
        record_file: String,
    },
    ProofValid {
        transaction: String,
    },
}

pub trait ProofObserver {
    fn on_event(&self, event: &ProofEvent);
}

/// Emits every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProofObserver for TracingObserver {
    fn on_event(&self, event: &ProofEvent) {
        match event {
            ProofEvent::TransactionMissing { transaction } => {
                tracing::warn!(%transaction, "transaction not found among successful records")
            }
            ProofEvent::UnknownNode { node_id } => {
                tracing::warn!(%node_id, "signature file from node missing in address book")
            }
            ProofEvent::SignatureVerified { node_id, hash } => {
                tracing::debug!(%node_id, %hash, "signature verified")
            }
            ProofEvent::SignatureRejected { node_id, artifact, reason } => {
                tracing::warn!(%node_id, artifact, %reason, "signature rejected")
            }
            ProofEvent::ConsensusReached { hash, corroborating_nodes, required_nodes } => {
                tracing::info!(%hash, corroborating_nodes, required_nodes, "consensus reached")
            }
            ProofEvent::ConsensusNotReached { best_count, required_nodes } => {
                tracing::warn!(best_count, required_nodes, "consensus not reached")
            }
            ProofEvent::HashMismatch { consensus, record_file } => {
                tracing::warn!(%consensus, %record_file, "record file hash differs from consensus")
            }
            ProofEvent::ProofValid { transaction } => {
                tracing::info!(%transaction, "state proof valid")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ProofEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProofEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ProofObserver for RecordingObserver {
    fn on_event(&self, event: &ProofEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
