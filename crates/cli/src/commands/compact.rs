// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use mirror_stateproof::{RecordFile, TransactionKey};

use crate::bundle::CompactProofJson;

/// Cuts a compact proof for `transaction` out of a full v5/v6 record file.
/// Writes JSON to `output`, or stdout when absent.
pub fn run(record_path: &Path, transaction: &TransactionKey, output: Option<&Path>) -> Result<CompactProofJson> {
    let bytes = fs::read(record_path)
        .with_context(|| format!("Failed to read record file {}", record_path.display()))?;
    let record_file = RecordFile::from_bytes(&bytes)
        .with_context(|| format!("Failed to parse record file {}", record_path.display()))?;
    let proof = record_file.to_compact_object(transaction)?;

    tracing::info!(
        transaction = %transaction,
        hashes_before = proof.hashes_before.len(),
        hashes_after = proof.hashes_after.len(),
        "compact proof extracted"
    );

    let json = CompactProofJson::from_proof(&proof);
    let text = serde_json::to_string_pretty(&json)?;
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(json)
}
