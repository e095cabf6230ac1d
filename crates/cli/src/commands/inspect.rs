// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::Path;

use mirror_stateproof::{AddressBook, RecordFile, SignatureFile};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Record,
    Signature,
    AddressBook,
}

pub fn run(path: &Path, kind: FileKind) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = describe(kind, &bytes)?;

    println!("\n{}", path.display());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![field, value]);
    }
    println!("{table}");
    Ok(())
}

/// Field/value pairs describing a parsed file.
pub fn describe(kind: FileKind, bytes: &[u8]) -> Result<Vec<(String, String)>> {
    match kind {
        FileKind::Record => describe_record_file(bytes),
        FileKind::Signature => describe_signature_file(bytes),
        FileKind::AddressBook => describe_address_book(bytes),
    }
}

fn row(field: &str, value: impl ToString) -> (String, String) {
    (field.to_string(), value.to_string())
}

fn describe_record_file(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let file = RecordFile::from_bytes(bytes).context("Not a record file")?;

    let mut rows = vec![
        row("Version", file.version()),
        row("Records", file.transaction_count()),
        row("Successful", file.successful_transactions().count()),
    ];
    if let Some(hapi) = file.hapi_version() {
        rows.push(row("HAPI version", hapi));
    }
    if let Some(hash) = file.file_hash() {
        rows.push(row("File hash", hex::encode(hash)));
    }
    if let Some(hash) = file.metadata_hash() {
        rows.push(row("Metadata hash", hex::encode(hash)));
    }

    match &file {
        RecordFile::PreV5(inner) => {
            rows.push(row("Protocol version", inner.protocol_version()));
            rows.push(row("Previous file hash", hex::encode(inner.previous_hash())));
        }
        RecordFile::V5(inner) | RecordFile::V6(inner) => {
            rows.push(row("Start running hash", hex::encode(inner.start_running_hash())));
            rows.push(row("End running hash", hex::encode(inner.end_running_hash())));
            if let Some(block) = inner.block_number() {
                rows.push(row("Block number", block));
            }
        }
    }
    Ok(rows)
}

fn describe_signature_file(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let file = SignatureFile::from_bytes(bytes).context("Not a signature file")?;

    let mut rows = vec![
        row("Version", file.version),
        row("File hash", hex::encode(file.file_hash)),
        row("File signature", format!("{} bytes", file.file_hash_signature.len())),
    ];
    if let (Some(hash), Some(signature)) = (&file.metadata_hash, &file.metadata_hash_signature) {
        rows.push(row("Metadata hash", hex::encode(hash)));
        rows.push(row("Metadata signature", format!("{} bytes", signature.len())));
    }
    Ok(rows)
}

fn describe_address_book(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let book = AddressBook::from_bytes(bytes).context("Not an address book")?;

    let mut rows = vec![row("Nodes", book.len())];
    for entry in book.iter() {
        let status = match entry.public_key() {
            Ok(_) => format!("RSA key, {} DER bytes", entry.public_key_hex.len() / 2),
            Err(e) => format!("unusable key: {e}"),
        };
        rows.push(row(&entry.node_id, status));
    }
    Ok(rows)
}
