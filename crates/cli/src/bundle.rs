// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! JSON transport form of a state proof bundle. Every binary payload is a
//! base64 string.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use mirror_stateproof::{CompactProof, RecordFileInput, StateProofBundle};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BundleJson {
    pub address_books: Vec<String>,
    pub record_file: RecordFileJson,
    pub signature_files: BTreeMap<String, String>,
}

/// Either the whole record file or a compact proof cut from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecordFileJson {
    Full(String),
    Compact(CompactProofJson),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompactProofJson {
    pub head: String,
    pub start_running_hash_object: String,
    pub hashes_before: Vec<String>,
    pub record_stream_object: String,
    pub hashes_after: Vec<String>,
    pub end_running_hash_object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<i64>,
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .with_context(|| format!("Invalid base64 in {field}"))
}

fn decode_all(field: &str, values: &[String]) -> Result<Vec<Vec<u8>>> {
    values.iter().map(|v| decode(field, v)).collect()
}

fn encode_all(values: &[Vec<u8>]) -> Vec<String> {
    values.iter().map(|v| STANDARD.encode(v)).collect()
}

impl CompactProofJson {
    pub fn from_proof(proof: &CompactProof) -> Self {
        Self {
            head: STANDARD.encode(&proof.head),
            start_running_hash_object: STANDARD.encode(&proof.start_running_hash_object),
            hashes_before: encode_all(&proof.hashes_before),
            record_stream_object: STANDARD.encode(&proof.record_stream_object),
            hashes_after: encode_all(&proof.hashes_after),
            end_running_hash_object: STANDARD.encode(&proof.end_running_hash_object),
            block_number: proof.block_number,
        }
    }

    pub fn to_proof(&self) -> Result<CompactProof> {
        Ok(CompactProof {
            head: decode("head", &self.head)?,
            start_running_hash_object: decode("start_running_hash_object", &self.start_running_hash_object)?,
            hashes_before: decode_all("hashes_before", &self.hashes_before)?,
            record_stream_object: decode("record_stream_object", &self.record_stream_object)?,
            hashes_after: decode_all("hashes_after", &self.hashes_after)?,
            end_running_hash_object: decode("end_running_hash_object", &self.end_running_hash_object)?,
            block_number: self.block_number,
        })
    }
}

impl BundleJson {
    pub fn from_bundle(bundle: &StateProofBundle) -> Self {
        let record_file = match &bundle.record_file {
            RecordFileInput::Full(bytes) => RecordFileJson::Full(STANDARD.encode(bytes)),
            RecordFileInput::Compact(proof) => RecordFileJson::Compact(CompactProofJson::from_proof(proof)),
        };

        Self {
            address_books: encode_all(&bundle.address_books),
            record_file,
            signature_files: bundle
                .signature_files
                .iter()
                .map(|(node, bytes)| (node.clone(), STANDARD.encode(bytes)))
                .collect(),
        }
    }

    pub fn to_bundle(&self) -> Result<StateProofBundle> {
        let record_file = match &self.record_file {
            RecordFileJson::Full(data) => RecordFileInput::Full(decode("record_file", data)?),
            RecordFileJson::Compact(proof) => RecordFileInput::Compact(proof.to_proof()?),
        };

        let signature_files = self
            .signature_files
            .iter()
            .map(|(node, data)| Ok((node.clone(), decode(&format!("signature file of {node}"), data)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(StateProofBundle {
            address_books: decode_all("address_books", &self.address_books)?,
            record_file,
            signature_files,
        })
    }
}

pub fn load(path: &Path) -> Result<StateProofBundle> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle {}", path.display()))?;
    let json: BundleJson = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse bundle {}", path.display()))?;
    json.to_bundle()
}

pub fn save(path: &Path, bundle: &StateProofBundle) -> Result<()> {
    let text = serde_json::to_string_pretty(&BundleJson::from_bundle(bundle))?;
    fs::write(path, text).with_context(|| format!("Failed to write bundle {}", path.display()))
}
