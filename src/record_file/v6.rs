// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Version 6 record files: `[version: i32 = 6][RecordStreamFile protobuf]`.
//!
//! Items carry no stream framing of their own; each is wrapped into a
//! `RecordStreamObject` so the running hash is computed exactly as for v5.

use prost::Message;

use crate::config::{MAX_RECORD_LENGTH, MAX_TRANSACTION_LENGTH};
use crate::error::{ProofError, Result};
use crate::proto;
use crate::record_file::chained::{ChainedRecordFile, HapiVersion, Records};
use crate::stream::running_hash::sha384;
use crate::stream::{ByteCursor, HashObject, RecordStreamObject};

pub const VERSION: i32 = 6;

const WHAT: &str = "v6 record file";

pub fn parse(bytes: &[u8]) -> Result<ChainedRecordFile> {
    let mut cursor = ByteCursor::new(bytes);
    let version = cursor.read_i32(WHAT)?;
    let file = proto::RecordStreamFile::decode(cursor.rest()).map_err(ProofError::decode(WHAT))?;

    let hapi = file
        .hapi_proto_version
        .as_ref()
        .ok_or_else(|| ProofError::malformed(WHAT, 4, "hapi proto version", "none"))?;
    let hapi_version = HapiVersion {
        major: hapi.major,
        minor: hapi.minor,
        patch: hapi.patch,
    };

    let start = file
        .start_object_running_hash
        .as_ref()
        .ok_or_else(|| ProofError::malformed(WHAT, 4, "start running hash", "none"))
        .and_then(|h| HashObject::from_proto(h, "v6 start running hash"))?;
    let end = file
        .end_object_running_hash
        .as_ref()
        .ok_or_else(|| ProofError::malformed(WHAT, 4, "end running hash", "none"))
        .and_then(|h| HashObject::from_proto(h, "v6 end running hash"))?;

    let objects = file
        .record_stream_items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if item.record.len() > MAX_RECORD_LENGTH || item.transaction.len() > MAX_TRANSACTION_LENGTH {
                return Err(ProofError::malformed(
                    "v6 record stream item",
                    i,
                    format!("record <= {MAX_RECORD_LENGTH}, transaction <= {MAX_TRANSACTION_LENGTH}"),
                    format!("record {}, transaction {}", item.record.len(), item.transaction.len()),
                ));
            }
            Ok(RecordStreamObject::new(item.record, item.transaction))
        })
        .collect::<Result<Vec<_>>>()?;

    ChainedRecordFile::new(
        version,
        hapi_version,
        head(version, &hapi_version),
        start,
        end,
        Some(file.block_number),
        Records::Full(objects),
        Some(sha384(bytes)),
    )
}

/// Four packed big-endian integers, mirroring the v5 head.
pub fn head(version: i32, hapi: &HapiVersion) -> Vec<u8> {
    [version, hapi.major, hapi.minor, hapi.patch]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect()
}
