// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Version 5 record files.
//!
//! ```text
//! [version: i32 = 5][hapi major: i32][hapi minor: i32][hapi patch: i32]
//! [object stream version: i32]
//! [start running hash: HashObject]
//! [RecordStreamObject]*
//! [end running hash: HashObject]
//! ```
//!
//! The record list has no count. It ends at the first object whose class id
//! is the start hash object's class id.

use crate::config::OBJECT_STREAM_VERSION;
use crate::error::{ProofError, Result};
use crate::record_file::chained::{ChainedRecordFile, HapiVersion, Records};
use crate::stream::running_hash::sha384;
use crate::stream::{ByteCursor, HashObject, RecordStreamObject, StreamObject};

pub const VERSION: i32 = 5;

const WHAT: &str = "v5 record file";

pub fn parse(bytes: &[u8]) -> Result<ChainedRecordFile> {
    let mut cursor = ByteCursor::new(bytes);
    let version = cursor.read_i32(WHAT)?;
    let hapi_version = HapiVersion {
        major: cursor.read_i32(WHAT)?,
        minor: cursor.read_i32(WHAT)?,
        patch: cursor.read_i32(WHAT)?,
    };
    let stream_version_offset = cursor.position();
    let object_stream_version = cursor.read_i32(WHAT)?;
    if object_stream_version != OBJECT_STREAM_VERSION {
        return Err(ProofError::malformed(
            WHAT,
            stream_version_offset,
            OBJECT_STREAM_VERSION,
            object_stream_version,
        ));
    }
    let head = cursor.since(0).to_vec();

    let start = HashObject::read(&mut cursor)?;
    let mut objects = Vec::new();
    while cursor.peek_i64(WHAT)? != start.header.class_id {
        objects.push(RecordStreamObject::read(&mut cursor)?);
    }
    let end = HashObject::read(&mut cursor)?;
    cursor.expect_end(WHAT)?;

    ChainedRecordFile::new(
        version,
        hapi_version,
        head,
        start,
        end,
        None,
        Records::Full(objects),
        Some(sha384(bytes)),
    )
}
