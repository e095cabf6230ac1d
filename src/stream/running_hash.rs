// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Running hash over consecutive stream objects.
//!
//! ```text
//! next = sha384(prev_header_le || prev_digest || next_header_le || next_digest)
//! ```
//!
//! Headers enter the hash little-endian even though they are stored big-endian
//! in the stream. Changing that order changes every derived hash.

use sha2::{Digest, Sha384};

use crate::config::SHA384_LENGTH;
use crate::stream::object::StreamObjectHeader;
use crate::stream::Hash384;

pub fn sha384(data: &[u8]) -> Hash384 {
    sha384_concat(&[data])
}

pub fn sha384_concat(parts: &[&[u8]]) -> Hash384 {
    let mut hasher = Sha384::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; SHA384_LENGTH];
    out.copy_from_slice(&hasher.finalize());
    out
}

pub fn chain(
    prev_header: &StreamObjectHeader,
    prev_digest: &Hash384,
    next_header: &StreamObjectHeader,
    next_digest: &Hash384,
) -> Hash384 {
    sha384_concat(&[
        &prev_header.to_le_bytes(),
        prev_digest,
        &next_header.to_le_bytes(),
        next_digest,
    ])
}

/// Accumulator folding object hashes into a running hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningHash {
    header: StreamObjectHeader,
    digest: Hash384,
}

impl RunningHash {
    /// `header` is the hash object header that every intermediate value carries.
    pub fn new(header: StreamObjectHeader, start: Hash384) -> Self {
        Self { header, digest: start }
    }

    pub fn update(&mut self, object_header: &StreamObjectHeader, object_digest: &Hash384) {
        self.digest = chain(&self.header, &self.digest, object_header, object_digest);
    }

    pub fn digest(&self) -> Hash384 {
        self.digest
    }
}
