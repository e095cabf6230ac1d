// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stream object framing shared by record and signature files.

pub mod cursor;
pub mod object;
pub mod hash_object;
pub mod signature_object;
pub mod record_stream_object;
pub mod running_hash;

/// A SHA-384 digest.
pub type Hash384 = [u8; crate::config::SHA384_LENGTH];

pub use cursor::ByteCursor;
pub use hash_object::HashObject;
pub use object::{StreamObject, StreamObjectHeader};
pub use record_stream_object::RecordStreamObject;
pub use running_hash::{chain, sha384, RunningHash};
pub use signature_object::SignatureObject;
