// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants for the record stream, signature and address book formats.

/// Length of a SHA-384 digest.
pub const SHA384_LENGTH: usize = 48;

/// Size of a stream object header: class id (8) + class version (4).
pub const STREAM_OBJECT_HEADER_LENGTH: usize = 12;

pub const HASH_OBJECT_CLASS_ID: i64 = 0xf422_da83_a251_741e_u64 as i64;
pub const SIGNATURE_OBJECT_CLASS_ID: i64 = 0x13dc_4b39_9b24_5c69;
pub const RECORD_STREAM_OBJECT_CLASS_ID: i64 = 0xe370_929b_a542_9d8b_u64 as i64;

/// Class version shared by every stream object we understand.
pub const STREAM_OBJECT_CLASS_VERSION: i32 = 1;

/// Digest type id written in front of SHA-384 hashes.
pub const DIGEST_TYPE_SHA384: i32 = 0x58ff_811b;

/// Signature type id for SHA384withRSA.
pub const SIGNATURE_TYPE_SHA384_WITH_RSA: i32 = 1;

/// Protobuf enum values used by the v6 formats.
pub const PROTO_HASH_ALGORITHM_SHA384: i32 = 1;
pub const PROTO_SIGNATURE_TYPE_SHA384_WITH_RSA: i32 = 1;

pub const MAX_SIGNATURE_LENGTH: usize = 384;
pub const MAX_TRANSACTION_LENGTH: usize = 64 * 1024;
pub const MAX_RECORD_LENGTH: usize = 64 * 1024;

/// Checksum of a length field is `CHECKSUM_BASE - length`.
pub const CHECKSUM_BASE: i32 = 101;

/// Object stream version carried in v5 record files.
pub const OBJECT_STREAM_VERSION: i32 = 1;
/// Object stream signature version carried in v5 signature files.
pub const OBJECT_STREAM_SIGNATURE_VERSION: i32 = 1;

/// Pre-v5 record file markers.
pub const PRE_V5_PREV_HASH_MARKER: u8 = 1;
pub const PRE_V5_RECORD_MARKER: u8 = 2;
/// Fixed header of a pre-v5 file: version, protocol version, marker, previous hash.
pub const PRE_V5_HEADER_LENGTH: usize = 4 + 4 + 1 + SHA384_LENGTH;

/// v2 signature file markers.
pub const SIGNATURE_FILE_V2_HASH_MARKER: u8 = 4;
pub const SIGNATURE_FILE_V2_SIGNATURE_MARKER: u8 = 3;

/// Receipt status codes counted as success: SUCCESS,
/// FEE_SCHEDULE_FILE_PART_UPLOADED and SUCCESS_BUT_MISSING_EXPECTED_OPERATION.
pub const SUCCESS: i32 = 22;
pub const FEE_SCHEDULE_FILE_PART_UPLOADED: i32 = 104;
pub const SUCCESS_BUT_MISSING_EXPECTED_OPERATION: i32 = 220;
pub const SUCCESSFUL_STATUSES: [i32; 3] = [
    SUCCESS,
    FEE_SCHEDULE_FILE_PART_UPLOADED,
    SUCCESS_BUT_MISSING_EXPECTED_OPERATION,
];
