// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protobuf messages consumed by the verifier.
//!
//! Messages carry the fields the verifier reads plus the ones needed to
//! build realistic files in fixtures; prost skips undeclared fields.
//! Field tags follow the network's published `.proto` definitions
//! (`basic_types`, `transaction_record`, `record_stream_file`, `signature_file`).

/// Seconds and nanos since the epoch.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub account_num: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionReceipt {
    /// `ResponseCodeEnum`, kept as its wire integer.
    #[prost(int32, tag = "1")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionRecord {
    #[prost(message, optional, tag = "1")]
    pub receipt: Option<TransactionReceipt>,
    #[prost(bytes = "vec", tag = "2")]
    pub transaction_hash: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub consensus_timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub transaction_id: Option<TransactionId>,
    #[prost(string, tag = "5")]
    pub memo: String,
    #[prost(uint64, tag = "6")]
    pub transaction_fee: u64,
}

/// Signed transaction envelope; the verifier never looks inside.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "5")]
    pub signed_transaction_bytes: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SemanticVersion {
    #[prost(int32, tag = "1")]
    pub major: i32,
    #[prost(int32, tag = "2")]
    pub minor: i32,
    #[prost(int32, tag = "3")]
    pub patch: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashObject {
    /// `HashAlgorithm`; SHA_384 = 1.
    #[prost(int32, tag = "1")]
    pub algorithm: i32,
    #[prost(int32, tag = "2")]
    pub length: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub hash: Vec<u8>,
}

/// The embedded messages are kept as their exact serialized bytes: running
/// hashes are computed over them, so they must not be re-encoded.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecordStreamItem {
    #[prost(bytes = "vec", tag = "1")]
    pub transaction: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub record: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecordStreamFile {
    #[prost(message, optional, tag = "1")]
    pub hapi_proto_version: Option<SemanticVersion>,
    #[prost(message, optional, tag = "2")]
    pub start_object_running_hash: Option<HashObject>,
    #[prost(message, repeated, tag = "3")]
    pub record_stream_items: Vec<RecordStreamItem>,
    #[prost(message, optional, tag = "4")]
    pub end_object_running_hash: Option<HashObject>,
    #[prost(int64, tag = "5")]
    pub block_number: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureObject {
    /// `SignatureType`; SHA_384_WITH_RSA = 1.
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(int32, tag = "2")]
    pub length: i32,
    #[prost(int32, tag = "3")]
    pub checksum: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub signature: Vec<u8>,
    #[prost(message, optional, tag = "5")]
    pub hash_object: Option<HashObject>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureFile {
    #[prost(message, optional, tag = "1")]
    pub file_signature: Option<SignatureObject>,
    #[prost(message, optional, tag = "2")]
    pub metadata_signature: Option<SignatureObject>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeAddress {
    #[prost(bytes = "vec", tag = "1")]
    pub ip_address: Vec<u8>,
    #[prost(int32, tag = "2")]
    pub portno: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub memo: Vec<u8>,
    /// Hex of the DER SubjectPublicKeyInfo.
    #[prost(string, tag = "4")]
    pub rsa_pub_key: String,
    #[prost(int64, tag = "5")]
    pub node_id: i64,
    #[prost(message, optional, tag = "6")]
    pub node_account_id: Option<AccountId>,
    #[prost(bytes = "vec", tag = "7")]
    pub node_cert_hash: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeAddressBook {
    #[prost(message, repeated, tag = "1")]
    pub node_address: Vec<NodeAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_record_stream_item_keeps_embedded_bytes() {
        let record = TransactionRecord {
            memo: "hello".into(),
            ..Default::default()
        }
        .encode_to_vec();
        let item = RecordStreamItem {
            transaction: vec![0x2a, 0x01, 0x00],
            record: record.clone(),
        };

        let decoded = RecordStreamItem::decode(item.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.record, record);
        assert_eq!(decoded.transaction, vec![0x2a, 0x01, 0x00]);
    }

    #[test]
    fn test_unknown_fields_skipped() {
        // Field 99 (varint) followed by memo.
        let mut buf = vec![0x98, 0x06, 0x01];
        buf.extend_from_slice(&TransactionRecord { memo: "m".into(), ..Default::default() }.encode_to_vec());
        let decoded = TransactionRecord::decode(buf.as_slice()).unwrap();
        assert_eq!(decoded.memo, "m");
    }
}
