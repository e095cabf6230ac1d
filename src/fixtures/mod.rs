// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Builders for record files, signature files and address books, plus four
//! fixed RSA node keys. Used by the unit tests and, behind the `fixtures`
//! feature, by the CLI tests.

use std::collections::BTreeMap;

use prost::Message;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha384;

use crate::config::{
    CHECKSUM_BASE, OBJECT_STREAM_SIGNATURE_VERSION, OBJECT_STREAM_VERSION, PRE_V5_PREV_HASH_MARKER,
    PRE_V5_RECORD_MARKER, PROTO_SIGNATURE_TYPE_SHA384_WITH_RSA, SIGNATURE_FILE_V2_HASH_MARKER,
    SIGNATURE_FILE_V2_SIGNATURE_MARKER, SUCCESS,
};
use crate::proto;
use crate::record_file::RecordFile;
use crate::state_proof::{RecordFileInput, StateProofBundle};
use crate::stream::running_hash::sha384;
use crate::stream::{Hash384, HashObject, RecordStreamObject, RunningHash, SignatureObject};
use crate::transaction::{TransactionId, TransactionKey};

/// Running hash every generated v5/v6 file starts from.
pub const START_RUNNING_HASH: Hash384 = [0x5a; 48];
/// Previous file hash written into generated pre-v5 files.
pub const PREVIOUS_FILE_HASH: Hash384 = [0x07; 48];
pub const HAPI_VERSION: (i32, i32, i32) = (0, 27, 3);
/// INSUFFICIENT_PAYER_BALANCE
pub const FAILED_STATUS: i32 = 10;

const NODE_KEYS: [&str; 4] = [
    include_str!("keys/node0.pem"),
    include_str!("keys/node1.pem"),
    include_str!("keys/node2.pem"),
    include_str!("keys/node3.pem"),
];

/// One transaction with its record, both serialized.
#[derive(Debug, Clone)]
pub struct SampleTransaction {
    pub key: TransactionKey,
    pub transaction: Vec<u8>,
    pub record: Vec<u8>,
}

impl SampleTransaction {
    pub fn successful(n: i64) -> Self {
        Self::with_status(n, SUCCESS)
    }

    pub fn failed(n: i64) -> Self {
        Self::with_status(n, FAILED_STATUS)
    }

    /// Payer `0.0.(1000 + n)`, valid start `1_700_000_000 + n` seconds.
    pub fn with_status(n: i64, status: i32) -> Self {
        let id = proto::TransactionId {
            transaction_valid_start: Some(proto::Timestamp {
                seconds: 1_700_000_000 + n,
                nanos: n as i32,
            }),
            account_id: Some(proto::AccountId {
                shard_num: 0,
                realm_num: 0,
                account_num: 1000 + n,
            }),
            scheduled: false,
            nonce: 0,
        };
        Self::from_id(id, status, format!("transfer {n}"))
    }

    /// A child transaction sharing `parent`'s id with the given nonce.
    pub fn child_of(parent: &SampleTransaction, nonce: i32, status: i32) -> Self {
        let id = proto::TransactionId {
            transaction_valid_start: Some(proto::Timestamp {
                seconds: parent.key.transaction_id.valid_start_seconds,
                nanos: parent.key.transaction_id.valid_start_nanos,
            }),
            account_id: Some(proto::AccountId {
                shard_num: parent.key.transaction_id.shard,
                realm_num: parent.key.transaction_id.realm,
                account_num: parent.key.transaction_id.num,
            }),
            scheduled: false,
            nonce,
        };
        Self::from_id(id, status, format!("child {nonce}"))
    }

    fn from_id(id: proto::TransactionId, status: i32, memo: String) -> Self {
        let transaction = proto::Transaction {
            signed_transaction_bytes: memo.clone().into_bytes(),
        }
        .encode_to_vec();
        let record = proto::TransactionRecord {
            receipt: Some(proto::TransactionReceipt { status }),
            transaction_hash: sha384(&transaction).to_vec(),
            consensus_timestamp: id.transaction_valid_start,
            transaction_id: Some(id),
            memo,
            transaction_fee: 100_000,
        }
        .encode_to_vec();

        Self {
            key: TransactionKey::from_proto(&id),
            transaction,
            record,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.key.transaction_id
    }

    pub fn stream_object(&self) -> RecordStreamObject {
        RecordStreamObject::new(self.record.clone(), self.transaction.clone())
    }
}

/// Running hash after folding every transaction's stream object.
pub fn end_running_hash(transactions: &[SampleTransaction]) -> Hash384 {
    let start = HashObject::new(START_RUNNING_HASH);
    let mut running_hash = RunningHash::new(start.header, start.digest);
    for tx in transactions {
        let object = tx.stream_object();
        running_hash.update(&object.header, &object.hash());
    }
    running_hash.digest()
}

/// A version 1 or 2 record file.
pub fn pre_v5_record_file(version: i32, transactions: &[SampleTransaction]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&version.to_be_bytes());
    buf.extend_from_slice(&3i32.to_be_bytes());
    buf.push(PRE_V5_PREV_HASH_MARKER);
    buf.extend_from_slice(&PREVIOUS_FILE_HASH);
    for tx in transactions {
        buf.push(PRE_V5_RECORD_MARKER);
        buf.extend_from_slice(&(tx.transaction.len() as i32).to_be_bytes());
        buf.extend_from_slice(&tx.transaction);
        buf.extend_from_slice(&(tx.record.len() as i32).to_be_bytes());
        buf.extend_from_slice(&tx.record);
    }
    buf
}

pub fn v5_record_file(transactions: &[SampleTransaction]) -> Vec<u8> {
    let (major, minor, patch) = HAPI_VERSION;
    let mut buf = Vec::new();
    for value in [5, major, minor, patch, OBJECT_STREAM_VERSION] {
        buf.extend_from_slice(&value.to_be_bytes());
    }
    buf.extend(HashObject::new(START_RUNNING_HASH).to_bytes());
    for tx in transactions {
        buf.extend(tx.stream_object().to_bytes());
    }
    buf.extend(HashObject::new(end_running_hash(transactions)).to_bytes());
    buf
}

pub fn v6_record_file(transactions: &[SampleTransaction], block_number: i64) -> Vec<u8> {
    let (major, minor, patch) = HAPI_VERSION;
    let file = proto::RecordStreamFile {
        hapi_proto_version: Some(proto::SemanticVersion { major, minor, patch }),
        start_object_running_hash: Some(HashObject::new(START_RUNNING_HASH).to_proto()),
        record_stream_items: transactions
            .iter()
            .map(|tx| proto::RecordStreamItem {
                transaction: tx.transaction.clone(),
                record: tx.record.clone(),
            })
            .collect(),
        end_object_running_hash: Some(HashObject::new(end_running_hash(transactions)).to_proto()),
        block_number,
    };

    let mut buf = 6i32.to_be_bytes().to_vec();
    buf.extend(file.encode_to_vec());
    buf
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    V2,
    V5,
    V6,
}

impl SignatureFormat {
    /// The signature file version that accompanies a record file version.
    pub fn for_record_version(version: i32) -> Self {
        match version {
            5 => SignatureFormat::V5,
            6 => SignatureFormat::V6,
            _ => SignatureFormat::V2,
        }
    }
}

/// A consensus node with a fixed RSA key. Node `i` is account `0.0.(3 + i)`.
pub struct TestNode {
    pub account_num: i64,
    key: RsaPrivateKey,
}

impl TestNode {
    pub fn new(index: usize) -> Self {
        let key = RsaPrivateKey::from_pkcs8_pem(NODE_KEYS[index]).expect("fixture key parses");
        Self {
            account_num: 3 + index as i64,
            key,
        }
    }

    /// The four fixture nodes.
    pub fn all() -> Vec<TestNode> {
        (0..NODE_KEYS.len()).map(TestNode::new).collect()
    }

    pub fn node_id(&self) -> String {
        format!("0.0.{}", self.account_num)
    }

    pub fn public_key_hex(&self) -> String {
        let der = self
            .key
            .to_public_key()
            .to_public_key_der()
            .expect("fixture key encodes");
        hex::encode(der.as_bytes())
    }

    /// RSASSA-PKCS1-v1_5 with SHA-384 over `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        SigningKey::<Sha384>::new(self.key.clone()).sign(message).to_vec()
    }

    pub fn signature_file(
        &self,
        format: SignatureFormat,
        file_hash: &Hash384,
        metadata_hash: &Hash384,
    ) -> Vec<u8> {
        match format {
            SignatureFormat::V2 => self.v2_signature_file(file_hash),
            SignatureFormat::V5 => self.v5_signature_file(file_hash, metadata_hash),
            SignatureFormat::V6 => self.v6_signature_file(file_hash, metadata_hash),
        }
    }

    pub fn v2_signature_file(&self, file_hash: &Hash384) -> Vec<u8> {
        let signature = self.sign(file_hash);
        let mut buf = vec![SIGNATURE_FILE_V2_HASH_MARKER];
        buf.extend_from_slice(file_hash);
        buf.push(SIGNATURE_FILE_V2_SIGNATURE_MARKER);
        buf.extend_from_slice(&(signature.len() as i32).to_be_bytes());
        buf.extend(signature);
        buf
    }

    pub fn v5_signature_file(&self, file_hash: &Hash384, metadata_hash: &Hash384) -> Vec<u8> {
        let mut buf = vec![5u8];
        buf.extend_from_slice(&OBJECT_STREAM_SIGNATURE_VERSION.to_be_bytes());
        buf.extend(HashObject::new(*file_hash).to_bytes());
        buf.extend(SignatureObject::new(self.sign(file_hash)).to_bytes());
        buf.extend(HashObject::new(*metadata_hash).to_bytes());
        buf.extend(SignatureObject::new(self.sign(metadata_hash)).to_bytes());
        buf
    }

    pub fn v6_signature_file(&self, file_hash: &Hash384, metadata_hash: &Hash384) -> Vec<u8> {
        let file = proto::SignatureFile {
            file_signature: Some(self.signature_proto(file_hash)),
            metadata_signature: Some(self.signature_proto(metadata_hash)),
        };
        let mut buf = vec![6u8];
        buf.extend(file.encode_to_vec());
        buf
    }

    fn signature_proto(&self, hash: &Hash384) -> proto::SignatureObject {
        let signature = self.sign(hash);
        let length = signature.len() as i32;
        proto::SignatureObject {
            r#type: PROTO_SIGNATURE_TYPE_SHA384_WITH_RSA,
            length,
            checksum: CHECKSUM_BASE - length,
            signature,
            hash_object: Some(HashObject::new(*hash).to_proto()),
        }
    }

    fn address(&self) -> proto::NodeAddress {
        proto::NodeAddress {
            memo: self.node_id().into_bytes(),
            rsa_pub_key: self.public_key_hex(),
            node_id: self.account_num - 3,
            node_account_id: Some(proto::AccountId {
                shard_num: 0,
                realm_num: 0,
                account_num: self.account_num,
            }),
            ..Default::default()
        }
    }
}

pub fn address_book(nodes: &[TestNode]) -> Vec<u8> {
    proto::NodeAddressBook {
        node_address: nodes.iter().map(TestNode::address).collect(),
    }
    .encode_to_vec()
}

/// An address book that identifies nodes only through the memo.
pub fn legacy_address_book(nodes: &[TestNode]) -> Vec<u8> {
    proto::NodeAddressBook {
        node_address: nodes
            .iter()
            .map(|node| proto::NodeAddress {
                node_account_id: None,
                ..node.address()
            })
            .collect(),
    }
    .encode_to_vec()
}

/// Every node signs the hashes of `record_file` in the matching format.
pub fn signature_files(nodes: &[TestNode], record_file: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let parsed = RecordFile::from_bytes(record_file).expect("fixture record file parses");
    let format = SignatureFormat::for_record_version(parsed.version());
    let file_hash = parsed.file_hash().expect("full record file has a file hash");
    let metadata_hash = parsed.metadata_hash().unwrap_or([0u8; 48]);

    nodes
        .iter()
        .map(|node| (node.node_id(), node.signature_file(format, &file_hash, &metadata_hash)))
        .collect()
}

/// A bundle over the full `record_file`, signed by all of `nodes`.
pub fn bundle(record_file: Vec<u8>, nodes: &[TestNode]) -> StateProofBundle {
    StateProofBundle {
        address_books: vec![address_book(nodes)],
        signature_files: signature_files(nodes, &record_file),
        record_file: RecordFileInput::Full(record_file),
    }
}
