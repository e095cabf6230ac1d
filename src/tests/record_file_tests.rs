// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{PRE_V5_HEADER_LENGTH, SUCCESS_BUT_MISSING_EXPECTED_OPERATION};
use crate::error::ProofError;
use crate::fixtures::{self, SampleTransaction, START_RUNNING_HASH};
use crate::record_file::compact::V5_HEAD_LENGTH;
use crate::record_file::{v6, HapiVersion, RecordFile};
use crate::stream::running_hash::{sha384, sha384_concat};
use crate::stream::HashObject;

fn sample_transactions() -> Vec<SampleTransaction> {
    vec![
        SampleTransaction::successful(1),
        SampleTransaction::failed(2),
        SampleTransaction::successful(3),
    ]
}

#[test]
fn test_version_dispatch() {
    let txs = sample_transactions();

    let cases = [
        (1, fixtures::pre_v5_record_file(1, &txs)),
        (2, fixtures::pre_v5_record_file(2, &txs)),
        (5, fixtures::v5_record_file(&txs)),
        (6, fixtures::v6_record_file(&txs, 42)),
    ];
    for (version, bytes) in cases {
        let file = RecordFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.version(), version);
        let variant_matches = match file {
            RecordFile::PreV5(_) => version < 5,
            RecordFile::V5(_) => version == 5,
            RecordFile::V6(_) => version == 6,
        };
        assert!(variant_matches, "version {version} dispatched to the wrong variant");
    }
}

#[test]
fn test_unsupported_versions_rejected() {
    let txs = sample_transactions();
    let body = fixtures::v5_record_file(&txs);

    for version in [0i32, 3, 4, 7, 8, 100, i32::MAX, -1] {
        let mut bytes = body.clone();
        bytes[..4].copy_from_slice(&version.to_be_bytes());
        match RecordFile::from_bytes(&bytes) {
            Err(ProofError::UnsupportedVersion { what: "record file", version: v }) => {
                assert_eq!(v, version as i64)
            }
            other => panic!("version {version}: expected UnsupportedVersion, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_buffer_is_truncated() {
    assert!(matches!(RecordFile::from_bytes(&[0, 0]), Err(ProofError::Truncated { .. })));
}

#[test]
fn test_success_index_exclusivity() {
    let ok = SampleTransaction::successful(1);
    let failed = SampleTransaction::failed(2);
    let txs = vec![ok.clone(), failed.clone()];

    for bytes in [
        fixtures::pre_v5_record_file(2, &txs),
        fixtures::v5_record_file(&txs),
        fixtures::v6_record_file(&txs, 7),
    ] {
        let file = RecordFile::from_bytes(&bytes).unwrap();
        assert!(file.contains_transaction(&ok.key));
        assert!(!file.contains_transaction(&failed.key));
        assert_eq!(file.transaction_count(), 2);
        assert_eq!(file.successful_transactions().count(), 1);
    }
}

#[test]
fn test_synthetic_success_statuses_indexed() {
    let tx = SampleTransaction::with_status(9, SUCCESS_BUT_MISSING_EXPECTED_OPERATION);
    let file = RecordFile::from_bytes(&fixtures::v5_record_file(&[tx.clone()])).unwrap();
    assert!(file.contains_transaction(&tx.key));
}

#[test]
fn test_child_transactions_keyed_by_nonce() {
    let parent = SampleTransaction::successful(1);
    let child = SampleTransaction::child_of(&parent, 1, crate::config::SUCCESS);
    let failed_child = SampleTransaction::child_of(&parent, 2, fixtures::FAILED_STATUS);

    let file = RecordFile::from_bytes(&fixtures::v5_record_file(&[
        parent.clone(),
        child.clone(),
        failed_child.clone(),
    ]))
    .unwrap();

    assert_ne!(parent.key, child.key);
    assert!(file.contains_transaction(&parent.key));
    assert!(file.contains_transaction(&child.key));
    assert!(!file.contains_transaction(&failed_child.key));
}

#[test]
fn test_pre_v5_file_hashes() {
    let txs = sample_transactions();

    // 1. v1 hashes the whole file
    let v1 = fixtures::pre_v5_record_file(1, &txs);
    let file = RecordFile::from_bytes(&v1).unwrap();
    assert_eq!(file.file_hash(), Some(sha384(&v1)));
    assert_eq!(file.metadata_hash(), None);
    assert_eq!(file.hapi_version(), None);

    // 2. v2 hashes the header and the hash of the body
    let v2 = fixtures::pre_v5_record_file(2, &txs);
    let (header, body) = v2.split_at(PRE_V5_HEADER_LENGTH);
    let file = RecordFile::from_bytes(&v2).unwrap();
    assert_eq!(file.file_hash(), Some(sha384_concat(&[header, &sha384(body)])));
    assert_ne!(file.file_hash(), Some(sha384(&v2)));

    match file {
        RecordFile::PreV5(inner) => {
            assert_eq!(inner.protocol_version(), 3);
            assert_eq!(inner.previous_hash(), &fixtures::PREVIOUS_FILE_HASH);
        }
        other => panic!("expected pre-v5 file, got {other:?}"),
    }
}

#[test]
fn test_pre_v5_bad_record_marker() {
    let mut bytes = fixtures::pre_v5_record_file(2, &sample_transactions());
    bytes[PRE_V5_HEADER_LENGTH] = 9;
    assert!(matches!(
        RecordFile::from_bytes(&bytes),
        Err(ProofError::Malformed { offset, .. }) if offset == PRE_V5_HEADER_LENGTH
    ));
}

#[test]
fn test_pre_v5_truncated_record() {
    let mut bytes = fixtures::pre_v5_record_file(1, &sample_transactions());
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(RecordFile::from_bytes(&bytes), Err(ProofError::Truncated { .. })));
}

#[test]
fn test_v5_hashes() {
    let txs = sample_transactions();
    let bytes = fixtures::v5_record_file(&txs);
    let file = RecordFile::from_bytes(&bytes).unwrap();

    assert_eq!(file.file_hash(), Some(sha384(&bytes)));

    let head = &bytes[..V5_HEAD_LENGTH];
    let start = HashObject::new(START_RUNNING_HASH).to_bytes();
    let end = HashObject::new(fixtures::end_running_hash(&txs)).to_bytes();
    assert_eq!(file.metadata_hash(), Some(sha384_concat(&[head, &start, &end])));

    assert_eq!(file.hapi_version(), Some(HapiVersion { major: 0, minor: 27, patch: 3 }));
    assert!(!file.is_compact());
}

#[test]
fn test_v5_empty_record_list() {
    let file = RecordFile::from_bytes(&fixtures::v5_record_file(&[])).unwrap();
    assert_eq!(file.transaction_count(), 0);
    assert_eq!(file.successful_transactions().count(), 0);
}

#[test]
fn test_v5_trailing_bytes_rejected() {
    let mut bytes = fixtures::v5_record_file(&sample_transactions());
    bytes.push(0);
    assert!(matches!(
        RecordFile::from_bytes(&bytes),
        Err(ProofError::ExtraData { remaining: 1, .. })
    ));

    let mut bytes = fixtures::v5_record_file(&sample_transactions());
    bytes.extend_from_slice(&HashObject::new([1; 48]).to_bytes());
    assert!(matches!(RecordFile::from_bytes(&bytes), Err(ProofError::ExtraData { .. })));
}

#[test]
fn test_v5_object_stream_version_checked() {
    let mut bytes = fixtures::v5_record_file(&sample_transactions());
    // version and the three HAPI fields precede it.
    bytes[16..20].copy_from_slice(&2i32.to_be_bytes());
    assert!(matches!(
        RecordFile::from_bytes(&bytes),
        Err(ProofError::Malformed { offset: 16, .. })
    ));
}

#[test]
fn test_v5_missing_end_hash() {
    let mut bytes = fixtures::v5_record_file(&sample_transactions());
    bytes.truncate(bytes.len() - HashObject::SIZE);
    assert!(RecordFile::from_bytes(&bytes).is_err());
}

#[test]
fn test_v6_hashes() {
    let txs = sample_transactions();
    let bytes = fixtures::v6_record_file(&txs, 1234);
    let file = RecordFile::from_bytes(&bytes).unwrap();

    assert_eq!(file.file_hash(), Some(sha384(&bytes)));

    let hapi = HapiVersion { major: 0, minor: 27, patch: 3 };
    let head = v6::head(6, &hapi);
    assert_eq!(head.len(), 16);
    let expected = sha384_concat(&[
        &head,
        &START_RUNNING_HASH,
        &fixtures::end_running_hash(&txs),
        &1234i64.to_be_bytes(),
    ]);
    assert_eq!(file.metadata_hash(), Some(expected));

    match file {
        RecordFile::V6(inner) => {
            assert_eq!(inner.block_number(), Some(1234));
            assert_eq!(inner.end_running_hash(), &fixtures::end_running_hash(&txs));
        }
        other => panic!("expected v6 file, got {other:?}"),
    }
}

#[test]
fn test_v6_block_number_changes_metadata_hash() {
    let txs = sample_transactions();
    let a = RecordFile::from_bytes(&fixtures::v6_record_file(&txs, 1)).unwrap();
    let b = RecordFile::from_bytes(&fixtures::v6_record_file(&txs, 2)).unwrap();
    assert_ne!(a.metadata_hash(), b.metadata_hash());
}

#[test]
fn test_v6_garbage_payload() {
    let mut bytes = 6i32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0x0a, 0xff, 0xff]);
    assert!(matches!(RecordFile::from_bytes(&bytes), Err(ProofError::Decode { .. })));
}

#[test]
fn test_v6_missing_running_hash() {
    // Only the hapi version (field 1) is present.
    let mut bytes = 6i32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0x0a, 0x02, 0x10, 0x1b]);
    assert!(matches!(RecordFile::from_bytes(&bytes), Err(ProofError::Malformed { .. })));
}
