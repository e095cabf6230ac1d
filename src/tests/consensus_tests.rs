// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::address_book::AddressBook;
use crate::fixtures::{self, TestNode};
use crate::observer::{ProofEvent, RecordingObserver};
use crate::signature_file::{SignatureFile, SignatureFileEntry};
use crate::state_proof::{
    consensus_threshold, perform_state_proof, tally, RecordFileHashes, VotedHash,
};
use crate::stream::Hash384;

const HASH_A: Hash384 = [0x0a; 48];
const HASH_B: Hash384 = [0x0b; 48];
const METADATA: Hash384 = [0x4d; 48];

fn entry(node: &TestNode, file_hash: &Hash384) -> SignatureFileEntry {
    SignatureFile::from_bytes(&node.v2_signature_file(file_hash))
        .unwrap()
        .into_entry(node.node_id())
}

fn v5_entry(node: &TestNode, file_hash: &Hash384, metadata_hash: &Hash384) -> SignatureFileEntry {
    SignatureFile::from_bytes(&node.v5_signature_file(file_hash, metadata_hash))
        .unwrap()
        .into_entry(node.node_id())
}

fn book(nodes: &[TestNode]) -> AddressBook {
    AddressBook::from_bytes(&fixtures::address_book(nodes)).unwrap()
}

fn file_hashes(file_hash: Hash384) -> RecordFileHashes {
    RecordFileHashes { file_hash: Some(file_hash), metadata_hash: None }
}

#[test]
fn test_threshold_is_one_third_rounded_up() {
    let expected = [(0, 0), (1, 1), (2, 1), (3, 1), (4, 2), (6, 2), (7, 3), (21, 7), (22, 8)];
    for (verified, required) in expected {
        assert_eq!(consensus_threshold(verified), required, "n = {verified}");
    }
}

#[test]
fn test_tally_is_order_independent() {
    let forward = tally([&HASH_B, &HASH_A]);
    let backward = tally([&HASH_A, &HASH_B]);
    assert_eq!(forward, backward);
    assert_eq!(forward.hash, None);
    assert_eq!(forward.corroborating_node_count, 1);

    let majority = tally([&HASH_B, &HASH_A, &HASH_B]);
    assert_eq!(majority.hash, Some(HASH_B));
    assert_eq!(majority.corroborating_node_count, 2);

    // A later tie at a lower count does not clear the winner.
    let ahead = tally([&HASH_B, &HASH_B, &HASH_A, &METADATA]);
    assert_eq!(ahead.hash, Some(HASH_B));
    assert_eq!(ahead.corroborating_node_count, 2);

    let no_votes: [Hash384; 0] = [];
    assert_eq!(tally(&no_votes).hash, None);
}

#[test]
fn test_two_agree_one_differs_one_fails() {
    let nodes = TestNode::all();
    let mut forged = entry(&nodes[0], &HASH_A);
    forged.node_id = nodes[3].node_id();
    let entries = vec![
        entry(&nodes[0], &HASH_A),
        entry(&nodes[1], &HASH_A),
        entry(&nodes[2], &HASH_B),
        forged,
    ];

    let observer = RecordingObserver::new();
    let outcome = perform_state_proof(&book(&nodes), &entries, &file_hashes(HASH_A), &observer);

    assert!(outcome.valid);
    assert_eq!(outcome.voted_hash, Some(VotedHash::FileHash));
    assert_eq!(outcome.consensus.hash, Some(HASH_A));
    assert_eq!(outcome.consensus.corroborating_node_count, 2);
    assert_eq!(outcome.required_nodes, 1);
    assert_eq!(outcome.verified_nodes, vec!["0.0.3", "0.0.4", "0.0.5"]);
    assert_eq!(outcome.rejected_nodes, vec!["0.0.6"]);

    let events = observer.events();
    assert!(events.iter().any(|e| matches!(
        e,
        ProofEvent::SignatureRejected { node_id, artifact: "file hash", .. } if node_id == "0.0.6"
    )));
    assert!(events.iter().any(|e| matches!(e, ProofEvent::ConsensusReached { corroborating_nodes: 2, .. })));
}

#[test]
fn test_no_hash_clears_threshold() {
    let nodes = TestNode::all();
    let entries: Vec<_> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| entry(node, &[i as u8; 48]))
        .collect();

    let observer = RecordingObserver::new();
    let outcome = perform_state_proof(&book(&nodes), &entries, &file_hashes([0; 48]), &observer);

    assert!(!outcome.valid);
    assert_eq!(outcome.verified_nodes.len(), 4);
    assert_eq!(outcome.required_nodes, 2);
    assert_eq!(outcome.consensus.corroborating_node_count, 1);
    assert!(observer
        .events()
        .contains(&ProofEvent::ConsensusNotReached { best_count: 1, required_nodes: 2 }));
}

#[test]
fn test_split_vote_with_one_failure_is_invalid() {
    const HASH_C: Hash384 = [0x0c; 48];
    let nodes = TestNode::all();

    // Whichever of the split hashes the record file has, there is no winner.
    for record_hash in [HASH_A, HASH_B, HASH_C] {
        let mut forged = entry(&nodes[0], &HASH_A);
        forged.node_id = nodes[3].node_id();
        let entries = vec![
            entry(&nodes[0], &HASH_A),
            entry(&nodes[1], &HASH_B),
            entry(&nodes[2], &HASH_C),
            forged,
        ];

        let observer = RecordingObserver::new();
        let outcome =
            perform_state_proof(&book(&nodes), &entries, &file_hashes(record_hash), &observer);

        assert!(!outcome.valid);
        assert_eq!(outcome.consensus.hash, None);
        assert_eq!(outcome.consensus.corroborating_node_count, 1);
        assert_eq!(outcome.required_nodes, 1);
        assert_eq!(outcome.rejected_nodes, vec!["0.0.6"]);
        assert!(observer
            .events()
            .contains(&ProofEvent::ConsensusNotReached { best_count: 1, required_nodes: 1 }));
    }
}

#[test]
fn test_consensus_disagrees_with_record_file() {
    let nodes = TestNode::all();
    let entries = vec![
        entry(&nodes[0], &HASH_B),
        entry(&nodes[1], &HASH_B),
        entry(&nodes[2], &HASH_B),
        entry(&nodes[3], &HASH_A),
    ];

    let observer = RecordingObserver::new();
    let outcome = perform_state_proof(&book(&nodes), &entries, &file_hashes(HASH_A), &observer);

    assert!(!outcome.valid);
    assert_eq!(outcome.consensus.hash, Some(HASH_B));
    assert!(observer.events().iter().any(|e| matches!(e, ProofEvent::HashMismatch { .. })));
}

#[test]
fn test_all_signatures_fail() {
    let nodes = TestNode::all();
    let entries: Vec<_> = nodes
        .iter()
        .map(|node| {
            let mut forged = entry(&nodes[0], &HASH_A);
            forged.node_id = node.node_id();
            forged.file_hash = HASH_B;
            forged
        })
        .collect();

    let outcome = perform_state_proof(
        &book(&nodes),
        &entries,
        &file_hashes(HASH_B),
        &RecordingObserver::new(),
    );
    assert!(!outcome.valid);
    assert!(outcome.verified_nodes.is_empty());
    assert_eq!(outcome.rejected_nodes.len(), 4);
    assert_eq!(outcome.consensus.hash, None);
}

#[test]
fn test_unknown_node_excluded() {
    let nodes = TestNode::all();
    let mut stranger = entry(&nodes[0], &HASH_A);
    stranger.node_id = "0.0.99".into();
    let entries = vec![entry(&nodes[0], &HASH_A), stranger];

    let observer = RecordingObserver::new();
    let outcome = perform_state_proof(&book(&nodes), &entries, &file_hashes(HASH_A), &observer);

    assert!(outcome.valid);
    assert_eq!(outcome.rejected_nodes, vec!["0.0.99"]);
    assert!(observer
        .events()
        .contains(&ProofEvent::UnknownNode { node_id: "0.0.99".into() }));
}

#[test]
fn test_bad_metadata_signature_drops_node() {
    let nodes = TestNode::all();
    let mut tampered = v5_entry(&nodes[1], &HASH_A, &METADATA);
    tampered.metadata_hash_signature = Some(nodes[1].sign(&HASH_A));
    let entries = vec![v5_entry(&nodes[0], &HASH_A, &METADATA), tampered];

    let observer = RecordingObserver::new();
    let outcome = perform_state_proof(&book(&nodes), &entries, &file_hashes(HASH_A), &observer);

    assert!(outcome.valid);
    assert_eq!(outcome.rejected_nodes, vec!["0.0.4"]);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        ProofEvent::SignatureRejected { artifact: "metadata hash", .. }
    )));
}

#[test]
fn test_metadata_vote_without_file_hash() {
    let nodes = TestNode::all();
    let hashes = RecordFileHashes { file_hash: None, metadata_hash: Some(METADATA) };

    // Nodes signed different file hashes but the same metadata hash.
    let entries = vec![
        v5_entry(&nodes[0], &HASH_A, &METADATA),
        v5_entry(&nodes[1], &HASH_B, &METADATA),
        v5_entry(&nodes[2], &HASH_A, &METADATA),
    ];
    let outcome = perform_state_proof(&book(&nodes), &entries, &hashes, &RecordingObserver::new());
    assert!(outcome.valid);
    assert_eq!(outcome.voted_hash, Some(VotedHash::MetadataHash));
    assert_eq!(outcome.consensus.corroborating_node_count, 3);

    // v2 signature files carry no metadata hash to vote with.
    let entries = vec![entry(&nodes[0], &HASH_A), entry(&nodes[1], &HASH_A)];
    let outcome = perform_state_proof(&book(&nodes), &entries, &hashes, &RecordingObserver::new());
    assert!(!outcome.valid);
    assert_eq!(outcome.rejected_nodes.len(), 2);
}

#[test]
fn test_legacy_address_book_uses_memo() {
    let nodes = TestNode::all();
    let book = AddressBook::from_bytes(&fixtures::legacy_address_book(&nodes)).unwrap();
    assert_eq!(book.len(), 4);

    let entries = vec![entry(&nodes[2], &HASH_A)];
    let outcome = perform_state_proof(&book, &entries, &file_hashes(HASH_A), &RecordingObserver::new());
    assert!(outcome.valid);
    assert_eq!(outcome.verified_nodes, vec!["0.0.5"]);
}
