// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Node address books: which public key speaks for which consensus node.

use std::collections::BTreeMap;

use prost::Message;
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;

use crate::error::{ProofError, Result};
use crate::proto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookEntry {
    /// `shard.realm.num` of the node account.
    pub node_id: String,
    /// Hex of the DER-encoded SubjectPublicKeyInfo.
    pub public_key_hex: String,
}

impl AddressBookEntry {
    /// Decodes the RSA key. Equivalent to wrapping the DER in a
    /// `-----BEGIN PUBLIC KEY-----` block and parsing that.
    pub fn public_key(&self) -> std::result::Result<RsaPublicKey, String> {
        let der = hex::decode(self.public_key_hex.trim()).map_err(|e| e.to_string())?;
        RsaPublicKey::from_public_key_der(&der).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    entries: BTreeMap<String, AddressBookEntry>,
}

impl AddressBook {
    /// Decodes a `NodeAddressBook` protobuf.
    ///
    /// A node is identified by its node account id; legacy books that only
    /// filled in the memo fall back to the memo text.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let book = proto::NodeAddressBook::decode(bytes).map_err(ProofError::decode("address book"))?;

        let mut entries = BTreeMap::new();
        for (i, address) in book.node_address.into_iter().enumerate() {
            let node_id = match address.node_account_id {
                Some(account) => format!(
                    "{}.{}.{}",
                    account.shard_num, account.realm_num, account.account_num
                ),
                None => String::from_utf8(address.memo)
                    .map_err(|e| ProofError::malformed("address book memo", i, "utf-8 node id", e))?
                    .trim()
                    .to_string(),
            };

            entries.insert(
                node_id.clone(),
                AddressBookEntry {
                    node_id,
                    public_key_hex: address.rsa_pub_key,
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, node_id: &str) -> Option<&AddressBookEntry> {
        self.entries.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddressBookEntry> {
        self.entries.values()
    }
}

/// Parses every book, oldest first, and returns the newest one.
pub fn latest(address_books: &[Vec<u8>]) -> Result<AddressBook> {
    let mut latest = None;
    for bytes in address_books {
        latest = Some(AddressBook::from_bytes(bytes)?);
    }
    latest.ok_or(ProofError::MissingAddressBook)
}
