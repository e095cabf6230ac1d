// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transaction identity and the success index built from transaction records.

use std::fmt;
use std::str::FromStr;

use prost::Message;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::SUCCESSFUL_STATUSES;
use crate::error::{ProofError, Result};
use crate::proto;

/// `shard.realm.num-seconds-nanos`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId {
    pub shard: i64,
    pub realm: i64,
    pub num: i64,
    pub valid_start_seconds: i64,
    pub valid_start_nanos: i32,
}

impl TransactionId {
    pub fn new(shard: i64, realm: i64, num: i64, seconds: i64, nanos: i32) -> Self {
        Self {
            shard,
            realm,
            num,
            valid_start_seconds: seconds,
            valid_start_nanos: nanos,
        }
    }

    pub fn from_proto(id: &proto::TransactionId) -> Self {
        let account = id.account_id.unwrap_or_default();
        let start = id.transaction_valid_start.unwrap_or_default();
        Self::new(
            account.shard_num,
            account.realm_num,
            account.account_num,
            start.seconds,
            start.nanos,
        )
    }

    pub fn payer(&self) -> String {
        format!("{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}-{:09}",
            self.shard, self.realm, self.num, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ProofError::InvalidTransactionId(s.to_string());

        let mut parts = s.trim().splitn(3, '-');
        let (account, seconds, nanos) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(s), Some(n)) => (a, s, n),
            _ => return Err(invalid()),
        };

        let account: Vec<i64> = account
            .split('.')
            .map(|p| p.parse::<i64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| invalid())?;
        if account.len() != 3 {
            return Err(invalid());
        }

        let seconds = seconds.parse::<i64>().map_err(|_| invalid())?;
        let nanos = nanos.parse::<i32>().map_err(|_| invalid())?;
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(invalid());
        }

        Ok(Self::new(account[0], account[1], account[2], seconds, nanos))
    }
}

/// Lookup key into a record file's success index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionKey {
    pub transaction_id: TransactionId,
    pub nonce: i32,
    pub scheduled: bool,
}

impl TransactionKey {
    pub fn new(transaction_id: TransactionId, nonce: i32, scheduled: bool) -> Self {
        Self { transaction_id, nonce, scheduled }
    }

    pub fn from_proto(id: &proto::TransactionId) -> Self {
        Self::new(TransactionId::from_proto(id), id.nonce, id.scheduled)
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transaction_id)?;
        if self.nonce != 0 {
            write!(f, " nonce={}", self.nonce)?;
        }
        if self.scheduled {
            write!(f, " scheduled")?;
        }
        Ok(())
    }
}

pub fn is_successful(status: i32) -> bool {
    SUCCESSFUL_STATUSES.contains(&status)
}

/// Transactions that succeeded, keyed to their position in the file when the
/// format supports positional lookup.
pub type SuccessIndex = FxHashMap<TransactionKey, Option<usize>>;

/// Decodes a transaction record and returns its key if the receipt is
/// successful. Records without a transaction id are skipped.
pub fn successful_transaction(record_bytes: &[u8]) -> Result<Option<TransactionKey>> {
    let record = proto::TransactionRecord::decode(record_bytes)
        .map_err(ProofError::decode("transaction record"))?;

    let status = record.receipt.as_ref().map(|r| r.status).unwrap_or_default();
    if !is_successful(status) {
        return Ok(None);
    }

    Ok(record.transaction_id.as_ref().map(TransactionKey::from_proto))
}
