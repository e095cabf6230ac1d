// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod compact;
pub mod inspect;
pub mod verify;

use anyhow::{Context, Result};
use clap::Args;
use mirror_stateproof::{TransactionId, TransactionKey};

/// Identifies the transaction to prove or compact.
#[derive(Args, Debug, Clone)]
pub struct TransactionArgs {
    /// Transaction id, e.g. 0.0.1001-1700000000-000000010
    #[arg(long, short = 't', env = "STATEPROOF_TRANSACTION_ID")]
    pub transaction_id: String,

    /// Nonce of a child transaction (0 for the parent)
    #[arg(long, default_value_t = 0)]
    pub nonce: i32,

    /// The transaction was executed as a scheduled transaction
    #[arg(long)]
    pub scheduled: bool,
}

impl TransactionArgs {
    pub fn key(&self) -> Result<TransactionKey> {
        let id: TransactionId = self
            .transaction_id
            .parse()
            .with_context(|| format!("Bad --transaction-id {:?}", self.transaction_id))?;
        Ok(TransactionKey::new(id, self.nonce, self.scheduled))
    }
}
