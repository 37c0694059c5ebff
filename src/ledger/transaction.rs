//! Transaction building and signing.
//!
//! # Responsibilities
//! - Reference the current head block (TaPoS fields)
//! - Fix the expiration at construction time
//! - Sign the serialized transaction under the configured chain id

use chrono::{DateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use crate::ledger::client::Ledger;
use crate::ledger::serializer::LedgerEncode;
use crate::ledger::types::{ChainId, DynamicGlobalProperties, LedgerError, LedgerResult};
use crate::ledger::wallet::Wallet;
use crate::post::Post;

/// Wire format of `expiration`.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Comment(Post),
}

impl Operation {
    /// Operation name used in JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Comment(_) => "comment",
        }
    }

    /// Operation id used in the binary encoding.
    pub fn id(&self) -> u64 {
        match self {
            Operation::Comment(_) => 1,
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(self.name())?;
        match self {
            Operation::Comment(post) => tuple.serialize_element(post)?,
        }
        tuple.end()
    }
}

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    #[serde(serialize_with = "serialize_expiration")]
    pub expiration: DateTime<Utc>,
    pub operations: Vec<Operation>,
    pub extensions: Vec<serde_json::Value>,
}

fn serialize_expiration<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(EXPIRATION_FORMAT))
}

impl Transaction {
    /// Create an empty transaction referencing `head`, expiring `ttl` after `now`.
    pub fn new(head: &DynamicGlobalProperties, now: DateTime<Utc>, ttl: Duration) -> LedgerResult<Self> {
        let block_id = hex::decode(&head.head_block_id)
            .map_err(|e| LedgerError::Malformed(format!("head block id is not hex: {}", e)))?;
        let prefix_bytes: [u8; 4] = block_id
            .get(4..8)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                LedgerError::Malformed(format!("head block id too short: {} bytes", block_id.len()))
            })?;

        let expires_at = now.timestamp() + ttl.as_secs() as i64;
        let expiration = DateTime::<Utc>::from_timestamp(expires_at, 0)
            .ok_or_else(|| LedgerError::Malformed(format!("expiration {} out of range", expires_at)))?;

        Ok(Self {
            // the ledger keeps only the low 16 bits
            ref_block_num: (head.head_block_number & 0xffff) as u16,
            ref_block_prefix: u32::from_le_bytes(prefix_bytes),
            expiration,
            operations: Vec::new(),
            extensions: Vec::new(),
        })
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Expiration as seconds since the epoch.
    pub fn expiration_secs(&self) -> u32 {
        self.expiration.timestamp() as u32
    }

    /// Transaction id: first 20 bytes of SHA-256 over the encoding, hex.
    pub fn id(&self) -> String {
        let hash = Sha256::digest(self.to_bytes());
        hex::encode(&hash[..20])
    }

    /// Digest signed by the wallet.
    pub fn digest(&self, chain_id: &ChainId) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(chain_id.as_bytes());
        hasher.update(self.to_bytes());
        hasher.finalize().into()
    }

    pub fn sign(self, wallet: &Wallet, chain_id: &ChainId) -> LedgerResult<SignedTransaction> {
        let signature = wallet.sign_digest(&self.digest(chain_id))?;
        Ok(SignedTransaction {
            transaction: self,
            signatures: vec![signature.to_hex()],
        })
    }
}

/// A transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub signatures: Vec<String>,
}

impl SignedTransaction {
    pub fn id(&self) -> String {
        self.transaction.id()
    }
}

/// Transaction builder bound to a ledger.
#[derive(Clone)]
pub struct TxBuilder {
    ledger: Arc<dyn Ledger>,
    ttl: Duration,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(ledger: Arc<dyn Ledger>, ttl: Duration) -> Self {
        Self { ledger, ttl }
    }

    /// Query the chain head and return an empty transaction referencing it.
    pub async fn new_transaction(&self) -> LedgerResult<Transaction> {
        let head = self.ledger.dynamic_global_properties().await?;
        let tx = Transaction::new(&head, Utc::now(), self.ttl)?;

        tracing::debug!(
            head_block = head.head_block_number,
            ref_block_num = tx.ref_block_num,
            ref_block_prefix = tx.ref_block_prefix,
            expiration = %tx.expiration.format(EXPIRATION_FORMAT),
            "Transaction shell created"
        );

        Ok(tx)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
