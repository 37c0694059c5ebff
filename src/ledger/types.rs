//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export LedgerConfig from config module to avoid duplication
pub use crate::config::schema::LedgerConfig;

/// 32-byte chain identifier mixed into every transaction digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub [u8; 32]);

impl ChainId {
    /// Parse a chain id from 64 hex characters.
    pub fn from_hex(value: &str) -> LedgerResult<Self> {
        let bytes = hex::decode(value)
            .map_err(|e| LedgerError::Malformed(format!("chain id is not hex: {}", e)))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            LedgerError::Malformed(format!("chain id: expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for ChainId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object, e.g. a rejected transaction.
    #[error("RPC call rejected ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// Chain data could not be interpreted.
    #[error("Malformed chain data: {0}")]
    Malformed(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Subset of the node's dynamic global properties needed to reference the head block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    /// Hex-encoded 20-byte block id.
    pub head_block_id: String,
    /// Head block timestamp as reported by the node.
    #[serde(default)]
    pub time: String,
}

/// Result of a synchronous broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfirmation {
    /// Transaction id.
    pub id: String,
    pub block_num: u32,
    pub trx_num: u32,
    pub expired: bool,
}
