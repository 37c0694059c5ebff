//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading, digest signing)
//!     → client.rs (JSON-RPC with timeouts and read failover)
//!     → transaction.rs (reference head block, sign)
//!     → serializer.rs (binary encoding that gets signed)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod serializer;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{Ledger, RpcLedger};
pub use transaction::{Operation, SignedTransaction, Transaction, TxBuilder};
pub use types::{BroadcastConfirmation, ChainId, DynamicGlobalProperties, LedgerConfig, LedgerError, LedgerResult};
pub use wallet::{CompactSignature, Wallet};
