//! Batch outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::LedgerError;

/// How a batch reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// One transaction per item; items fail independently.
    Independent,
    /// One transaction for the whole batch; all or nothing.
    Atomic,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::Independent => "independent",
            BatchMode::Atomic => "atomic",
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent" => Ok(BatchMode::Independent),
            "atomic" => Ok(BatchMode::Atomic),
            other => Err(format!("unknown batch mode '{}' (expected independent or atomic)", other)),
        }
    }
}

/// Where an item dropped out of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Upload,
    Assemble,
    Broadcast,
}

/// An item that was not published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Zero-based position in the input list.
    pub index: usize,
    pub filename: String,
    pub stage: FailureStage,
    pub error: String,
}

/// An item whose post reached the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    pub index: usize,
    pub author: String,
    pub permlink: String,
    pub url: String,
    pub trx_id: String,
    pub block_num: u32,
}

impl PublishedPost {
    /// `@author/permlink`
    pub fn reference(&self) -> String {
        format!("@{}/{}", self.author, self.permlink)
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub mode: BatchMode,
    pub total: usize,
    pub published: Vec<PublishedPost>,
    pub failed: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn new(batch_id: Uuid, mode: BatchMode, total: usize) -> Self {
        Self {
            batch_id,
            mode,
            total,
            published: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.published.len() == self.total
    }
}

/// Batch-level failures.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The single batch transaction could not be built, signed or broadcast.
    #[error("batch {batch_id} lost: {orphaned} uploaded documents were not published: {source}")]
    BatchLost {
        batch_id: Uuid,
        orphaned: usize,
        failed: Vec<ItemFailure>,
        #[source]
        source: LedgerError,
    },
}
