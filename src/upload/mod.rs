//! File upload to the image hoster.
//!
//! # Data Flow
//! ```text
//! file on disk
//!     → read fully into memory
//!     → SHA-256("ImageSigningChallenge" || bytes)
//!     → wallet signature (hex)
//!     → POST {hoster}/{account}/{signature}, multipart field `file`
//!     → retrieval URL from the JSON response
//! ```
//!
//! # Design Decisions
//! - No retry; every failure goes back to the caller
//! - The uploader is a trait so batches can run against test doubles

pub mod hoster;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

use crate::ledger::{LedgerError, Wallet};

pub use hoster::HttpUploader;

/// Domain separator prepended to file bytes before hashing.
pub const SIGNING_CHALLENGE: &[u8] = b"ImageSigningChallenge";

/// Errors raised while uploading a file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("signing failed: {0}")]
    Signing(#[from] LedgerError),

    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("hoster returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("hoster response has no url: {0}")]
    BadResponse(String),
}

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Something that stores a file and hands back its retrieval URL.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, path: &Path, account: &str, wallet: &Wallet) -> UploadResult<String>;
}

/// Domain-separated hash of file contents.
pub fn image_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SIGNING_CHALLENGE);
    hasher.update(data);
    hasher.finalize().into()
}
