//! Key management and digest signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit arguments
//! - Keys are never logged or serialized
//! - `Debug` prints the public key only

use k256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use ripemd::{Digest, Ripemd160};
use std::fmt;

use crate::ledger::types::{LedgerError, LedgerResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "OAM_PRIVATE_KEY";

/// Version byte of WIF-encoded private keys.
const WIF_VERSION: u8 = 0x80;

/// Attempts at finding a canonical signature before giving up.
const MAX_SIGNING_ATTEMPTS: usize = 64;

/// Signing key for one ledger account.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    /// Textual public key, e.g. `STM6...`.
    public_key: String,
}

impl Wallet {
    /// Create a wallet from a WIF string or a 64-character hex secret.
    ///
    /// # Security
    /// The private key is parsed and stored in memory. It is never logged.
    pub fn from_private_key(private_key: &str, address_prefix: &str) -> LedgerResult<Self> {
        let private_key = private_key.trim();
        let secret = if private_key.len() == 64 && private_key.chars().all(|c| c.is_ascii_hexdigit()) {
            hex::decode(private_key)
                .map_err(|e| LedgerError::Wallet(format!("Invalid private key format: {}", e)))?
        } else {
            decode_wif(private_key)?.to_vec()
        };

        let signing_key = SigningKey::from_slice(&secret)
            .map_err(|e| LedgerError::Wallet(format!("Invalid private key format: {}", e)))?;
        let public_key = public_key_string(signing_key.verifying_key(), address_prefix);

        tracing::info!(public_key = %public_key, "Wallet initialized");

        Ok(Self {
            signing_key,
            public_key,
        })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `OAM_PRIVATE_KEY` from environment.
    pub fn from_env(address_prefix: &str) -> LedgerResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            LedgerError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, address_prefix)
    }

    /// Textual public key of this wallet.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign a 32-byte digest, retrying with fresh nonces until the result is canonical.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> LedgerResult<CompactSignature> {
        for _ in 0..MAX_SIGNING_ATTEMPTS {
            let signature: Signature = self
                .signing_key
                .sign_prehash_with_rng(&mut OsRng, digest)
                .map_err(|e| LedgerError::Wallet(format!("Signing failed: {}", e)))?;
            let signature = signature.normalize_s().unwrap_or(signature);

            let rs = signature.to_bytes();
            if !is_canonical(&rs) {
                continue;
            }

            let recovery_id = RecoveryId::trial_recovery_from_prehash(self.verifying_key(), digest, &signature)
                .map_err(|e| LedgerError::Wallet(format!("Recovery id not found: {}", e)))?;

            let mut bytes = [0u8; 65];
            bytes[0] = recovery_id.to_byte() + 31;
            bytes[1..].copy_from_slice(&rs);
            return Ok(CompactSignature(bytes));
        }

        Err(LedgerError::Wallet(format!(
            "No canonical signature after {} attempts",
            MAX_SIGNING_ATTEMPTS
        )))
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// 65-byte recoverable signature: `[recovery id + 31, r, s]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature(pub [u8; 65]);

impl CompactSignature {
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Recover the public key that produced this signature over `digest`.
    pub fn recover(&self, digest: &[u8; 32]) -> LedgerResult<VerifyingKey> {
        let recovery_id = self.0[0]
            .checked_sub(31)
            .and_then(RecoveryId::from_byte)
            .ok_or_else(|| LedgerError::Wallet(format!("Bad recovery byte {}", self.0[0])))?;
        let signature = Signature::from_slice(&self.0[1..])
            .map_err(|e| LedgerError::Wallet(format!("Bad signature: {}", e)))?;
        VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|e| LedgerError::Wallet(format!("Recovery failed: {}", e)))
    }
}

impl fmt::Display for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature({})", self.to_hex())
    }
}

/// Nodes only accept signatures whose `r` and `s` are both minimally encoded and positive.
pub fn is_canonical(rs: &[u8]) -> bool {
    rs.len() == 64
        && rs[0] & 0x80 == 0
        && !(rs[0] == 0 && rs[1] & 0x80 == 0)
        && rs[32] & 0x80 == 0
        && !(rs[32] == 0 && rs[33] & 0x80 == 0)
}

/// Encode a public key as `{prefix}{base58(key || ripemd160(key)[..4])}`.
pub fn public_key_string(key: &VerifyingKey, prefix: &str) -> String {
    let point = key.to_encoded_point(true);
    let compressed = point.as_bytes();
    let checksum = Ripemd160::digest(compressed);

    let mut payload = compressed.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    format!("{}{}", prefix, bs58::encode(payload).into_string())
}

/// Decode a WIF private key into its 32-byte secret.
pub fn decode_wif(wif: &str) -> LedgerResult<[u8; 32]> {
    let decoded = bs58::decode(wif)
        .with_check(Some(WIF_VERSION))
        .into_vec()
        .map_err(|e| LedgerError::Wallet(format!("Invalid private key format: {}", e)))?;

    // version byte, 32-byte secret, optional compression flag
    match decoded.len() {
        33 => {}
        34 if decoded[33] == 0x01 => {}
        n => {
            return Err(LedgerError::Wallet(format!(
                "Invalid private key format: unexpected WIF payload of {} bytes",
                n
            )))
        }
    }

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&decoded[1..33]);
    Ok(secret)
}

/// Encode a 32-byte secret as WIF.
pub fn encode_wif(secret: &[u8; 32]) -> String {
    bs58::encode(secret)
        .with_check_version(WIF_VERSION)
        .into_string()
}
