//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the publisher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the publisher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PublisherConfig {
    /// Ledger RPC and transaction settings.
    pub ledger: LedgerConfig,

    /// File hosting endpoint.
    pub hoster: HosterConfig,

    /// Reference dictionary CDN.
    pub dictionary: DictionaryConfig,

    /// Application identity stamped into published metadata.
    pub app: AppConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs (read calls only).
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID as 64 hex characters, mixed into every transaction digest.
    pub chain_id: String,

    /// Prefix of textual public keys (e.g. "STM").
    pub address_prefix: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Transaction validity window in seconds.
    pub expiration_secs: u64,

    /// Category every post is filed under (`parent_permlink`).
    pub parent_permlink: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8090".to_string(),
            failover_urls: Vec::new(),
            chain_id: "0".repeat(64),
            address_prefix: "STM".to_string(),
            rpc_timeout_secs: 10,
            // 59m50s, just inside the ledger's one hour maximum
            expiration_secs: 3590,
            parent_permlink: "oam".to_string(),
        }
    }
}

/// File hoster configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HosterConfig {
    /// Base URL; uploads go to `{base_url}/{account}/{signature}`.
    pub base_url: String,

    /// Upload request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HosterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8800".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Reference dictionary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// CDN base URL.
    pub base_url: String,

    /// Resource path of the home member state list.
    pub home_member_states: String,

    /// Resource path of the language list.
    pub languages: String,

    /// Resource path of the identifier map.
    pub identifiers: String,

    /// Resource path of the class/subclass tree.
    pub class_tree: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.blkcc.xyz".to_string(),
            home_member_states: "home_member_states.json".to_string(),
            languages: "lang.json".to_string(),
            identifiers: "identifier.json".to_string(),
            class_tree: "class_subclass_tree.json".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version tag written to the `app` field of post metadata.
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: concat!("oam-publisher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PublisherConfig = toml::from_str(
            r#"
            [ledger]
            rpc_url = "https://rpc.example.org"

            [app]
            version = "eftg-send/0.3"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.rpc_url, "https://rpc.example.org");
        assert_eq!(config.ledger.expiration_secs, 3590);
        assert_eq!(config.ledger.parent_permlink, "oam");
        assert_eq!(config.app.version, "eftg-send/0.3");
        assert_eq!(config.dictionary.languages, "lang.json");
    }

    #[test]
    fn test_default_chain_id_is_zeroed() {
        let config = LedgerConfig::default();
        assert_eq!(config.chain_id.len(), 64);
        assert!(config.chain_id.chars().all(|c| c == '0'));
    }
}
