//! Ledger JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints
//! - Query chain state (dynamic global properties)
//! - Broadcast signed transactions
//! - Handle timeouts and network errors gracefully

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::ledger::transaction::SignedTransaction;
use crate::ledger::types::{
    BroadcastConfirmation, DynamicGlobalProperties, LedgerConfig, LedgerError, LedgerResult,
};

/// The ledger operations the publisher depends on.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current head block reference data.
    async fn dynamic_global_properties(&self) -> LedgerResult<DynamicGlobalProperties>;

    /// Broadcast a signed transaction and wait for its inclusion.
    async fn broadcast(&self, tx: &SignedTransaction) -> LedgerResult<BroadcastConfirmation>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC ledger client with failover for read calls.
pub struct RpcLedger {
    /// Primary endpoint followed by failovers.
    endpoints: Vec<Url>,
    http: reqwest::Client,
    config: LedgerConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
    next_id: AtomicU64,
}

impl RpcLedger {
    /// Create a new ledger client.
    ///
    /// No request is made until the first call.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut endpoints = Vec::new();

        // 1. Add primary endpoint
        let primary: Url = config.rpc_url.parse().map_err(|e| {
            LedgerError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        endpoints.push(primary);

        // 2. Add failover endpoints
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                endpoints.push(url);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("oam-publisher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LedgerError::Rpc(format!("HTTP client setup failed: {}", e)))?;

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = endpoints.len() - 1,
            "Ledger client initialized"
        );

        Ok(Self {
            endpoints,
            http,
            config,
            timeout_duration,
            next_id: AtomicU64::new(1),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Call `method` on one endpoint.
    async fn call_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        method: &str,
        params: serde_json::Value,
    ) -> LedgerResult<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let exchange = async {
            let response = self
                .http
                .post(endpoint.clone())
                .json(&request)
                .send()
                .await
                .map_err(|e| LedgerError::Rpc(format!("{} request failed: {}", method, e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(LedgerError::Rpc(format!("{} returned HTTP {}", method, status)));
            }

            response
                .json::<RpcResponse<T>>()
                .await
                .map_err(|e| LedgerError::Rpc(format!("{} returned an invalid body: {}", method, e)))
        };

        let body = match timeout(self.timeout_duration, exchange).await {
            Ok(result) => result?,
            Err(_) => return Err(LedgerError::Timeout(self.config.rpc_timeout_secs)),
        };

        if let Some(error) = body.error {
            return Err(LedgerError::Rejected {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| LedgerError::Malformed(format!("{} returned neither result nor error", method)))
    }

    /// Call a read-only method, trying each endpoint in turn on transport failures.
    async fn call_with_failover<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> LedgerResult<T> {
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match self.call_endpoint(endpoint, method, params.clone()).await {
                Ok(result) => return Ok(result),
                Err(e @ (LedgerError::Rpc(_) | LedgerError::Timeout(_))) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(e) => return Err(e),
            }
        }
        Err(LedgerError::Rpc(format!("All RPC providers failed for {}", method)))
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn dynamic_global_properties(&self) -> LedgerResult<DynamicGlobalProperties> {
        self.call_with_failover("condenser_api.get_dynamic_global_properties", serde_json::json!([]))
            .await
    }

    /// Broadcasts go to the primary endpoint only.
    async fn broadcast(&self, tx: &SignedTransaction) -> LedgerResult<BroadcastConfirmation> {
        let params = serde_json::json!([tx]);
        let confirmation: BroadcastConfirmation = self
            .call_endpoint(
                &self.endpoints[0],
                "condenser_api.broadcast_transaction_synchronous",
                params,
            )
            .await?;

        tracing::info!(
            trx_id = %confirmation.id,
            block_num = confirmation.block_num,
            "Transaction broadcast"
        );
        Ok(confirmation)
    }
}

impl std::fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedger")
            .field("rpc_url", &self.config.rpc_url)
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
