//! Shared utilities for integration testing.
//!
//! Each mock binds an ephemeral port on 127.0.0.1 and records what it
//! received so tests can assert on the wire traffic.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use oam_publisher::config::PublisherConfig;
use oam_publisher::ledger::Wallet;
use oam_publisher::post::PublishItem;

/// Well-known test key. Never used outside tests.
pub const TEST_WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";

pub const HEAD_BLOCK_NUMBER: u32 = 0x0123_4567;
pub const HEAD_BLOCK_ID: &str = "01234567a1b2c3d4e5f60718293a4b5c6d7e8f90";

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_WIF, "STM").unwrap()
}

/// Config pointing at the given mocks; unused endpoints keep their defaults.
pub fn test_config(hoster: Option<SocketAddr>, rpc: Option<SocketAddr>) -> PublisherConfig {
    let mut config = PublisherConfig::default();
    if let Some(addr) = hoster {
        config.hoster.base_url = format!("http://{}/", addr);
        config.hoster.timeout_secs = 5;
    }
    if let Some(addr) = rpc {
        config.ledger.rpc_url = format!("http://{}", addr);
        config.ledger.rpc_timeout_secs = 5;
    }
    config
}

/// Write `names` into `dir` and build one item per file.
pub fn write_items(dir: &std::path::Path, names: &[&str]) -> Vec<PublishItem> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let path = dir.join(name);
            std::fs::write(&path, format!("%PDF-1.4 document {}", i)).unwrap();
            PublishItem {
                filename: path.display().to_string(),
                title: format!("Annual Financial Report {}", 2018 + i),
                issuer_name: "ACME SA".into(),
                home_member_state: "LU".into(),
                identifier_value: "5299001XJ3Q2B6OXUL42".into(),
                subclass_tag: "annual-financial-report".into(),
                ..PublishItem::default()
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hoster

/// One upload received by the mock hoster.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub account: String,
    pub signature: String,
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct HosterState {
    pub uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    /// File names answered with HTTP 500.
    pub failing: Arc<Vec<String>>,
}

async fn hoster_upload(
    State(state): State<HosterState>,
    Path((account, signature)): Path<(String, String)>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();

        if state.failing.contains(&file_name) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "storage full" })),
            );
        }

        state.uploads.lock().unwrap().push(ReceivedUpload {
            account: account.clone(),
            signature: signature.clone(),
            field: name,
            file_name: file_name.clone(),
            data,
        });

        return (
            StatusCode::OK,
            Json(json!({ "url": format!("https://images.example/{}/{}", account, file_name) })),
        );
    }

    (StatusCode::BAD_REQUEST, Json(json!({ "error": "no file" })))
}

/// Start a mock image hoster. Uploads of files named in `failing` get HTTP 500.
pub async fn start_mock_hoster(failing: &[&str]) -> (SocketAddr, HosterState) {
    let state = HosterState {
        uploads: Arc::default(),
        failing: Arc::new(failing.iter().map(|s| s.to_string()).collect()),
    };
    let app = Router::new()
        .route("/{account}/{signature}", post(hoster_upload))
        .with_state(state.clone());
    (serve(app).await, state)
}

// ---------------------------------------------------------------------------
// RPC node

#[derive(Clone, Default)]
pub struct NodeState {
    /// Every transaction passed to `broadcast_transaction_synchronous`.
    pub broadcasts: Arc<Mutex<Vec<Value>>>,
    /// Reject broadcasts whose n-th call (zero-based) is listed.
    pub reject_calls: Arc<Vec<usize>>,
}

async fn node_rpc(State(state): State<NodeState>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();

    match method {
        "condenser_api.get_dynamic_global_properties" => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "head_block_number": HEAD_BLOCK_NUMBER,
                "head_block_id": HEAD_BLOCK_ID,
                "time": "2026-10-18T12:00:00"
            }
        })),
        "condenser_api.broadcast_transaction_synchronous" => {
            let mut broadcasts = state.broadcasts.lock().unwrap();
            let call = broadcasts.len();
            broadcasts.push(request["params"][0].clone());

            if state.reject_calls.contains(&call) {
                return Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32000, "message": "missing required posting authority" }
                }));
            }

            Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "id": format!("{:040x}", call + 1),
                    "block_num": HEAD_BLOCK_NUMBER + 1 + call as u32,
                    "trx_num": 0,
                    "expired": false
                }
            }))
        }
        other => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("unknown method {}", other) }
        })),
    }
}

/// Start a mock ledger node answering the two methods the publisher uses.
pub async fn start_mock_node(reject_calls: &[usize]) -> (SocketAddr, NodeState) {
    let state = NodeState {
        broadcasts: Arc::default(),
        reject_calls: Arc::new(reject_calls.to_vec()),
    };
    let app = Router::new()
        .route("/", post(node_rpc))
        .with_state(state.clone());
    (serve(app).await, state)
}

// ---------------------------------------------------------------------------
// CDN

/// Start a static file server. Paths not in `files` get 404.
pub async fn start_mock_cdn(files: HashMap<&'static str, &'static str>) -> SocketAddr {
    let files = Arc::new(files);
    let app = Router::new().fallback(move |uri: Uri| {
        let files = files.clone();
        async move {
            match files.get(uri.path().trim_start_matches('/')) {
                Some(body) => (StatusCode::OK, body.to_string()),
                None => (StatusCode::NOT_FOUND, "not found".to_string()),
            }
        }
    });
    serve(app).await
}
