use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};
use wp_chain_client::{Eip1193Provider, ProviderError};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// JSON-RPC 2.0 over HTTP, for talking to a node directly instead of through
/// an injected wallet.
///
/// Reads `WAVEPORTAL_RPC_URL` from environment at construction time
/// (default: `http://localhost:8545`). A node has no interactive
/// authorization step, so `eth_requestAccounts` is served by `eth_accounts`.
pub struct HttpProvider {
    endpoint: reqwest::Url,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        let endpoint = endpoint
            .or_else(|| std::env::var("WAVEPORTAL_RPC_URL").ok())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let endpoint = reqwest::Url::parse(endpoint.trim())
            .with_context(|| format!("invalid JSON-RPC endpoint '{endpoint}'"))?;

        Ok(Self {
            endpoint,
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(None)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

// ── JSON-RPC envelope ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

fn node_method(method: &str) -> &str {
    match method {
        "eth_requestAccounts" => "eth_accounts",
        other => other,
    }
}

fn parse_envelope(body: Value) -> Result<Value, ProviderError> {
    let response: RpcResponse = serde_json::from_value(body)
        .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;

    match (response.error, response.result) {
        (Some(err), _) => Err(ProviderError::from_rpc(err.code, err.message)),
        // A `null` result deserializes as `None`; it is a legitimate answer
        // (e.g. an unmined receipt).
        (None, result) => Ok(result.unwrap_or(Value::Null)),
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let method = node_method(method);
        debug!(id, method, "json-rpc request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(id, method, %status, "json-rpc HTTP failure");
            return Err(ProviderError::Transport(format!("HTTP {status}: {text}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;
        parse_envelope(body)
    }
}
