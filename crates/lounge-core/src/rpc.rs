//! ============================================================================
//! JSON-RPC Client - shared transport for wallet and chain node adapters
//! ============================================================================
//! Minimal JSON-RPC 2.0 over HTTP POST. Error objects are kept intact so
//! callers can map provider codes (e.g. EIP-1193 `4001` user rejection).
//! ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Upper bound on any single HTTP exchange with a provider, node or the site
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// EIP-1193: user rejected the request
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-1193: provider is disconnected from all chains
pub const DISCONNECTED_CODE: i64 = 4900;

/// JSON-RPC failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to decode RPC response: {0}")]
    Decode(String),
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one endpoint
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// HTTP client whose requests give up after `timeout`
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` and decode the `result` member into `T`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let request = self.request(method, params);
        debug!("JSON-RPC {} -> {} (id {})", method, self.url, request.id);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Status(response.status().as_u16()));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Transport(e.to_string())
                } else {
                    RpcError::Decode(e.to_string())
                }
            })?;

        decode_response(body)
    }

    fn request<'a>(&self, method: &'a str, params: serde_json::Value) -> RpcRequest<'a> {
        RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        }
    }
}

fn decode_response<T: DeserializeOwned>(body: RpcResponse) -> Result<T, RpcError> {
    if let Some(err) = body.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let result = body
        .result
        .ok_or_else(|| RpcError::Decode("response has neither result nor error".into()))?;

    serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> RpcResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_decode_result() {
        let body = parse(serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": "0x89" }));
        let chain: String = decode_response(body).unwrap();
        assert_eq!(chain, "0x89");
    }

    #[test]
    fn test_decode_error_object() {
        let body = parse(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 4001, "message": "User rejected the request." }
        }));
        let err = decode_response::<String>(body).unwrap_err();
        assert_eq!(
            err,
            RpcError::Rpc {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".into()
            }
        );
    }

    #[test]
    fn test_decode_missing_result() {
        let body = parse(serde_json::json!({ "jsonrpc": "2.0", "id": 1 }));
        assert!(matches!(decode_response::<String>(body), Err(RpcError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_type() {
        let body = parse(serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": 5 }));
        assert!(matches!(decode_response::<Vec<String>>(body), Err(RpcError::Decode(_))));
    }

    #[test]
    fn test_request_envelope() {
        let client = JsonRpcClient::new("http://localhost:8545");

        let first = serde_json::to_value(client.request("eth_chainId", serde_json::json!([])))
            .unwrap();
        assert_eq!(
            first,
            serde_json::json!({ "jsonrpc": "2.0", "id": 1, "method": "eth_chainId", "params": [] })
        );

        let second = client.request("eth_requestAccounts", serde_json::json!([]));
        assert_eq!(second.id, 2);
        assert_eq!(client.url(), "http://localhost:8545");
    }

    #[tokio::test]
    async fn test_closed_port_is_transport_error() {
        let client = JsonRpcClient::new(crate::test_net::closed_port_url());
        let err = client
            .call::<String>("eth_chainId", serde_json::json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        let (_listener, url) = crate::test_net::silent_endpoint();
        let client = JsonRpcClient::with_timeout(url, crate::test_net::SHORT_TIMEOUT);

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            client.call::<String>("eth_chainId", serde_json::json!([])),
        )
        .await
        .expect("call should give up on its own");
        assert!(matches!(result, Err(RpcError::Transport(_))));
    }
}
