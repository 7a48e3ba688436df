//! Minimal JSON-RPC 2.0 client for the daemon

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Error code the daemon uses for bad credentials
pub const UNAUTHORIZED: i32 = 4004;

#[derive(Debug)]
pub struct RpcFailure {
    pub code: i32,
    pub message: String,
}

impl std::fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC error ({}): {}", self.code, self.message)
    }
}

impl std::error::Error for RpcFailure {}

pub struct RpcClient {
    url: String,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to daemon")?
            .json()
            .await
            .context("Failed to parse response")?;

        into_result(response)
    }
}

fn into_result(response: JsonRpcResponse) -> Result<serde_json::Value> {
    if let Some(error) = response.error {
        return Err(RpcFailure {
            code: error.code,
            message: error.message,
        }
        .into());
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> Result<serde_json::Value> {
        into_result(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn test_result_is_returned() {
        let value = parse(json!({"jsonrpc": "2.0", "id": 1, "result": {"queue": "Test"}})).unwrap();
        assert_eq!(value["queue"], "Test");
    }

    #[test]
    fn test_error_keeps_code() {
        let err = parse(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4004, "message": "Invalid password for queue Test"}
        }))
        .unwrap_err();

        let failure = err.downcast_ref::<RpcFailure>().unwrap();
        assert_eq!(failure.code, UNAUTHORIZED);
        assert!(err.to_string().contains("Invalid password"));
    }
}
