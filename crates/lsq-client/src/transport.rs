//! Single-endpoint RPC transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use lsq_core::error::{LsqError, RpcError};

use crate::config::ClientConfig;

/// Issues one remote procedure call against Logseq.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    args: &'a [Value],
}

/// `reqwest`-backed transport for Logseq's HTTP API server.
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    token: SecretString,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`LsqError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, LsqError> {
        let endpoint = config.endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LsqError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            token: config.api_token,
            timeout: config.timeout,
        })
    }

    async fn send(&self, method: &str, args: &[Value]) -> Result<Value, RpcError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.token.expose_secret())
            .json(&RpcRequest { method, args })
            .send()
            .await
            .map_err(|e| self.classify(method, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify(method, e))?;

        if !status.is_success() {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("no body").to_string(),
                text => text.to_string(),
            };
            return Err(RpcError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        decode_reply(method, &body)
    }

    fn classify(&self, method: &str, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            RpcError::Timeout {
                method: method.to_string(),
                after: self.timeout,
            }
        } else {
            RpcError::Transport {
                method: method.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        tracing::debug!(method, args = args.len(), "calling Logseq");

        let result = self.send(method, &args).await;
        if let Err(e) = &result {
            tracing::warn!(method, error = %e, "Logseq call failed");
        }
        result
    }
}

/// Decode a 2xx reply body.
///
/// An empty body is JSON `null`; a bare `{"error": "..."}` object is a
/// remote failure even though the status was 2xx.
pub fn decode_reply(method: &str, body: &str) -> Result<Value, RpcError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| RpcError::Decode {
        method: method.to_string(),
        message: e.to_string(),
    })?;

    if let Value::Object(map) = &value {
        if map.len() == 1 {
            if let Some(Value::String(message)) = map.get("error") {
                return Err(RpcError::Remote {
                    method: method.to_string(),
                    message: message.clone(),
                });
            }
        }
    }

    Ok(value)
}
