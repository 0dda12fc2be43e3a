//! JSON-RPC transport over HTTP

use super::RequestOutcome;
use crate::config::{Provider, ProviderAuth};
use crate::error::{Result, RpcError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Capability to invoke one JSON-RPC method against one provider
///
/// Implementations never fail as a whole: every failure mode is reported
/// inside the returned outcome.
#[async_trait]
pub trait MethodCaller: Send + Sync {
    async fn call_method(
        &self,
        provider: &Provider,
        method: &str,
        params: &[Value],
        timeout: Duration,
    ) -> RequestOutcome;
}

/// `MethodCaller` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpCaller {
    client: reqwest::Client,
}

impl HttpCaller {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rpc-health-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RpcError::Request(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Use an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        provider: &Provider,
        method: &str,
        params: &[Value],
        timeout: Duration,
    ) -> std::result::Result<String, RpcError> {
        let url = provider.request_url()?;
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let mut request = self.client.post(url).timeout(timeout).json(&body);
        if let ProviderAuth::Basic { login, password } = &provider.auth {
            request = request.basic_auth(login, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::RateLimited(provider.name.clone()));
        }
        if !status.is_success() {
            return Err(RpcError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(|e| classify(e, timeout))?;
        serde_json::from_str::<Value>(&text)
            .map_err(|e| RpcError::InvalidResponse(format!("body is not JSON: {}", e)))?;

        Ok(text)
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout(timeout.as_millis() as u64)
    } else {
        RpcError::from(e)
    }
}

#[async_trait]
impl MethodCaller for HttpCaller {
    async fn call_method(
        &self,
        provider: &Provider,
        method: &str,
        params: &[Value],
        timeout: Duration,
    ) -> RequestOutcome {
        let start = Instant::now();
        match self.send(provider, method, params, timeout).await {
            Ok(body) => {
                tracing::debug!(provider = %provider.name, method, "call succeeded");
                RequestOutcome::success(body, start.elapsed())
            }
            Err(e) => {
                tracing::debug!(provider = %provider.name, method, error = %e, "call failed");
                RequestOutcome::failure(e, start.elapsed())
            }
        }
    }
}
