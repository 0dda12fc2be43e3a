//! Result of a single JSON-RPC call

use crate::error::RpcError;
use std::time::Duration;

/// Outcome of one call to one provider
///
/// Produced once per (provider, method) pair per validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Raw response body on success, the failure otherwise
    pub result: Result<String, RpcError>,
    /// Time spent on the call
    pub elapsed: Duration,
}

impl RequestOutcome {
    pub fn success(response: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            result: Ok(response.into()),
            elapsed,
        }
    }

    pub fn failure(error: RpcError, elapsed: Duration) -> Self {
        Self {
            result: Err(error),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Raw response body, if the call succeeded
    pub fn response(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    pub fn error(&self) -> Option<&RpcError> {
        self.result.as_ref().err()
    }
}
