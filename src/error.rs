//! Error types for rpc-health-checker

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// RPC-related errors
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Provider validation errors
    #[error("Check error: {0}")]
    Check(#[from] CheckError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl Error {
    /// Whether this error means a requested chain or its reference is not configured
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Config(ConfigError::ChainNotFound(_))
                | Error::Config(ConfigError::ReferenceNotFound(_))
        )
    }
}

/// RPC-specific errors
///
/// These end up inside every `RequestOutcome`, which is cloned into
/// diagnostics, so variants carry rendered messages instead of source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Deadline of {0}ms exceeded, call cancelled")]
    DeadlineExceeded(u64),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Unexpected status code: {0}")]
    HttpStatus(u16),

    #[error("Rate limited by endpoint: {0}")]
    RateLimited(String),

    #[error("Invalid response from endpoint: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to build request: {0}")]
    Serialize(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Timeout(0)
        } else if e.is_connect() {
            RpcError::ConnectionFailed(e.to_string())
        } else if e.is_decode() || e.is_body() {
            RpcError::InvalidResponse(e.to_string())
        } else {
            RpcError::Request(e.to_string())
        }
    }
}

/// Reasons a provider failed a method check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("validation failed: reference provider {reference} failed: {cause}")]
    ReferenceFailed { reference: String, cause: String },

    #[error("failed to parse reference provider {reference} response: {reason}")]
    ReferenceParse { reference: String, reason: String },

    #[error("failed to parse provider response: {0}")]
    ProviderParse(String),

    #[error("{0}")]
    Call(#[from] RpcError),

    #[error("provider result not found")]
    MissingResult,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    InvalidFile(String),

    #[error("Config file parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("No chains configured in {0}")]
    NoChains(String),

    #[error("No test methods configured in {0}")]
    NoMethods(String),

    #[error("Duplicate provider name {name} in chain {chain_id}")]
    DuplicateProvider { chain_id: u64, name: String },

    #[error("chain config not found for chainId: {0}")]
    ChainNotFound(u64),

    #[error("reference config not found for chainId: {0}")]
    ReferenceNotFound(u64),
}

/// Output-related errors
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output file: {0}")]
    FileCreate(String),

    #[error("Failed to write providers: {0}")]
    Write(String),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_signal() {
        let err: Error = ConfigError::ChainNotFound(42).into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));

        let err: Error = ConfigError::ReferenceNotFound(42).into();
        assert!(err.is_not_found());

        let err: Error = ConfigError::NoChains("chains.json".into()).into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_reference_failure_message() {
        let err = CheckError::ReferenceFailed {
            reference: "infura".into(),
            cause: RpcError::HttpStatus(502).to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("reference provider infura failed"));
        assert!(msg.contains("502"));
    }
}
