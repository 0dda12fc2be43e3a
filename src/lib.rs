//! rpc-health-checker - JSON-RPC provider validation against a trusted reference
//!
//! For every configured chain, each candidate provider is asked the same
//! JSON-RPC methods as the chain's reference provider. A candidate stays in
//! the published list only if every numeric answer is within the method's
//! tolerance of the reference answer.
//!
//! # Example
//!
//! ```rust,no_run
//! use rpc_health_checker::{ChainValidationRunner, CheckerConfig, HttpCaller};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CheckerConfig::load_or_default(&CheckerConfig::default_path())?;
//!     let runner = ChainValidationRunner::from_config(&config, Arc::new(HttpCaller::new()?))?;
//!
//!     let pass = runner.run().await;
//!     for chain in &pass.valid_chains {
//!         println!("{}: {} valid providers", chain.name, chain.providers.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod rpc;
pub mod scheduler;
pub mod server;

// Re-exports for convenience
pub use checker::{
    validate_all_methods, validate_method, ChainResults, ChainValidationRunner, CheckResult,
    Comparison, FailedMethod, MethodValidation, ProviderValidationResult, ValidationPass,
};
pub use config::{
    ChainConfig, CheckerConfig, MethodSpec, Provider, ProviderAuth, ReferenceChainConfig,
};
pub use error::{CheckError, ConfigError, Error, OutputError, Result, RpcError};
pub use output::{JsonFileSink, OutputSink};
pub use rpc::{parallel_call_method, HttpCaller, MethodCaller, RequestOutcome};
pub use scheduler::Scheduler;
