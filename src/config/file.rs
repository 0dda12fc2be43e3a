//! Checker configuration file handling

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Checker configuration file structure
///
/// JSON by default; a `.toml` extension selects TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Seconds between validation passes
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,

    /// Candidate providers per chain
    #[serde(default = "default_providers_path")]
    pub default_providers_path: PathBuf,

    /// Reference provider per chain
    #[serde(default = "default_reference_path")]
    pub reference_providers_path: PathBuf,

    /// Where the valid providers are written
    #[serde(default = "default_output_path")]
    pub output_providers_path: PathBuf,

    /// Test method definitions
    #[serde(default = "default_tests_path")]
    pub tests_config_path: PathBuf,

    /// Shared deadline for one fan-out, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// Chains validated at the same time
    #[serde(default = "default_chain_concurrency")]
    pub chain_concurrency: usize,

    /// Address the providers server listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

/// Upper bound for one fan-out deadline
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

fn default_interval() -> u64 {
    60
}

fn default_providers_path() -> PathBuf {
    PathBuf::from("default_providers.json")
}

fn default_reference_path() -> PathBuf {
    PathBuf::from("reference_providers.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("providers.json")
}

fn default_tests_path() -> PathBuf {
    PathBuf::from("test_methods.json")
}

fn default_timeout() -> u64 {
    10
}

fn default_chain_concurrency() -> usize {
    4
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            default_providers_path: default_providers_path(),
            reference_providers_path: default_reference_path(),
            output_providers_path: default_output_path(),
            tests_config_path: default_tests_path(),
            request_timeout_seconds: default_timeout(),
            chain_concurrency: default_chain_concurrency(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl CheckerConfig {
    /// Default config file path, relative to the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from("checker_config.json")
    }

    /// Load from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let config: Self = if is_toml {
            toml::from_str(&content).map_err(ConfigError::from)?
        } else {
            serde_json::from_str(&content).map_err(ConfigError::from)?
        };

        Ok(config.sanitized())
    }

    /// Load from a path if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(
                "No checker config at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        if self.interval_seconds == 0 {
            self.interval_seconds = default_interval();
        }
        if self.request_timeout_seconds == 0 {
            self.request_timeout_seconds = default_timeout();
        }
        if self.request_timeout_seconds > MAX_REQUEST_TIMEOUT_SECONDS {
            tracing::warn!(
                "request_timeout_seconds {} is too large, using {}",
                self.request_timeout_seconds,
                MAX_REQUEST_TIMEOUT_SECONDS
            );
            self.request_timeout_seconds = MAX_REQUEST_TIMEOUT_SECONDS;
        }
        if self.chain_concurrency == 0 {
            self.chain_concurrency = 1;
        }
        self
    }

    /// Override the listen port (e.g. from `PORT`)
    pub fn with_port(mut self, port: u16) -> Self {
        self.listen_addr.set_port(port);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
