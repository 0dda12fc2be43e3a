//! Chain and reference-chain configuration files

use super::Provider;
use crate::error::{ConfigError, OutputError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A blockchain network with its candidate providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain name, lowercase (e.g. "ethereum")
    pub name: String,
    /// Network name, lowercase (e.g. "mainnet")
    pub network: String,
    /// Numeric chain id
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    /// Candidate providers, in configuration order
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// The trusted reference provider for a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceChainConfig {
    pub name: String,
    pub network: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    pub provider: Provider,
}

/// Root object of a chains file: `{"chains": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsFile<T> {
    pub chains: Vec<T>,
}

/// Shared behavior of entries in a chains file
pub trait ChainEntry {
    fn chain_id(&self) -> u64;
    fn normalize(&mut self);
    fn validate(&self) -> std::result::Result<(), ConfigError>;
}

fn validate_identity(name: &str, network: &str, chain_id: u64) -> std::result::Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::MissingField("chain name".to_string()));
    }
    if network.is_empty() {
        return Err(ConfigError::MissingField(format!("network for chain {}", name)));
    }
    if chain_id == 0 {
        return Err(ConfigError::MissingField(format!("chainId for chain {}", name)));
    }
    if name != name.to_lowercase() {
        return Err(ConfigError::Invalid(format!("chain name {} must be lowercase", name)));
    }
    if network != network.to_lowercase() {
        return Err(ConfigError::Invalid(format!("network {} must be lowercase", network)));
    }
    Ok(())
}

impl ChainEntry for ChainConfig {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn normalize(&mut self) {
        self.name = self.name.to_lowercase();
        self.network = self.network.to_lowercase();
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_identity(&self.name, &self.network, self.chain_id)?;

        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                return Err(ConfigError::DuplicateProvider {
                    chain_id: self.chain_id,
                    name: provider.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl ChainEntry for ReferenceChainConfig {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn normalize(&mut self) {
        self.name = self.name.to_lowercase();
        self.network = self.network.to_lowercase();
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_identity(&self.name, &self.network, self.chain_id)?;
        self.provider.validate()
    }
}

impl ChainConfig {
    /// Copy of this chain carrying only the given providers
    pub fn with_providers(&self, providers: Vec<Provider>) -> Self {
        Self {
            name: self.name.clone(),
            network: self.network.clone(),
            chain_id: self.chain_id,
            providers,
        }
    }

    /// Providers that take part in validation
    pub fn enabled_providers(&self) -> Vec<Provider> {
        self.providers.iter().filter(|p| p.enabled).cloned().collect()
    }
}

/// Parse a chains document, normalizing and validating every entry
pub fn parse_chains<T>(content: &str, source: &str) -> Result<Vec<T>>
where
    T: ChainEntry + DeserializeOwned,
{
    let file: ChainsFile<T> = serde_json::from_str(content).map_err(ConfigError::from)?;
    if file.chains.is_empty() {
        return Err(ConfigError::NoChains(source.to_string()).into());
    }

    let mut chains = file.chains;
    for chain in &mut chains {
        chain.normalize();
        chain.validate()?;
    }
    Ok(chains)
}

fn load_chain_file<T>(path: &Path) -> Result<Vec<T>>
where
    T: ChainEntry + DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;
    parse_chains(&content, &path.display().to_string())
}

/// Load candidate chains from a JSON file
pub fn load_chains(path: &Path) -> Result<Vec<ChainConfig>> {
    load_chain_file(path)
}

/// Load reference chains from a JSON file
pub fn load_reference_chains(path: &Path) -> Result<Vec<ReferenceChainConfig>> {
    load_chain_file(path)
}

/// Index entries by chain id; later duplicates replace earlier ones
pub fn index_by_chain_id<T: ChainEntry>(chains: Vec<T>) -> BTreeMap<u64, T> {
    chains.into_iter().map(|c| (c.chain_id(), c)).collect()
}

/// Write chains as pretty JSON, replacing the file atomically
pub fn write_chains(path: &Path, chains: &[ChainConfig]) -> Result<()> {
    for chain in chains {
        chain
            .validate()
            .map_err(|e| OutputError::Write(format!("invalid chain configuration: {}", e)))?;
    }

    let file = ChainsFile {
        chains: chains.to_vec(),
    };
    let content = serde_json::to_string_pretty(&file)
        .map_err(|e| OutputError::Write(format!("failed to marshal chains: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::FileCreate(format!("{}: {}", parent.display(), e))
            })?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)
        .map_err(|e| OutputError::FileCreate(format!("{}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))?;

    Ok(())
}
