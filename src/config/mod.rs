//! Configuration: providers, chains, test methods and the checker settings

mod chain;
mod file;
mod methods;
mod provider;

pub use chain::{
    index_by_chain_id, load_chains, load_reference_chains, parse_chains, write_chains,
    ChainConfig, ChainEntry, ChainsFile, ReferenceChainConfig,
};
pub use file::CheckerConfig;
pub use methods::{load_method_specs, parse_method_specs, MethodSpec};
pub use provider::{Provider, ProviderAuth};
