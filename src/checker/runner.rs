//! Validation across every configured chain

use super::aggregate::{validate_all_methods, ProviderValidationResult};
use crate::config::{
    index_by_chain_id, load_chains, load_method_specs, load_reference_chains, ChainConfig,
    CheckerConfig, MethodSpec, Provider, ReferenceChainConfig,
};
use crate::error::{ConfigError, Result};
use crate::output::{JsonFileSink, OutputSink};
use crate::rpc::MethodCaller;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Provider name -> verdict, for one chain
pub type ChainResults = HashMap<String, ProviderValidationResult>;

/// Everything produced by one validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationPass {
    /// Chain id -> per-provider verdicts
    pub results: BTreeMap<u64, ChainResults>,
    /// Validated chains carrying only their valid providers, by chain id
    pub valid_chains: Vec<ChainConfig>,
}

/// Coordinates validation across multiple chains
pub struct ChainValidationRunner {
    chains: BTreeMap<u64, ChainConfig>,
    references: BTreeMap<u64, ReferenceChainConfig>,
    methods: Vec<MethodSpec>,
    caller: Arc<dyn MethodCaller>,
    timeout: Duration,
    chain_concurrency: usize,
    sink: Option<Arc<dyn OutputSink>>,
}

impl ChainValidationRunner {
    pub fn new(
        chains: Vec<ChainConfig>,
        references: Vec<ReferenceChainConfig>,
        methods: Vec<MethodSpec>,
        caller: Arc<dyn MethodCaller>,
        timeout: Duration,
    ) -> Self {
        Self {
            chains: index_by_chain_id(chains),
            references: index_by_chain_id(references),
            methods,
            caller,
            timeout,
            chain_concurrency: 1,
            sink: None,
        }
    }

    /// Load chains, references and methods from the files named in `config`
    pub fn from_config(config: &CheckerConfig, caller: Arc<dyn MethodCaller>) -> Result<Self> {
        let chains = load_chains(&config.default_providers_path)?;
        let references = load_reference_chains(&config.reference_providers_path)?;
        let methods = load_method_specs(&config.tests_config_path)?;

        tracing::debug!(
            "Loaded {} chains, {} references, {} methods",
            chains.len(),
            references.len(),
            methods.len()
        );

        Ok(
            Self::new(chains, references, methods, caller, config.request_timeout())
                .with_chain_concurrency(config.chain_concurrency)
                .with_sink(Arc::new(JsonFileSink::new(config.output_providers_path.clone()))),
        )
    }

    /// Builder-style setter for the output sink
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builder-style setter for how many chains are validated at once
    pub fn with_chain_concurrency(mut self, concurrency: usize) -> Self {
        self.chain_concurrency = concurrency.max(1);
        self
    }

    pub fn chains(&self) -> &BTreeMap<u64, ChainConfig> {
        &self.chains
    }

    /// Validate every chain that has a reference and hand the valid
    /// providers to the sink in one write
    ///
    /// Chains without a reference are skipped. A failed write is logged and
    /// does not affect the returned results.
    pub async fn run(&self) -> ValidationPass {
        if self.methods.is_empty() {
            tracing::warn!("No test methods configured, every provider will pass");
        }

        // Owned jobs: the `run` future must stay `Send` for the scheduler task
        let jobs: Vec<(ChainConfig, ReferenceChainConfig)> = self
            .chains
            .iter()
            .filter_map(|(chain_id, chain)| match self.references.get(chain_id) {
                Some(reference) => Some((chain.clone(), reference.clone())),
                None => {
                    tracing::debug!(chain_id, "No reference provider, skipping chain");
                    None
                }
            })
            .collect();

        let results: BTreeMap<u64, ChainResults> = stream::iter(jobs)
            .map(|(chain, reference)| async move {
                let results = self.validate_chain(&chain, &reference).await;
                (chain.chain_id, results)
            })
            .buffer_unordered(self.chain_concurrency)
            .collect()
            .await;

        let valid_chains: Vec<ChainConfig> = results
            .iter()
            .filter_map(|(chain_id, chain_results)| {
                self.chains
                    .get(chain_id)
                    .map(|chain| select_valid(chain, chain_results))
            })
            .collect();

        if let Some(sink) = &self.sink {
            let sink = Arc::clone(sink);
            let chains = valid_chains.clone();
            match tokio::task::spawn_blocking(move || sink.write_chains(&chains)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Failed to write valid providers: {}", e),
                Err(e) => tracing::error!("Output writer task failed: {}", e),
            }
        }

        ValidationPass {
            results,
            valid_chains,
        }
    }

    /// Validate a single chain
    ///
    /// Unlike [`run`](Self::run), a missing chain or reference is an error,
    /// so callers can tell "no such chain" from "no valid providers".
    pub async fn run_for_chain(&self, chain_id: u64) -> Result<ChainResults> {
        let chain = self
            .chains
            .get(&chain_id)
            .ok_or(ConfigError::ChainNotFound(chain_id))?;
        let reference = self
            .references
            .get(&chain_id)
            .ok_or(ConfigError::ReferenceNotFound(chain_id))?;

        Ok(self.validate_chain(chain, reference).await)
    }

    async fn validate_chain(
        &self,
        chain: &ChainConfig,
        reference: &ReferenceChainConfig,
    ) -> ChainResults {
        let candidates = candidates_for(chain, &reference.provider);

        let results = validate_all_methods(
            &self.methods,
            &reference.provider,
            &candidates,
            self.caller.as_ref(),
            self.timeout,
        )
        .await;

        let valid = results.values().filter(|r| r.valid).count();
        tracing::info!(
            chain_id = chain.chain_id,
            chain = %chain.name,
            network = %chain.network,
            "{}/{} providers valid",
            valid,
            results.len()
        );

        results
    }
}

/// Enabled providers of `chain`, minus any that shadow the reference's name
fn candidates_for(chain: &ChainConfig, reference: &Provider) -> Vec<Provider> {
    chain
        .enabled_providers()
        .into_iter()
        .filter(|p| {
            if p.name == reference.name {
                tracing::warn!(
                    chain_id = chain.chain_id,
                    provider = %p.name,
                    "Candidate shares the reference provider's name, skipping it"
                );
                false
            } else {
                true
            }
        })
        .collect()
}

/// Chain record holding only the providers that passed, in configuration order
pub fn select_valid(chain: &ChainConfig, results: &ChainResults) -> ChainConfig {
    let providers = chain
        .providers
        .iter()
        .filter(|p| results.get(&p.name).is_some_and(|r| r.valid))
        .cloned()
        .collect();
    chain.with_providers(providers)
}
