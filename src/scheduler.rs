//! Periodic validation passes

use crate::checker::{ChainValidationRunner, ValidationPass};
use crate::config::CheckerConfig;
use crate::error::Result;
use crate::rpc::MethodCaller;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

/// Runs one validation pass per interval until told to stop
///
/// Each pass reloads the chain, reference and method files, so edits are
/// picked up without a restart and no state carries over between passes.
#[derive(Clone)]
pub struct Scheduler {
    config: CheckerConfig,
    caller: Arc<dyn MethodCaller>,
}

impl Scheduler {
    pub fn new(config: CheckerConfig, caller: Arc<dyn MethodCaller>) -> Self {
        Self { config, caller }
    }

    /// Load the files and run a single pass
    pub async fn run_once(&self) -> Result<ValidationPass> {
        let runner = ChainValidationRunner::from_config(&self.config, self.caller.clone())?;

        let started = Instant::now();
        let pass = runner.run().await;

        let providers: usize = pass.valid_chains.iter().map(|c| c.providers.len()).sum();
        tracing::info!(
            chains = pass.results.len(),
            valid_providers = providers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Validation pass complete"
        );

        Ok(pass)
    }

    /// Spawn the loop; the first pass starts immediately
    pub fn start_with_shutdown(
        self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.config.interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_once().await {
                            tracing::error!(error = %e, "Validation pass failed");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Scheduler shutting down");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::testing::ScriptedCaller;
    use crate::config::load_chains;
    use std::path::Path;
    use std::time::Duration;

    const CHAINS: &str = r#"{"chains":[{"name":"Ethereum","network":"Mainnet","chainId":1,"providers":[
        {"name":"a","url":"https://a.example.com"},
        {"name":"b","url":"https://b.example.com"}
    ]}]}"#;

    const REFERENCES: &str = r#"{"chains":[{"name":"ethereum","network":"mainnet","chainId":1,
        "provider":{"name":"ref","url":"https://ref.example.com"}}]}"#;

    const METHODS: &str = r#"[{"method":"eth_blockNumber","params":[],"maxDifference":"2"}]"#;

    fn config_in(dir: &Path) -> CheckerConfig {
        std::fs::write(dir.join("default.json"), CHAINS).unwrap();
        std::fs::write(dir.join("reference.json"), REFERENCES).unwrap();
        std::fs::write(dir.join("methods.json"), METHODS).unwrap();

        CheckerConfig {
            interval_seconds: 3600,
            default_providers_path: dir.join("default.json"),
            reference_providers_path: dir.join("reference.json"),
            output_providers_path: dir.join("out").join("providers.json"),
            tests_config_path: dir.join("methods.json"),
            ..CheckerConfig::default()
        }
    }

    fn caller() -> Arc<dyn MethodCaller> {
        Arc::new(
            ScriptedCaller::new()
                .respond_all("ref", "0x64")
                .respond_all("a", "0x65")
                .respond_all("b", "0x6e"),
        )
    }

    #[tokio::test]
    async fn test_run_once_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let scheduler = Scheduler::new(config.clone(), caller());

        let pass = scheduler.run_once().await.unwrap();
        assert!(pass.results[&1]["a"].valid);

        let written = load_chains(&config.output_providers_path).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].name, "ethereum");
        assert_eq!(written[0].providers.len(), 1);
        assert_eq!(written[0].providers[0].name, "a");
    }

    #[tokio::test]
    async fn test_run_once_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckerConfig {
            default_providers_path: dir.path().join("missing.json"),
            ..config_in(dir.path())
        };
        let scheduler = Scheduler::new(config.clone(), caller());

        assert!(scheduler.run_once().await.is_err());
        assert!(!config.output_providers_path.exists());
    }

    #[tokio::test]
    async fn test_first_pass_runs_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let output = config.output_providers_path.clone();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = Scheduler::new(config, caller()).start_with_shutdown(shutdown_rx);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !output.exists() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(output.exists());

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok(), "Scheduler should shut down promptly");
    }

    #[tokio::test]
    async fn test_shutdown_after_failed_pass() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckerConfig {
            tests_config_path: dir.path().join("missing.json"),
            ..config_in(dir.path())
        };

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = Scheduler::new(config, caller()).start_with_shutdown(shutdown_rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok(), "Scheduler should survive a failed pass");
    }
}
