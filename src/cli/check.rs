//! One-shot validation commands

use crate::checker::{ChainResults, ChainValidationRunner, FailedMethod, ValidationPass};
use crate::config::CheckerConfig;
use crate::rpc::MethodCaller;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct CheckArgs {
    /// Chain to validate
    #[arg(long)]
    pub chain_id: u64,

    /// Output format (pretty, json)
    #[arg(long, short, default_value = "pretty")]
    pub output: String,
}

/// `run`: one full pass, output file written
pub async fn handle_run(
    config: &CheckerConfig,
    caller: Arc<dyn MethodCaller>,
) -> anyhow::Result<()> {
    let runner = ChainValidationRunner::from_config(config, caller)?;
    let pass = runner.run().await;

    print_pass(&runner, &pass);
    println!(
        "\nWrote {} chains to {}",
        pass.valid_chains.len(),
        config.output_providers_path.display()
    );

    Ok(())
}

/// `check`: one chain, nothing written
pub async fn handle_check(
    args: &CheckArgs,
    config: &CheckerConfig,
    caller: Arc<dyn MethodCaller>,
) -> anyhow::Result<()> {
    let runner = ChainValidationRunner::from_config(config, caller)?;
    let results = runner.run_for_chain(args.chain_id).await?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&results_json(&results))?);
        return Ok(());
    }

    let name = runner
        .chains()
        .get(&args.chain_id)
        .map(|c| c.name.as_str())
        .unwrap_or_default();
    println!("CHAIN {} ({})\n", args.chain_id, name);
    print_chain_results(&results);

    Ok(())
}

fn print_pass(runner: &ChainValidationRunner, pass: &ValidationPass) {
    if pass.results.is_empty() {
        println!("No chains with a reference provider");
        return;
    }

    for (chain_id, results) in &pass.results {
        let name = runner
            .chains()
            .get(chain_id)
            .map(|c| c.name.as_str())
            .unwrap_or_default();
        let valid = results.values().filter(|r| r.valid).count();
        println!("{:>10}  {:<20} {}/{} valid", chain_id, name, valid, results.len());
    }
}

fn print_chain_results(results: &ChainResults) {
    let mut names: Vec<_> = results.keys().collect();
    names.sort();

    for name in names {
        let result = &results[name];
        if result.valid {
            println!("✓ {}", name);
            continue;
        }

        println!("✗ {}", name);
        let mut methods: Vec<_> = result.failed_methods.iter().collect();
        methods.sort_by_key(|(method, _)| *method);
        for (method, failed) in methods {
            println!("    {}: {}", method, describe_failure(failed));
        }
    }
}

fn describe_failure(failed: &FailedMethod) -> String {
    if let Some(error) = &failed.error {
        return error.to_string();
    }

    let provider = failed
        .result
        .as_ref()
        .and_then(|o| o.response())
        .unwrap_or("-");
    let reference = failed
        .reference_result
        .as_ref()
        .and_then(|o| o.response())
        .unwrap_or("-");
    format!("out of tolerance (provider {}, reference {})", provider, reference)
}

fn results_json(results: &ChainResults) -> serde_json::Value {
    let providers: serde_json::Map<String, serde_json::Value> = results
        .iter()
        .map(|(name, result)| {
            let failed: serde_json::Map<String, serde_json::Value> = result
                .failed_methods
                .iter()
                .map(|(method, failed)| {
                    (
                        method.clone(),
                        serde_json::json!({
                            "error": failed.error.as_ref().map(|e| e.to_string()),
                            "result": failed.result.as_ref().and_then(|o| o.response()),
                            "referenceResult": failed.reference_result.as_ref().and_then(|o| o.response()),
                        }),
                    )
                })
                .collect();
            (
                name.clone(),
                serde_json::json!({ "valid": result.valid, "failedMethods": failed }),
            )
        })
        .collect();

    serde_json::Value::Object(providers)
}
