//! Provider listing commands

use crate::config::{
    index_by_chain_id, load_chains, load_reference_chains, CheckerConfig, Provider, ProviderAuth,
};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// List configured chains with their reference and candidate providers
    List {
        /// Only show this chain
        #[arg(long)]
        chain_id: Option<u64>,
    },
}

pub fn handle(action: &ProviderCommands, config: &CheckerConfig) -> anyhow::Result<()> {
    match action {
        ProviderCommands::List { chain_id } => {
            let chains = load_chains(&config.default_providers_path)?;
            let references = index_by_chain_id(load_reference_chains(
                &config.reference_providers_path,
            )?);

            let chains: Vec<_> = chains
                .into_iter()
                .filter(|c| chain_id.map_or(true, |id| c.chain_id == id))
                .collect();

            if chains.is_empty() {
                if let Some(id) = chain_id {
                    anyhow::bail!("chain config not found for chainId: {}", id);
                }
            }

            println!("CONFIGURED CHAINS ({})\n", chains.len());

            for chain in index_by_chain_id(chains).into_values() {
                println!("{} [{}] chainId {}", chain.name, chain.network, chain.chain_id);

                match references.get(&chain.chain_id) {
                    Some(reference) => println!("  reference: {}", describe(&reference.provider)),
                    None => println!("  reference: (none, chain will be skipped)"),
                }

                for provider in &chain.providers {
                    println!(
                        "  - {}{}",
                        describe(provider),
                        if provider.enabled { "" } else { " (disabled)" }
                    );
                }
                println!();
            }
        }
    }

    Ok(())
}

/// Name, URL and auth kind; credentials are never printed
fn describe(provider: &Provider) -> String {
    let auth = match provider.auth {
        ProviderAuth::None => "",
        ProviderAuth::Basic { .. } => " [basic-auth]",
        ProviderAuth::Token { .. } => " [token-auth]",
    };
    format!("{} {}{}", provider.name, provider.url, auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_hides_credentials() {
        let provider = Provider::new("infura", "https://mainnet.infura.io/v3").with_token("secret");
        let text = describe(&provider);
        assert!(text.contains("[token-auth]"));
        assert!(!text.contains("secret"));

        let provider = Provider::new("node", "https://node.example.com").with_basic_auth("user", "pw");
        let text = describe(&provider);
        assert!(text.contains("[basic-auth]"));
        assert!(!text.contains("pw"));
    }
}
