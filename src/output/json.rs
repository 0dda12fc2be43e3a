//! JSON file output

use super::OutputSink;
use crate::config::{write_chains, ChainConfig};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Writes `{"chains": [...]}` to a file, replacing it atomically
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for JsonFileSink {
    fn write_chains(&self, chains: &[ChainConfig]) -> Result<()> {
        write_chains(&self.path, chains)?;
        tracing::info!(
            "Wrote {} chains to {}",
            chains.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_chains, Provider};

    #[test]
    fn test_writes_chains_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("providers.json"));

        let chain = ChainConfig {
            name: "ethereum".into(),
            network: "mainnet".into(),
            chain_id: 1,
            providers: vec![Provider::new("a", "https://a.example.com")],
        };
        sink.write_chains(std::slice::from_ref(&chain)).unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        assert!(content.contains("\"chainId\": 1"));
        assert_eq!(load_chains(sink.path()).unwrap(), vec![chain]);
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let sink = JsonFileSink::new(blocker.join("providers.json"));
        assert!(sink.write_chains(&[]).is_err());
    }
}
