//! Output sinks for the valid provider list

mod json;

pub use json::JsonFileSink;

use crate::config::ChainConfig;
use crate::error::Result;

/// Destination for the chains that passed validation
///
/// Receives the whole list once per validation pass.
pub trait OutputSink: Send + Sync {
    fn write_chains(&self, chains: &[ChainConfig]) -> Result<()>;
}
