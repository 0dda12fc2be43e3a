//! JSON-RPC test method definitions

use crate::checker::Comparison;
use crate::error::{ConfigError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One JSON-RPC method used as a health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MethodRecord", into = "MethodRecord")]
pub struct MethodSpec {
    /// JSON-RPC method name, e.g. `eth_blockNumber`
    pub method: String,
    /// Fixed parameter list sent with every call
    pub params: Vec<Value>,
    /// How a candidate's value is compared with the reference value
    pub comparison: Comparison,
}

impl MethodSpec {
    /// Method with no params and a tolerance check
    pub fn new(method: impl Into<String>, max_difference: impl Into<BigUint>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
            comparison: Comparison::tolerance(max_difference),
        }
    }

    /// Builder-style setter for params
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.method.trim().is_empty() {
            return Err(ConfigError::MissingField("method name".to_string()));
        }
        Ok(())
    }
}

/// `maxDifference` is accepted as a decimal string or a JSON number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MaxDifference {
    Number(u64),
    Text(String),
}

impl Default for MaxDifference {
    fn default() -> Self {
        MaxDifference::Number(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MethodRecord {
    method: String,
    #[serde(default)]
    params: Vec<Value>,
    #[serde(rename = "maxDifference", default)]
    max_difference: MaxDifference,
}

impl TryFrom<MethodRecord> for MethodSpec {
    type Error = ConfigError;

    fn try_from(record: MethodRecord) -> std::result::Result<Self, Self::Error> {
        let max_difference = match record.max_difference {
            MaxDifference::Number(n) => BigUint::from(n),
            MaxDifference::Text(s) => s.trim().parse::<BigUint>().map_err(|_| {
                ConfigError::Invalid(format!("invalid maxDifference value: {}", s))
            })?,
        };

        let spec = MethodSpec {
            method: record.method,
            params: record.params,
            comparison: Comparison::tolerance(max_difference),
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl From<MethodSpec> for MethodRecord {
    fn from(spec: MethodSpec) -> Self {
        let max_difference = match spec.comparison {
            Comparison::Tolerance { max_difference } => {
                MaxDifference::Text(max_difference.to_string())
            }
        };
        MethodRecord {
            method: spec.method,
            params: spec.params,
            max_difference,
        }
    }
}

/// Parse a JSON array of method definitions
pub fn parse_method_specs(content: &str, source: &str) -> Result<Vec<MethodSpec>> {
    let specs: Vec<MethodSpec> = serde_json::from_str(content).map_err(ConfigError::from)?;
    if specs.is_empty() {
        return Err(ConfigError::NoMethods(source.to_string()).into());
    }
    Ok(specs)
}

/// Load method definitions from a JSON file
pub fn load_method_specs(path: &Path) -> Result<Vec<MethodSpec>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;
    parse_method_specs(&content, &path.display().to_string())
}
