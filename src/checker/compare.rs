//! Numeric extraction from JSON-RPC responses and the tolerance check

use num_bigint::{BigInt, BigUint};
use serde::Deserialize;

/// Strategy used to decide whether a candidate value agrees with the reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Valid iff `|reference - candidate| <= max_difference`.
    /// Exact equality is `max_difference == 0`.
    Tolerance { max_difference: BigUint },
}

/// Result of comparing one candidate value with the reference value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    /// Absolute difference between the two values
    pub diff: BigUint,
}

impl Comparison {
    pub fn tolerance(max_difference: impl Into<BigUint>) -> Self {
        Comparison::Tolerance {
            max_difference: max_difference.into(),
        }
    }

    pub fn evaluate(&self, reference: &BigInt, candidate: &BigInt) -> Verdict {
        let diff = (reference - candidate).magnitude().clone();
        match self {
            Comparison::Tolerance { max_difference } => Verdict {
                valid: diff <= *max_difference,
                diff,
            },
        }
    }
}

#[derive(Deserialize)]
struct JsonRpcResult {
    result: String,
}

/// Extract the hex quantity from `{"result": "0x..."}`
///
/// The `0x` prefix is optional and digits are case-insensitive. Any other
/// shape, including surrounding whitespace, an error object or a non-string
/// result, is a failure.
pub fn parse_hex_result(response: &str) -> Result<BigInt, String> {
    let parsed: JsonRpcResult = serde_json::from_str(response)
        .map_err(|e| format!("failed to unmarshal JSON-RPC response: {}", e))?;

    let raw = parsed.result.as_str();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("failed to parse result as hex number: {:?}", parsed.result));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16)
        .map(BigInt::from)
        .ok_or_else(|| format!("failed to parse result as hex number: {:?}", parsed.result))
}
