use serde::{Deserialize, Serialize};

/// Amount exactly as it arrived in the request payload. Clients send whole
/// units as JSON numbers, decimal numbers, or strings with an optional
/// leading currency symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to read '{0}' as a whole-unit amount")]
pub struct AmountError(pub String);

/// Normalizes a raw amount into the integer the ledger stores.
///
/// Strings go through an ordered fallback chain: a direct integer parse,
/// then the segment after a `$` parsed as a decimal, then the whole string
/// parsed as a decimal. Decimal values truncate toward zero, so `"$12.99"`
/// and `"12.99"` both store as `12`.
pub fn normalize_amount(raw: &RawAmount) -> Result<i64, AmountError> {
    match raw {
        RawAmount::Integer(value) => Ok(*value),
        RawAmount::Number(value) => {
            truncate(*value).ok_or_else(|| AmountError(value.to_string()))
        }
        RawAmount::Text(text) => normalize_text(text),
    }
}

fn normalize_text(text: &str) -> Result<i64, AmountError> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    // The segment after the first `$` when one is present, the whole string
    // otherwise.
    let candidate = match trimmed.split('$').nth(1) {
        Some(segment) => segment,
        None => trimmed,
    };

    candidate
        .parse::<f64>()
        .ok()
        .and_then(truncate)
        .ok_or_else(|| AmountError(text.to_string()))
}

fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}
