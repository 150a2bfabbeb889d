//! Hex input and output for captured packets.

use anyhow::{Context, Result};

/// Decodes hex that may be split by whitespace, `:` or `,` and carry `0x` prefixes, e.g. `0x30, 0x02` or `30:02`.
///
/// Every group must hold whole bytes, an odd number of digits is an error.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(input.len() / 2);

    for token in input.split(|c: char| c.is_whitespace() || c == ':' || c == ',').filter(|t| !t.is_empty()) {
        let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
        let decoded = hex::decode(digits).with_context(|| format!("invalid hex {:?}", token))?;
        bytes.extend(decoded);
    }

    Ok(bytes)
}

/// Lowercase hex without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
