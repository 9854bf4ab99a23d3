//! Converts a public token list (e.g. tokens.uniswap.org) into the
//! chain-grouped file read by [`crate::tokens::TokenRegistry`].

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Chains kept in the transformed file.
pub const SUPPORTED_TOKEN_CHAINS: [u64; 8] = [1, 10, 42, 56, 137, 8453, 42161, 81457];

/// Group `list["tokens"]` as chain id → address → token, keeping only
/// supported chains. Every other top-level field is preserved.
pub fn group_tokens(mut list: Value) -> Result<Value> {
    let root = list
        .as_object_mut()
        .context("Token list must be a JSON object")?;

    let tokens = match root.remove("tokens") {
        Some(Value::Array(tokens)) => tokens,
        Some(_) => anyhow::bail!("Token list field `tokens` must be an array"),
        None => Vec::new(),
    };

    let mut grouped: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for token in tokens {
        let chain_id = match token.get("chainId") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        };
        let address = token.get("address").and_then(Value::as_str).map(str::to_string);

        let (Some(chain_id), Some(address)) = (chain_id, address) else {
            warn!(%token, "Skipping token without chainId/address");
            continue;
        };
        if !SUPPORTED_TOKEN_CHAINS.contains(&chain_id) {
            continue;
        }
        grouped
            .entry(chain_id.to_string())
            .or_default()
            .insert(address, token);
    }

    let grouped: Map<String, Value> = grouped
        .into_iter()
        .map(|(chain, tokens)| (chain, Value::Object(tokens)))
        .collect();
    root.insert("tokens".to_string(), Value::Object(grouped));
    Ok(list)
}

pub fn transform_token_list(input: &Path, output: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let list: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed token list {}", input.display()))?;

    let transformed = group_tokens(list)?;
    let chains = transformed["tokens"].as_object().map_or(0, Map::len);

    std::fs::write(output, serde_json::to_string_pretty(&transformed)?)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), chains, "Transformed token list");
    Ok(())
}
