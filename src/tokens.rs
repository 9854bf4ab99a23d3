//! Chain-keyed token metadata loaded from a preprocessed token list.
//!
//! The file shape is `{ "tokens": { "<chain id>": { "<address>": { ...token... } } } }`,
//! as produced by [`crate::transform::transform_token_list`].

use crate::error::TokenRegistryError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

static NO_TOKENS: BTreeMap<String, TokenRecord> = BTreeMap::new();

/// Metadata for one ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "chainId", deserialize_with = "chain_id_string")]
    pub chain_id: String,
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

#[derive(Deserialize)]
struct TokenFile {
    tokens: HashMap<String, HashMap<String, TokenRecord>>,
}

/// Token lists carry `chainId` as a number; accept a string as well.
fn chain_id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChainId {
        Number(u64),
        Text(String),
    }

    Ok(match ChainId::deserialize(deserializer)? {
        ChainId::Number(n) => n.to_string(),
        ChainId::Text(s) => s,
    })
}

/// In-memory token table. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRegistry {
    chains: HashMap<String, BTreeMap<String, TokenRecord>>,
}

impl TokenRegistry {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TokenRegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TokenRegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            chains = registry.chains.len(),
            tokens = registry.len(),
            "Loaded token registry"
        );
        Ok(registry)
    }

    pub fn from_json(raw: &str) -> Result<Self, TokenRegistryError> {
        let file: TokenFile = serde_json::from_str(raw)?;

        let mut chains = HashMap::with_capacity(file.tokens.len());
        for (chain_id, tokens) in file.tokens {
            let mut by_address = BTreeMap::new();
            for (address, record) in tokens {
                if record.chain_id != chain_id {
                    return Err(TokenRegistryError::ChainMismatch {
                        group: chain_id,
                        address,
                        declared: record.chain_id,
                    });
                }
                by_address.insert(address.to_lowercase(), record);
            }
            chains.insert(chain_id, by_address);
        }

        Ok(Self { chains })
    }

    /// All known tokens on `chain_id`, keyed by lowercased address.
    /// Unknown chains yield an empty map.
    pub fn lookup_tokens(&self, chain_id: &str) -> &BTreeMap<String, TokenRecord> {
        self.chains.get(chain_id).unwrap_or(&NO_TOKENS)
    }

    /// Exact address match, ignoring checksum casing.
    pub fn lookup_token(&self, chain_id: &str, address: &str) -> Option<&TokenRecord> {
        self.chains
            .get(chain_id)
            .and_then(|tokens| tokens.get(&address.to_lowercase()))
    }

    pub fn chains(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.chains.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
