pub mod balance;
pub mod lending;
pub mod liquidity;
pub mod registry;
pub mod swap;
pub mod transfer;

use crate::chains::{self, ChainContext};
use crate::error::ChainContextError;
use crate::ethereum::EthereumClient;
use crate::tokens::TokenRegistry;
use alloy::primitives::{Address, U256};
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// State shared by every tool call.
#[derive(Clone)]
pub struct ToolContext {
    pub client: EthereumClient,
    pub tokens: Arc<TokenRegistry>,
    pub default_chain_id: String,
}

impl ToolContext {
    pub fn new(client: EthereumClient, tokens: TokenRegistry, default_chain_id: impl Into<String>) -> Self {
        Self {
            client,
            tokens: Arc::new(tokens),
            default_chain_id: default_chain_id.into(),
        }
    }

    /// `chain_id` argument, falling back to the configured chain.
    pub fn chain_id(&self, args: &Value) -> String {
        match args.get("chain_id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => self.default_chain_id.clone(),
        }
    }

    /// Contract addresses for the requested chain, without contacting the node.
    pub fn requested_context(&self, args: &Value) -> Result<ChainContext> {
        Ok(chains::get_context(&self.chain_id(args))?)
    }

    /// Transactions are signed for the node's chain, so it must be `chain`.
    pub async fn ensure_network(&self, chain: &ChainContext) -> Result<()> {
        let connected = self.client.chain_id().await?;
        if chain.chain_id != connected.to_string() {
            return Err(ChainContextError::WrongNetwork {
                requested: chain.chain_id.to_string(),
                connected,
            }
            .into());
        }
        Ok(())
    }

    /// Requested chain context, checked against the connected node.
    pub async fn chain_context(&self, args: &Value) -> Result<ChainContext> {
        let context = self.requested_context(args)?;
        self.ensure_network(&context).await?;
        Ok(context)
    }
}

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value>;
}

/// Tools indexed by name.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
    order: Vec<&'static str>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every chain and lookup tool the agent exposes.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.register(balance::GetEthBalanceTool);
        set.register(balance::GetTokenBalanceTool);
        set.register(transfer::SendEthTool);
        set.register(transfer::WrapEthTool);
        set.register(liquidity::AddLiquidityTool);
        set.register(liquidity::RemoveLiquidityTool);
        set.register(lending::SupplyAssetTool);
        set.register(lending::WithdrawAssetTool);
        set.register(swap::SwapTokensTool);
        set.register(registry::SearchTokensTool);
        set.register(registry::GetCryptoContextTool);
        set.register(registry::GetTokenDataTool);
        set
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name();
        if self.tools.insert(name, Arc::new(tool)).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Missing {}", key))
}

pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub(crate) fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|_| anyhow!("Invalid address: {}", value))
}

pub(crate) fn required_address(args: &Value, key: &str) -> Result<Address> {
    parse_address(required_str(args, key)?)
}

pub(crate) fn optional_address(args: &Value, key: &str) -> Result<Option<Address>> {
    optional_str(args, key).map(parse_address).transpose()
}

/// Base-unit integer given as a JSON string or number.
pub(crate) fn parse_amount(args: &Value, key: &str) -> Result<Option<U256>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => U256::from_str(s.trim())
            .map(Some)
            .map_err(|_| anyhow!("Invalid {}: {}", key, s)),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(U256::from(v)))
            .ok_or_else(|| anyhow!("Invalid {}: {}", key, n)),
        Some(other) => Err(anyhow!("Invalid {}: {}", key, other)),
    }
}

pub(crate) fn required_amount(args: &Value, key: &str) -> Result<U256> {
    parse_amount(args, key)?.ok_or_else(|| anyhow!("Missing {}", key))
}

const MAX_FEE: u64 = 0xFF_FFFF;

/// Uniswap fee tier. Defaults to 3000; must fit in a uint24.
pub(crate) fn fee_tier(args: &Value) -> Result<u32> {
    match args.get("fee") {
        None | Some(Value::Null) => Ok(3000),
        Some(v) => match v.as_u64() {
            Some(fee) if fee <= MAX_FEE => Ok(fee as u32),
            _ => Err(anyhow!("Invalid fee tier: {}", v)),
        },
    }
}
