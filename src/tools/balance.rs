use super::{required_address, Tool, ToolContext};
use crate::contracts::IERC20;
use crate::units::format_units;
use alloy::providers::Provider;
use anyhow::Result;
use serde_json::{json, Value};

pub struct GetEthBalanceTool;

#[async_trait::async_trait]
impl Tool for GetEthBalanceTool {
    fn name(&self) -> &'static str {
        "get_eth_balance"
    }

    fn description(&self) -> &'static str {
        "Get the native coin (ETH) balance of a wallet address"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The wallet address to check balance for"
                }
            },
            "required": ["address"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let address = required_address(&args, "address")?;

        let balance = ctx.client.provider.get_balance(address).await?;
        let formatted = format_units(balance, 18)?;

        Ok(json!({
            "balance": formatted,
            "raw_balance": balance.to_string(),
            "symbol": "ETH",
            "decimals": 18
        }))
    }
}

pub struct GetTokenBalanceTool;

#[async_trait::async_trait]
impl Tool for GetTokenBalanceTool {
    fn name(&self) -> &'static str {
        "get_token_balance"
    }

    fn description(&self) -> &'static str {
        "Get the balance of an ERC20 token for a specific wallet address"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The wallet address to check balance for"
                },
                "token_address": {
                    "type": "string",
                    "description": "ERC20 token contract address"
                }
            },
            "required": ["address", "token_address"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let address = required_address(&args, "address")?;
        let token_address = required_address(&args, "token_address")?;
        let client = &ctx.client;

        let balance = client
            .call(token_address, IERC20::balanceOfCall { account: address })
            .await?
            ._0;
        let decimals = client.call(token_address, IERC20::decimalsCall {}).await?._0;
        let symbol = client.call(token_address, IERC20::symbolCall {}).await?._0;

        let formatted = format_units(balance, decimals)?;

        Ok(json!({
            "balance": formatted,
            "raw_balance": balance.to_string(),
            "symbol": symbol,
            "decimals": decimals
        }))
    }
}
