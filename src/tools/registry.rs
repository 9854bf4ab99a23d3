//! Lookup tools over the token registry and chain contexts. No network access.

use super::{required_str, Tool, ToolContext};
use crate::chains;
use anyhow::Result;
use serde_json::{json, Value};

fn chain_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "chain_id": {
                "type": "string",
                "description": "Chain id (e.g. \"1\" for Ethereum, \"8453\" for Base)"
            }
        }
    })
}

pub struct SearchTokensTool;

#[async_trait::async_trait]
impl Tool for SearchTokensTool {
    fn name(&self) -> &'static str {
        "search_tokens"
    }

    fn description(&self) -> &'static str {
        "List all whitelisted tokens known on a chain, keyed by address."
    }

    fn schema(&self) -> Value {
        chain_id_schema()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let chain_id = ctx.chain_id(&args);
        let tokens = ctx.tokens.lookup_tokens(&chain_id);
        Ok(json!({
            "chain_id": chain_id,
            "count": tokens.len(),
            "tokens": tokens
        }))
    }
}

pub struct GetTokenDataTool;

#[async_trait::async_trait]
impl Tool for GetTokenDataTool {
    fn name(&self) -> &'static str {
        "get_token_data"
    }

    fn description(&self) -> &'static str {
        "Get metadata for a whitelisted token. Reports found=false if the token is not whitelisted."
    }

    fn schema(&self) -> Value {
        let mut schema = chain_id_schema();
        schema["properties"]["address"] = json!({
            "type": "string",
            "description": "Token contract address"
        });
        schema["required"] = json!(["address"]);
        schema
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let chain_id = ctx.chain_id(&args);
        let address = required_str(&args, "address")?;

        Ok(match ctx.tokens.lookup_token(&chain_id, address) {
            Some(token) => json!({ "found": true, "token": token }),
            None => json!({
                "found": false,
                "chain_id": chain_id,
                "address": address,
                "message": "Not found. The token is not whitelisted on this chain."
            }),
        })
    }
}

pub struct GetCryptoContextTool;

#[async_trait::async_trait]
impl Tool for GetCryptoContextTool {
    fn name(&self) -> &'static str {
        "get_crypto_context"
    }

    fn description(&self) -> &'static str {
        "Fetch contract addresses (wrapped native token, Uniswap, Aave), default slippage and gas limit for a chain."
    }

    fn schema(&self) -> Value {
        chain_id_schema()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let context = chains::get_context(&ctx.chain_id(&args))?;
        Ok(serde_json::to_value(context)?)
    }
}
