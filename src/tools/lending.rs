use super::{optional_address, required_address, required_amount, Tool, ToolContext};
use crate::contracts::ILendingPool;
use crate::ethereum::receipt_summary;
use alloy::primitives::{Address, U256};
use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

/// Pool address and gas limit, resolved once per call.
async fn lending_target(ctx: &ToolContext, args: &Value) -> Result<(Address, u64)> {
    let pool_override = optional_address(args, "lending_pool_address")?;
    let chain = ctx.chain_context(args).await?;
    Ok((pool_override.unwrap_or(chain.lending_pool), chain.gas_limit))
}

pub struct SupplyAssetTool;

#[async_trait::async_trait]
impl Tool for SupplyAssetTool {
    fn name(&self) -> &'static str {
        "supply_asset"
    }

    fn description(&self) -> &'static str {
        "Supply an ERC20 asset to the Aave lending pool to earn interest. Approves the pool first."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "asset": { "type": "string", "description": "Address of the ERC20 token to supply" },
                "amount": { "type": "string", "description": "Amount to supply (base units)" },
                "on_behalf_of": {
                    "type": "string",
                    "description": "Address credited with the deposit. Defaults to the agent wallet."
                },
                "lending_pool_address": {
                    "type": "string",
                    "description": "Aave pool address. Defaults to the chain's known pool."
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["asset", "amount"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let asset = required_address(&args, "asset")?;
        let amount = required_amount(&args, "amount")?;
        let on_behalf_of = optional_address(&args, "on_behalf_of")?.unwrap_or(ctx.client.signer_address);
        let (pool, gas_limit) = lending_target(ctx, &args).await?;

        ctx.client
            .approve_if_needed(asset, pool, amount, gas_limit)
            .await?;

        info!(%asset, %amount, %pool, "Supplying asset");
        let receipt = ctx
            .client
            .send_call(
                pool,
                ILendingPool::supplyCall {
                    asset,
                    amount,
                    onBehalfOf: on_behalf_of,
                    referralCode: 0,
                },
                gas_limit,
            )
            .await?;

        Ok(json!({
            "lending_pool": pool.to_string(),
            "asset": asset.to_string(),
            "amount": amount.to_string(),
            "on_behalf_of": on_behalf_of.to_string(),
            "receipt": receipt_summary(&receipt)
        }))
    }
}

pub struct WithdrawAssetTool;

#[async_trait::async_trait]
impl Tool for WithdrawAssetTool {
    fn name(&self) -> &'static str {
        "withdraw_asset"
    }

    fn description(&self) -> &'static str {
        "Withdraw a supplied asset from the Aave lending pool back to the agent wallet."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "asset": { "type": "string", "description": "Address of the ERC20 token to withdraw" },
                "amount": {
                    "type": "string",
                    "description": "Amount to withdraw (base units), or \"max\" for the full balance"
                },
                "lending_pool_address": {
                    "type": "string",
                    "description": "Aave pool address. Defaults to the chain's known pool."
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["asset", "amount"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let asset = required_address(&args, "asset")?;
        let amount = withdraw_amount(&args)?;
        let (pool, gas_limit) = lending_target(ctx, &args).await?;

        info!(%asset, %amount, %pool, "Withdrawing asset");
        let receipt = ctx
            .client
            .send_call(
                pool,
                ILendingPool::withdrawCall {
                    asset,
                    amount,
                    to: ctx.client.signer_address,
                },
                gas_limit,
            )
            .await?;

        Ok(json!({
            "lending_pool": pool.to_string(),
            "asset": asset.to_string(),
            "amount": amount.to_string(),
            "receipt": receipt_summary(&receipt)
        }))
    }
}

fn withdraw_amount(args: &Value) -> Result<U256> {
    match args.get("amount").and_then(Value::as_str) {
        Some(s) if s.trim().eq_ignore_ascii_case("max") => Ok(U256::MAX),
        _ => required_amount(args, "amount"),
    }
}
