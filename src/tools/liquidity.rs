use super::{
    fee_tier, optional_address, parse_amount, required_address, required_amount, Tool,
    ToolContext,
};
use crate::contracts::INonfungiblePositionManager as PositionManager;
use crate::ethereum::receipt_summary;
use alloy::primitives::{Address, U256};
use anyhow::{anyhow, bail, Result};
use serde_json::{json, Value};
use tracing::info;

/// Uniswap V3 tick bounds.
pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

const MINT_GAS_LIMIT: u64 = 3_000_000;
const DEADLINE_SECS: u64 = 600;

/// Tick spacing for the standard fee tiers.
pub fn tick_spacing(fee: u32) -> Option<i32> {
    match fee {
        100 => Some(1),
        500 => Some(10),
        3000 => Some(60),
        10000 => Some(200),
        _ => None,
    }
}

/// Widest tick range usable by a pool with this fee tier.
pub fn full_range_ticks(fee: u32) -> Option<(i32, i32)> {
    let spacing = tick_spacing(fee)?;
    Some(((MIN_TICK / spacing) * spacing, (MAX_TICK / spacing) * spacing))
}

pub struct AddLiquidityTool;

#[async_trait::async_trait]
impl Tool for AddLiquidityTool {
    fn name(&self) -> &'static str {
        "add_v3_liquidity"
    }

    fn description(&self) -> &'static str {
        "Add full-range liquidity to a Uniswap V3 pool through the position manager. Approves both tokens if needed."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token0": { "type": "string", "description": "Address of the first token" },
                "token1": { "type": "string", "description": "Address of the second token" },
                "fee": {
                    "type": "integer",
                    "description": "Pool fee tier (100, 500, 3000, 10000). Default 3000."
                },
                "amount0_desired": { "type": "string", "description": "Amount of token0 to provide (base units)" },
                "amount1_desired": { "type": "string", "description": "Amount of token1 to provide (base units)" },
                "recipient": {
                    "type": "string",
                    "description": "Address receiving the position NFT. Defaults to the agent wallet."
                },
                "deadline": {
                    "type": "integer",
                    "description": "UNIX timestamp deadline. Defaults to 10 minutes after the latest block."
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["token0", "token1", "amount0_desired", "amount1_desired"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let token_a = required_address(&args, "token0")?;
        let token_b = required_address(&args, "token1")?;
        let amount_a = required_amount(&args, "amount0_desired")?;
        let amount_b = required_amount(&args, "amount1_desired")?;
        let recipient = optional_address(&args, "recipient")?.unwrap_or(ctx.client.signer_address);
        let fee = fee_tier(&args)?;
        let (tick_lower, tick_upper) =
            full_range_ticks(fee).ok_or_else(|| anyhow!("Unsupported fee tier: {}", fee))?;
        let ((token0, amount0), (token1, amount1)) = sort_pair((token_a, amount_a), (token_b, amount_b))?;
        let explicit_deadline = parse_amount(&args, "deadline")?;
        let chain = ctx.chain_context(&args).await?;
        let manager = chain.position_manager;

        for (token, amount) in [(token0, amount0), (token1, amount1)] {
            if !amount.is_zero() {
                ctx.client
                    .approve_if_needed(token, manager, amount, chain.gas_limit)
                    .await?;
            }
        }

        let deadline = match explicit_deadline {
            Some(d) => d,
            None => U256::from(ctx.client.latest_timestamp().await? + DEADLINE_SECS),
        };
        info!(%token0, %token1, fee, tick_lower, tick_upper, "Minting liquidity position");

        let receipt = ctx
            .client
            .send_call(
                manager,
                PositionManager::mintCall {
                    params: PositionManager::MintParams {
                        token0,
                        token1,
                        fee,
                        tickLower: tick_lower,
                        tickUpper: tick_upper,
                        amount0Desired: amount0,
                        amount1Desired: amount1,
                        amount0Min: U256::ZERO,
                        amount1Min: U256::ZERO,
                        recipient,
                        deadline,
                    },
                },
                MINT_GAS_LIMIT,
            )
            .await?;

        Ok(json!({
            "position_manager": manager.to_string(),
            "token0": token0.to_string(),
            "token1": token1.to_string(),
            "fee": fee,
            "tick_lower": tick_lower,
            "tick_upper": tick_upper,
            "receipt": receipt_summary(&receipt)
        }))
    }
}

/// Pools order tokens by address; amounts follow their token.
fn sort_pair(a: (Address, U256), b: (Address, U256)) -> Result<((Address, U256), (Address, U256))> {
    if a.0 == b.0 {
        bail!("token0 and token1 must differ");
    }
    Ok(if a.0 < b.0 { (a, b) } else { (b, a) })
}

pub struct RemoveLiquidityTool;

#[async_trait::async_trait]
impl Tool for RemoveLiquidityTool {
    fn name(&self) -> &'static str {
        "remove_v3_liquidity"
    }

    fn description(&self) -> &'static str {
        "Remove liquidity from a Uniswap V3 position and collect the withdrawn tokens."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_id": { "type": "string", "description": "ID of the liquidity position NFT" },
                "liquidity": { "type": "string", "description": "Amount of liquidity to burn" },
                "amount0_min": { "type": "string", "description": "Minimum amount of token0 to receive. Default 0." },
                "amount1_min": { "type": "string", "description": "Minimum amount of token1 to receive. Default 0." },
                "recipient": {
                    "type": "string",
                    "description": "Address receiving the tokens. Defaults to the agent wallet."
                },
                "deadline": {
                    "type": "integer",
                    "description": "UNIX timestamp deadline. Defaults to 10 minutes after the latest block."
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["token_id", "liquidity"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let token_id = required_amount(&args, "token_id")?;
        let liquidity: u128 = required_amount(&args, "liquidity")?
            .try_into()
            .map_err(|_| anyhow!("liquidity exceeds uint128"))?;
        let amount0_min = parse_amount(&args, "amount0_min")?.unwrap_or(U256::ZERO);
        let amount1_min = parse_amount(&args, "amount1_min")?.unwrap_or(U256::ZERO);
        let recipient = optional_address(&args, "recipient")?.unwrap_or(ctx.client.signer_address);
        let explicit_deadline = parse_amount(&args, "deadline")?;
        let chain = ctx.chain_context(&args).await?;
        let manager = chain.position_manager;

        let deadline = match explicit_deadline {
            Some(d) => d,
            None => U256::from(ctx.client.latest_timestamp().await? + DEADLINE_SECS),
        };

        info!(%token_id, liquidity, "Decreasing liquidity");
        let decrease = ctx
            .client
            .send_call(
                manager,
                PositionManager::decreaseLiquidityCall {
                    params: PositionManager::DecreaseLiquidityParams {
                        tokenId: token_id,
                        liquidity,
                        amount0Min: amount0_min,
                        amount1Min: amount1_min,
                        deadline,
                    },
                },
                chain.gas_limit,
            )
            .await?;
        if !decrease.status() {
            bail!("decreaseLiquidity reverted in {}", decrease.transaction_hash);
        }

        let collect = ctx
            .client
            .send_call(
                manager,
                PositionManager::collectCall {
                    params: PositionManager::CollectParams {
                        tokenId: token_id,
                        recipient,
                        amount0Max: u128::MAX,
                        amount1Max: u128::MAX,
                    },
                },
                chain.gas_limit,
            )
            .await?;

        Ok(json!({
            "position_manager": manager.to_string(),
            "token_id": token_id.to_string(),
            "liquidity": liquidity.to_string(),
            "decrease_receipt": receipt_summary(&decrease),
            "collect_receipt": receipt_summary(&collect)
        }))
    }
}
