use super::{
    fee_tier, optional_address, parse_amount, required_amount, Tool, ToolContext,
};
use crate::contracts::ISwapRouter;
use crate::ethereum::receipt_summary;
use alloy::{
    primitives::{Address, U256},
    sol_types::SolCall,
};
use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

pub struct SwapTokensTool;

#[async_trait::async_trait]
impl Tool for SwapTokensTool {
    fn name(&self) -> &'static str {
        "swap_tokens"
    }

    fn description(&self) -> &'static str {
        "Swap tokens through the chain's Uniswap router (exactInputSingle). Approves the router first when the allowance is too low."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_in": {
                    "type": "string",
                    "description": "Address of the token to sell. Omit to sell the native coin."
                },
                "token_out": {
                    "type": "string",
                    "description": "Address of the token to buy. Omit to receive the wrapped native coin."
                },
                "amount_in": {
                    "type": "string",
                    "description": "Amount of token_in to sell (in base units)"
                },
                "recipient": {
                    "type": "string",
                    "description": "Address receiving the output tokens. Defaults to the agent wallet."
                },
                "amount_out_minimum": {
                    "type": "string",
                    "description": "Minimum acceptable output (in base units). Default 0."
                },
                "fee": {
                    "type": "integer",
                    "description": "Pool fee tier (e.g., 500, 3000, 10000). Default 3000."
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["amount_in"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let token_in = optional_address(&args, "token_in")?;
        let token_out = optional_address(&args, "token_out")?;
        let amount_in = required_amount(&args, "amount_in")?;
        let recipient = optional_address(&args, "recipient")?.unwrap_or(ctx.client.signer_address);
        let amount_out_min = parse_amount(&args, "amount_out_minimum")?.unwrap_or(U256::ZERO);
        let fee = fee_tier(&args)?;
        let chain = ctx.requested_context(&args)?;
        let router = chain.universal_router;

        let plan = SwapPlan::new(token_in, token_out, amount_in, chain.wrapped_native)?;
        ctx.ensure_network(&chain).await?;
        info!(
            token_in = %plan.token_in,
            token_out = %plan.token_out,
            %amount_in,
            fee,
            chain_id = chain.chain_id,
            "Swapping"
        );

        let approval = if plan.needs_approval {
            ctx.client
                .approve_if_needed(plan.token_in, router, amount_in, chain.gas_limit)
                .await?
        } else {
            None
        };

        let call_data = ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: plan.token_in,
                tokenOut: plan.token_out,
                fee,
                recipient,
                amountIn: amount_in,
                amountOutMinimum: amount_out_min,
                sqrtPriceLimitX96: Default::default(),
            },
        }
        .abi_encode();

        let receipt = ctx
            .client
            .send_transaction(router, call_data.into(), plan.value, chain.gas_limit, None)
            .await;

        let receipt = match receipt {
            Ok(r) => r,
            Err(e) => {
                if approval.is_some() {
                    warn!(token = %plan.token_in, spender = %router, "Swap failed after approval; allowance left in place");
                }
                return Err(e);
            }
        };
        if !receipt.status() && approval.is_some() {
            warn!(token = %plan.token_in, spender = %router, "Swap reverted after approval; allowance left in place");
        }

        Ok(json!({
            "router": router.to_string(),
            "token_in": plan.token_in.to_string(),
            "token_out": plan.token_out.to_string(),
            "amount_in": amount_in.to_string(),
            "minimum_output": amount_out_min.to_string(),
            "fee": fee,
            "approval": approval.as_ref().map(receipt_summary),
            "receipt": receipt_summary(&receipt)
        }))
    }
}

/// Resolved swap legs. A missing side means the native coin, which the
/// router handles through the wrapped-native contract.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SwapPlan {
    token_in: Address,
    token_out: Address,
    value: U256,
    needs_approval: bool,
}

impl SwapPlan {
    fn new(
        token_in: Option<Address>,
        token_out: Option<Address>,
        amount_in: U256,
        wrapped_native: Address,
    ) -> Result<Self> {
        let plan = match token_in {
            Some(token) => Self {
                token_in: token,
                token_out: token_out.unwrap_or(wrapped_native),
                value: U256::ZERO,
                needs_approval: true,
            },
            None => Self {
                token_in: wrapped_native,
                token_out: token_out.unwrap_or(wrapped_native),
                value: amount_in,
                needs_approval: false,
            },
        };
        if plan.token_in == plan.token_out {
            bail!("token_in and token_out must differ (both resolve to {})", plan.token_in);
        }
        Ok(plan)
    }
}
