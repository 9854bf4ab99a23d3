use super::{required_address, required_amount, required_str, Tool, ToolContext};
use crate::contracts::IWrappedNative;
use crate::ethereum::{receipt_summary, TRANSFER_GAS_LIMIT};
use crate::units::parse_units;
use alloy::{primitives::Bytes, sol_types::SolCall};
use anyhow::{anyhow, Result};
use serde_json::{json, Value};

pub struct SendEthTool;

#[async_trait::async_trait]
impl Tool for SendEthTool {
    fn name(&self) -> &'static str {
        "send_eth"
    }

    fn description(&self) -> &'static str {
        "Send the chain's native coin (ETH) from the agent wallet to a recipient address."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient_address": {
                    "type": "string",
                    "description": "The address to send ETH to"
                },
                "amount_eth": {
                    "type": "string",
                    "description": "Amount of ETH to send, in ether (e.g. \"0.1\")"
                },
                "gas_price_gwei": {
                    "type": "number",
                    "description": "Optional gas price in gwei. Defaults to the node's gas price."
                }
            },
            "required": ["recipient_address", "amount_eth"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let recipient = required_address(&args, "recipient_address")?;
        let amount_wei = match args.get("amount_eth") {
            Some(Value::Number(n)) => parse_units(&n.to_string(), 18)?,
            _ => parse_units(required_str(&args, "amount_eth")?, 18)?,
        };
        let gas_price = args
            .get("gas_price_gwei")
            .filter(|v| !v.is_null())
            .map(gwei_to_wei)
            .transpose()?;

        let receipt = ctx
            .client
            .send_transaction(recipient, Bytes::new(), amount_wei, TRANSFER_GAS_LIMIT, gas_price)
            .await?;

        Ok(json!({
            "from": ctx.client.signer_address.to_string(),
            "to": recipient.to_string(),
            "value_wei": amount_wei.to_string(),
            "receipt": receipt_summary(&receipt)
        }))
    }
}

const GWEI_DECIMALS: u8 = 9;

fn gwei_to_wei(value: &Value) -> Result<u128> {
    let gwei = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(anyhow!("Invalid gas_price_gwei: {}", other)),
    };
    let wei = parse_units(&gwei, GWEI_DECIMALS)?;
    u128::try_from(wei).map_err(|_| anyhow!("Invalid gas_price_gwei: {}", gwei))
}

pub struct WrapEthTool;

#[async_trait::async_trait]
impl Tool for WrapEthTool {
    fn name(&self) -> &'static str {
        "wrap_eth"
    }

    fn description(&self) -> &'static str {
        "Wrap the native coin into its ERC20 form (ETH -> WETH, BNB -> WBNB, ...)."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "string",
                    "description": "Amount to wrap, in wei"
                },
                "chain_id": {
                    "type": "string",
                    "description": "Chain id (e.g. \"1\"). Defaults to the configured chain."
                }
            },
            "required": ["amount"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let amount = required_amount(&args, "amount")?;
        let chain = ctx.chain_context(&args).await?;

        let receipt = ctx
            .client
            .send_transaction(
                chain.wrapped_native,
                IWrappedNative::depositCall {}.abi_encode().into(),
                amount,
                chain.gas_limit,
                None,
            )
            .await?;

        Ok(json!({
            "wrapped": chain.wrapped_native_symbol,
            "contract": chain.wrapped_native.to_string(),
            "amount": amount.to_string(),
            "receipt": receipt_summary(&receipt)
        }))
    }
}
