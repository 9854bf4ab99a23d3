mod common;

use alloy::{
    consensus::TxLegacy,
    primitives::{Address, TxKind, U256},
    sol_types::SolCall,
};
use based_agent::{
    chains,
    contracts::{IERC20, ILendingPool, INonfungiblePositionManager, ISwapRouter, IWrappedNative},
    error::ChainContextError,
    tools::{
        lending::{SupplyAssetTool, WithdrawAssetTool},
        liquidity::{AddLiquidityTool, RemoveLiquidityTool},
        swap::SwapTokensTool,
        transfer::{SendEthTool, WrapEthTool},
        Tool,
    },
};
use common::mock_node::{MockNode, BLOCK_TIMESTAMP};
use common::{node_context, DEV_ADDRESS, USDC};
use serde_json::json;

const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn target(tx: &TxLegacy) -> Address {
    match tx.to {
        TxKind::Call(to) => to,
        TxKind::Create => panic!("unexpected contract creation"),
    }
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_wrap_refuses_chain_other_than_node() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;

    let err = WrapEthTool
        .call(&ctx, json!({ "amount": "1000000000000000000", "chain_id": "8453" }))
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ChainContextError>(),
        Some(&ChainContextError::WrongNetwork {
            requested: "8453".into(),
            connected: 1
        })
    );
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_default_chain_must_match_node() {
    // Node on Base, agent configured for mainnet.
    let node = MockNode::start(8453, U256::MAX).await;
    let ctx = node_context(&node.url).await;

    let supply = SupplyAssetTool
        .call(&ctx, json!({ "asset": USDC, "amount": "1000" }))
        .await;
    let mint = AddLiquidityTool
        .call(
            &ctx,
            json!({
                "token0": USDC,
                "token1": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
                "amount0_desired": "1",
                "amount1_desired": "1"
            }),
        )
        .await;

    assert!(supply.unwrap_err().to_string().contains("node is on chain 8453"));
    assert!(mint.is_err());
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
    // Fetched once, then cached.
    assert_eq!(node.count("eth_chainId"), 1);
}

#[tokio::test]
async fn test_send_eth() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;

    let result = SendEthTool
        .call(
            &ctx,
            json!({ "recipient_address": RECIPIENT, "amount_eth": "0.5", "gas_price_gwei": 2 }),
        )
        .await
        .unwrap();

    assert_eq!(result["value_wei"], "500000000000000000");
    assert_eq!(result["receipt"]["status"], "success");

    let txs = node.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(target(&txs[0]), addr(RECIPIENT));
    assert_eq!(txs[0].value, U256::from(500_000_000_000_000_000u64));
    assert_eq!(txs[0].gas_limit, 21_000);
    assert_eq!(txs[0].gas_price, 2_000_000_000);
    assert_eq!(txs[0].chain_id, Some(1));
    assert!(txs[0].input.is_empty());
}

#[tokio::test]
async fn test_wrap_eth_deposits_into_wrapped_native() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let mainnet = chains::get_context("1").unwrap();

    let result = WrapEthTool
        .call(&ctx, json!({ "amount": "1000" }))
        .await
        .unwrap();
    assert_eq!(result["wrapped"], "WETH");

    let txs = node.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(target(&txs[0]), mainnet.wrapped_native);
    assert_eq!(txs[0].value, U256::from(1000u64));
    assert_eq!(txs[0].input.as_ref(), IWrappedNative::depositCall::SELECTOR.as_slice());
    assert_eq!(txs[0].gas_limit, u128::from(mainnet.gas_limit));
}

#[tokio::test]
async fn test_swap_approves_router_before_swapping() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let mainnet = chains::get_context("1").unwrap();

    let result = SwapTokensTool
        .call(
            &ctx,
            json!({
                "token_in": USDC,
                "token_out": mainnet.wrapped_native.to_string(),
                "amount_in": "1000000",
                "fee": 500
            }),
        )
        .await
        .unwrap();
    assert!(!result["approval"].is_null());

    let txs = node.transactions();
    assert_eq!(txs.len(), 2);

    assert_eq!(target(&txs[0]), addr(USDC));
    let approve = IERC20::approveCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(approve.spender, mainnet.universal_router);
    assert_eq!(approve.amount, U256::from(1_000_000u64));

    assert_eq!(target(&txs[1]), mainnet.universal_router);
    assert_eq!(txs[1].value, U256::ZERO);
    let swap = ISwapRouter::exactInputSingleCall::abi_decode(&txs[1].input, true).unwrap();
    assert_eq!(swap.params.tokenIn, addr(USDC));
    assert_eq!(swap.params.tokenOut, mainnet.wrapped_native);
    assert_eq!(swap.params.fee, 500);
    assert_eq!(swap.params.recipient, addr(DEV_ADDRESS));
}

#[tokio::test]
async fn test_swap_skips_approval_with_enough_allowance() {
    let node = MockNode::start(1, U256::MAX).await;
    let ctx = node_context(&node.url).await;

    let result = SwapTokensTool
        .call(&ctx, json!({ "token_in": USDC, "amount_in": "1000000" }))
        .await
        .unwrap();

    assert!(result["approval"].is_null());
    assert_eq!(node.transactions().len(), 1);
}

#[tokio::test]
async fn test_native_swap_attaches_value_without_approval() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let mainnet = chains::get_context("1").unwrap();

    SwapTokensTool
        .call(&ctx, json!({ "token_out": USDC, "amount_in": "5000" }))
        .await
        .unwrap();

    assert_eq!(node.count("eth_call"), 0);
    let txs = node.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(target(&txs[0]), mainnet.universal_router);
    assert_eq!(txs[0].value, U256::from(5000u64));
    let swap = ISwapRouter::exactInputSingleCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(swap.params.tokenIn, mainnet.wrapped_native);
}

#[tokio::test]
async fn test_swap_rejects_bad_input_before_network() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;

    let same_legs = SwapTokensTool
        .call(&ctx, json!({ "token_in": USDC, "token_out": USDC, "amount_in": "1" }))
        .await;
    let native_to_native = SwapTokensTool.call(&ctx, json!({ "amount_in": "1" })).await;
    let bad_fee = SwapTokensTool
        .call(&ctx, json!({ "token_in": USDC, "amount_in": "1", "fee": 0x1000_0BB8u64 }))
        .await;

    assert!(same_legs.is_err());
    assert!(native_to_native.is_err());
    assert!(bad_fee.unwrap_err().to_string().contains("Invalid fee tier"));
    assert_eq!(node.count("eth_chainId"), 0);
    assert_eq!(node.count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_add_liquidity_mints_full_range_position() {
    let node = MockNode::start(1, U256::MAX).await;
    let ctx = node_context(&node.url).await;
    let mainnet = chains::get_context("1").unwrap();

    // WETH given first; the pool orders USDC first.
    let result = AddLiquidityTool
        .call(
            &ctx,
            json!({
                "token0": mainnet.wrapped_native.to_string(),
                "token1": USDC,
                "amount0_desired": "1000000000000000000",
                "amount1_desired": "2000000000"
            }),
        )
        .await
        .unwrap();
    assert_eq!(result["tick_lower"], -887_220);

    let txs = node.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(target(&txs[0]), mainnet.position_manager);
    assert_eq!(txs[0].gas_limit, 3_000_000);

    let mint = INonfungiblePositionManager::mintCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(mint.params.token0, addr(USDC));
    assert_eq!(mint.params.amount0Desired, U256::from(2_000_000_000u64));
    assert_eq!(mint.params.token1, mainnet.wrapped_native);
    assert_eq!(mint.params.tickLower, -887_220);
    assert_eq!(mint.params.tickUpper, 887_220);
    assert_eq!(mint.params.deadline, U256::from(BLOCK_TIMESTAMP + 600));
}

#[tokio::test]
async fn test_remove_liquidity_decreases_then_collects() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let mainnet = chains::get_context("1").unwrap();

    RemoveLiquidityTool
        .call(
            &ctx,
            json!({ "token_id": "42", "liquidity": "1000", "deadline": 1_800_000_000u64 }),
        )
        .await
        .unwrap();

    let txs = node.transactions();
    assert_eq!(txs.len(), 2);
    assert!(txs.iter().all(|tx| target(tx) == mainnet.position_manager));

    let decrease =
        INonfungiblePositionManager::decreaseLiquidityCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(decrease.params.tokenId, U256::from(42u64));
    assert_eq!(decrease.params.liquidity, 1000);
    assert_eq!(decrease.params.deadline, U256::from(1_800_000_000u64));

    let collect = INonfungiblePositionManager::collectCall::abi_decode(&txs[1].input, true).unwrap();
    assert_eq!(collect.params.tokenId, U256::from(42u64));
    assert_eq!(collect.params.recipient, addr(DEV_ADDRESS));
    assert_eq!(collect.params.amount0Max, u128::MAX);
    assert_eq!(collect.params.amount1Max, u128::MAX);
}

#[tokio::test]
async fn test_supply_approves_pool_then_supplies() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let pool = chains::get_context("1").unwrap().lending_pool;

    SupplyAssetTool
        .call(&ctx, json!({ "asset": USDC, "amount": "250" }))
        .await
        .unwrap();

    let txs = node.transactions();
    assert_eq!(txs.len(), 2);

    let approve = IERC20::approveCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(target(&txs[0]), addr(USDC));
    assert_eq!(approve.spender, pool);

    let supply = ILendingPool::supplyCall::abi_decode(&txs[1].input, true).unwrap();
    assert_eq!(target(&txs[1]), pool);
    assert_eq!(supply.asset, addr(USDC));
    assert_eq!(supply.amount, U256::from(250u64));
    assert_eq!(supply.onBehalfOf, addr(DEV_ADDRESS));
    assert_eq!(supply.referralCode, 0);
}

#[tokio::test]
async fn test_withdraw_max_reaches_pool() {
    let node = MockNode::start(1, U256::ZERO).await;
    let ctx = node_context(&node.url).await;
    let pool = chains::get_context("1").unwrap().lending_pool;

    WithdrawAssetTool
        .call(&ctx, json!({ "asset": USDC, "amount": "max" }))
        .await
        .unwrap();

    let txs = node.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(target(&txs[0]), pool);
    let withdraw = ILendingPool::withdrawCall::abi_decode(&txs[0].input, true).unwrap();
    assert_eq!(withdraw.amount, U256::MAX);
    assert_eq!(withdraw.to, addr(DEV_ADDRESS));
}

#[tokio::test]
#[ignore = "requires the anvil binary"]
async fn test_send_eth_on_anvil() {
    use alloy::node_bindings::Anvil;
    use based_agent::tools::balance::GetEthBalanceTool;

    let anvil = Anvil::new().try_spawn().expect("anvil");
    let ctx = node_context(&anvil.endpoint()).await;

    // Anvil runs as chain 31337; plain transfers need no chain context.
    let result = SendEthTool
        .call(&ctx, json!({ "recipient_address": RECIPIENT, "amount_eth": "1" }))
        .await
        .unwrap();
    assert_eq!(result["receipt"]["status"], "success");

    let balance = GetEthBalanceTool
        .call(&ctx, json!({ "address": RECIPIENT }))
        .await
        .unwrap();
    assert_eq!(balance["balance"], "10001");

    let err = WrapEthTool
        .call(&ctx, json!({ "amount": "1" }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("node is on chain 31337"));
}
