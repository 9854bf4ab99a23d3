//! Per-chain contract addresses and default parameters for on-chain calls.

use crate::error::ChainContextError;
use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Default slippage tolerance, in percent.
pub const DEFAULT_SLIPPAGE_PERCENT: Decimal = dec!(0.5);

/// Default gas limit for contract calls.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

const SUPPORTED_CHAINS: [&str; 6] = ["1", "10", "56", "137", "8453", "42161"];

// Uniswap deploys these at the same address on most chains.
const UNISWAP_POSITION_MANAGER: Address = address!("C36442b4a4522E871399CD717aBDD847Ab11FE88");
const UNISWAP_FACTORY: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");
const OP_STACK_WETH: Address = address!("4200000000000000000000000000000000000006");
const AAVE_L2_POOL: Address = address!("794a61358D6845594F94dc1DB02A252b5b4814aD");

/// Everything needed to target a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainContext {
    pub chain_id: &'static str,
    pub wrapped_native_symbol: &'static str,
    pub wrapped_native: Address,
    pub position_manager: Address,
    pub universal_router: Address,
    pub factory: Address,
    pub lending_pool: Address,
    pub slippage_percent: Decimal,
    pub gas_limit: u64,
}

/// Chain ids with a known context, in ascending order.
pub fn supported_chains() -> &'static [&'static str] {
    &SUPPORTED_CHAINS
}

pub fn get_context(chain_id: &str) -> Result<ChainContext, ChainContextError> {
    let (chain_id, wrapped_native_symbol, wrapped_native, position_manager, universal_router, factory, lending_pool) =
        match chain_id {
            "1" => (
                "1",
                "WETH",
                address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                UNISWAP_POSITION_MANAGER,
                address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45"),
                UNISWAP_FACTORY,
                address!("87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2"),
            ),
            "10" => (
                "10",
                "WETH",
                OP_STACK_WETH,
                UNISWAP_POSITION_MANAGER,
                address!("Cb1355ff08Ab38bBCE60111F1bb2B784bE25D7e8"),
                UNISWAP_FACTORY,
                AAVE_L2_POOL,
            ),
            "56" => (
                "56",
                "WBNB",
                address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                address!("7b8A01B39D58278b5DE7e48c8449c9f4F5170613"),
                address!("4Dae2f939ACf50408e13d58534Ff8c2776d45265"),
                address!("dB1d10011AD0Ff90774D0C6Bb92e5C5c8b4461F7"),
                address!("6807dc923806fE8Fd134338EABCA509979a7e0cB"),
            ),
            "137" => (
                "137",
                "WMATIC",
                address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                UNISWAP_POSITION_MANAGER,
                address!("ec7BE89e9d109e7e3Fec59c222CF297125FEFda2"),
                UNISWAP_FACTORY,
                AAVE_L2_POOL,
            ),
            "8453" => (
                "8453",
                "WETH",
                OP_STACK_WETH,
                address!("03a520b32C04BF3bEEf7BEb72E919cf822Ed34f1"),
                address!("3fC91A3afd70395Cd496C647d5a6CC9D4B2b7FAD"),
                address!("33128a8fC17869897dcE68Ed026d694621f6FDfD"),
                address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"),
            ),
            "42161" => (
                "42161",
                "WETH",
                address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                UNISWAP_POSITION_MANAGER,
                address!("5E325eDA8064b456f4781070C0738d849c824258"),
                UNISWAP_FACTORY,
                AAVE_L2_POOL,
            ),
            other => return Err(ChainContextError::UnsupportedChain(other.to_string())),
        };

    Ok(ChainContext {
        chain_id,
        wrapped_native_symbol,
        wrapped_native,
        position_manager,
        universal_router,
        factory,
        lending_pool,
        slippage_percent: DEFAULT_SLIPPAGE_PERCENT,
        gas_limit: DEFAULT_GAS_LIMIT,
    })
}
