use crate::contracts::IERC20;
use alloy::{
    eips::BlockNumberOrTag,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::eth::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

/// Gas for a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

#[derive(Clone)]
pub struct EthereumClient {
    pub provider: alloy::providers::RootProvider<
        alloy::transports::http::Http<alloy::transports::http::Client>,
    >,
    pub wallet: EthereumWallet,
    pub signer_address: Address,
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Builds the provider without touching the network.
    pub async fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key).context("Invalid PRIVATE_KEY")?;
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {rpc_url}"))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self {
            provider,
            wallet,
            signer_address,
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    /// Pin the chain id instead of asking the node for it.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Arc::new(OnceCell::new_with(Some(chain_id)));
        self
    }

    /// Chain id reported by the node. Fetched once, then cached.
    pub async fn chain_id(&self) -> Result<u64> {
        let chain_id = self
            .chain_id
            .get_or_try_init(|| async {
                self.provider
                    .get_chain_id()
                    .await
                    .context("Failed to fetch chain id from the RPC node")
            })
            .await?;
        Ok(*chain_id)
    }

    /// Read-only `eth_call` of an encoded contract call, decoded into its return type.
    pub async fn call<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return> {
        let tx_req = TransactionRequest::default()
            .to(to)
            .input(call.abi_encode().into());
        let result = self.provider.call(&tx_req).await?;
        Ok(C::abi_decode_returns(&result, true)?)
    }

    /// Sign and submit a legacy transaction from the agent wallet, then block
    /// until the receipt is available.
    pub async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
        gas_limit: u64,
        gas_price: Option<u128>,
    ) -> Result<TransactionReceipt> {
        let nonce = self.provider.get_transaction_count(self.signer_address).await?;
        let gas_price = match gas_price {
            Some(p) => p,
            None => self.provider.get_gas_price().await?,
        };
        let chain_id = self.chain_id().await?;

        debug!(
            %to,
            %value,
            nonce,
            gas_limit,
            gas_price,
            data = %hex::encode(&data),
            "Submitting transaction"
        );

        let tx = TransactionRequest::default()
            .from(self.signer_address)
            .to(to)
            .input(data.into())
            .with_value(value)
            .with_nonce(nonce)
            .with_gas_limit(u128::from(gas_limit))
            .with_gas_price(gas_price)
            .with_chain_id(chain_id);

        let envelope = tx
            .build(&self.wallet)
            .await
            .context("Failed to sign transaction")?;
        let pending = self.provider.send_tx_envelope(envelope).await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "Transaction sent, waiting for receipt");

        let receipt = pending
            .get_receipt()
            .await
            .with_context(|| format!("Failed waiting for receipt of {tx_hash}"))?;
        info!(%tx_hash, status = receipt.status(), "Transaction mined");
        Ok(receipt)
    }

    /// Submit an encoded contract call with no value attached.
    pub async fn send_call<C: SolCall>(
        &self,
        to: Address,
        call: C,
        gas_limit: u64,
    ) -> Result<TransactionReceipt> {
        self.send_transaction(to, call.abi_encode().into(), U256::ZERO, gas_limit, None)
            .await
    }

    /// Approve `spender` for `amount` of `token` if the current allowance is short.
    /// Returns the approval receipt when one was needed.
    pub async fn approve_if_needed(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<Option<TransactionReceipt>> {
        let allowance = self
            .call(
                token,
                IERC20::allowanceCall {
                    owner: self.signer_address,
                    spender,
                },
            )
            .await?
            ._0;
        debug!(%token, %spender, %allowance, "Current allowance");

        if allowance >= amount {
            return Ok(None);
        }

        info!(%token, %spender, %amount, "Approving token");
        let receipt = self
            .send_call(token, IERC20::approveCall { spender, amount }, gas_limit)
            .await?;
        if !receipt.status() {
            anyhow::bail!("Approval of {} for {} reverted", token, spender);
        }
        Ok(Some(receipt))
    }

    pub async fn latest_timestamp(&self) -> Result<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest, false)
            .await?
            .context("Latest block not available")?;
        Ok(block.header.timestamp)
    }
}

/// Compact JSON view of a receipt for tool results.
pub fn receipt_summary(receipt: &TransactionReceipt) -> Value {
    json!({
        "transaction_hash": receipt.transaction_hash.to_string(),
        "status": if receipt.status() { "success" } else { "reverted" },
        "block_number": receipt.block_number,
        "gas_used": receipt.gas_used.to_string(),
    })
}
