#![allow(dead_code)]

pub mod mock_node;

use async_trait::async_trait;
use based_agent::{
    ethereum::EthereumClient,
    llm::{ChatMessage, ChatModel, CompletionRequest},
    tokens::TokenRegistry,
    tools::ToolContext,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Anvil's first dev account.
pub const DEV_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

pub const TOKENS_JSON: &str = r#"{
    "name": "test list",
    "tokens": {
        "1": {
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48": {
                "chainId": 1,
                "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                "name": "USDCoin",
                "symbol": "USDC",
                "decimals": 6
            }
        },
        "8453": {
            "0x4200000000000000000000000000000000000006": {
                "chainId": 8453,
                "address": "0x4200000000000000000000000000000000000006",
                "name": "Wrapped Ether",
                "symbol": "WETH",
                "decimals": 18
            }
        }
    }
}"#;

/// Context backed by a mainnet client that is never contacted.
pub async fn offline_context() -> ToolContext {
    let client = EthereumClient::new("http://127.0.0.1:1", DEV_PRIVATE_KEY)
        .await
        .expect("client")
        .with_chain_id(1);
    let tokens = TokenRegistry::from_json(TOKENS_JSON).expect("tokens");
    ToolContext::new(client, tokens, "1")
}

/// Context talking to the node at `rpc_url`, defaulting to mainnet.
pub async fn node_context(rpc_url: &str) -> ToolContext {
    let client = EthereumClient::new(rpc_url, DEV_PRIVATE_KEY)
        .await
        .expect("client");
    let tokens = TokenRegistry::from_json(TOKENS_JSON).expect("tokens");
    ToolContext::new(client, tokens, "1")
}

/// Replays canned assistant messages and records every request.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ChatMessage>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<ChatMessage> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}
