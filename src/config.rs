use anyhow::Context;
use std::env;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TOKENS_PATH: &str = "tokens.json";
pub const DEFAULT_CHAIN_ID: &str = "1";
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8000";
const DEFAULT_AUTO_INTERVAL_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub tokens_path: String,
    pub default_chain_id: String,
    pub auto_interval: Duration,
    pub http_bind: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let private_key = env::var("PRIVATE_KEY").context("PRIVATE_KEY must be set")?;
        let auto_interval_secs = match env::var("AUTO_INTERVAL_SECS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("AUTO_INTERVAL_SECS is not a number: {v}"))?,
            Err(_) => DEFAULT_AUTO_INTERVAL_SECS,
        };

        Ok(Self {
            rpc_url: var_or("ETHEREUM_RPC_URL", DEFAULT_RPC_URL),
            private_key,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_base_url: var_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: var_or("OPENAI_MODEL", DEFAULT_MODEL),
            tokens_path: var_or("TOKENS_PATH", DEFAULT_TOKENS_PATH),
            default_chain_id: var_or("DEFAULT_CHAIN_ID", DEFAULT_CHAIN_ID),
            auto_interval: Duration::from_secs(auto_interval_secs),
            http_bind: var_or("HTTP_BIND", DEFAULT_HTTP_BIND),
        })
    }

    /// The LLM key is only needed once an agent is built.
    pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY must be set")
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
