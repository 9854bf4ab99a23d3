use anyhow::Context;
use based_agent::{
    agent::Agent,
    cli::{self, Mode},
    config::Config,
    ethereum::EthereumClient,
    llm::OpenAiClient,
    server::{self, AppState},
    tokens::TokenRegistry,
    tools::ToolContext,
    transform,
};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "based-agent", about = "LLM agent for EVM chain operations")]
struct CliApp {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the agent in the terminal (prompts for a mode when omitted)
    Run {
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },
    /// Serve the agent over HTTP
    Serve {
        /// Bind address, overrides HTTP_BIND
        #[arg(long)]
        bind: Option<String>,
    },
    /// Group a public token list by chain into the registry file format
    TransformTokens { input: PathBuf, output: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = CliApp::parse();
    match app.command.unwrap_or(Command::Run { mode: None }) {
        Command::TransformTokens { input, output } => {
            transform::transform_token_list(&input, &output)
        }
        Command::Run { mode } => {
            let config = Config::from_env()?;
            let agent = build_agent(&config).await?;
            let mut lines = cli::stdin_lines();

            let mode = match mode {
                Some(m) => m,
                None => match cli::choose_mode(&mut lines).await? {
                    Some(m) => m,
                    None => return Ok(()),
                },
            };
            cli::run_mode(&agent, mode, config.auto_interval, &mut lines).await
        }
        Command::Serve { bind } => {
            let config = Config::from_env()?;
            let agent = build_agent(&config).await?;
            let bind = bind.unwrap_or_else(|| config.http_bind.clone());
            server::run(Arc::new(AppState::new(agent)), &bind).await
        }
    }
}

async fn build_agent(config: &Config) -> anyhow::Result<Agent> {
    info!("Starting Based Agent...");

    let client = EthereumClient::new(&config.rpc_url, &config.private_key).await?;
    let chain_id = client.chain_id().await?;
    info!(wallet = %client.signer_address, rpc = %config.rpc_url, chain_id, "Wallet loaded");
    if config.default_chain_id != chain_id.to_string() {
        warn!(
            default_chain_id = %config.default_chain_id,
            chain_id,
            "DEFAULT_CHAIN_ID does not match the RPC node; transactions for it will be refused"
        );
    }

    let tokens = TokenRegistry::load(&config.tokens_path)
        .with_context(|| format!("Failed to load token registry from {}", config.tokens_path))?;
    let ctx = ToolContext::new(client, tokens, config.default_chain_id.clone());

    let model = OpenAiClient::new(&config.openai_base_url, config.require_openai_api_key()?)?;
    Ok(Agent::new(Arc::new(model), config.model.clone(), ctx))
}
