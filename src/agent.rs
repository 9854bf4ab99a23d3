use crate::llm::{ChatMessage, ChatModel, CompletionRequest, ToolCall, ToolDefinition};
use crate::tools::{ToolContext, ToolSet};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const AGENT_NAME: &str = "Based Agent";
const DEFAULT_MAX_TURNS: usize = 10;

/// Instruction sent on every tick of autonomous mode.
pub const AUTONOMOUS_THOUGHT: &str = "Be creative and do something interesting on the blockchain. \
Don't take any more input from me. Choose an action and execute it now. \
Choose those that highlight your identity and abilities best.";

fn instructions(wallet: &str) -> String {
    format!(
        "You are a helpful agent we are debugging on a forked EVM chain so don't worry about mistakes or errors. \
         We are learning. You can send ETH, wrap ETH, swap tokens, add & remove liquidity for a Uniswap V3 pool, \
         and supply & withdraw assets for lending in Aave. Use get_crypto_context for contract addresses and \
         search_tokens / get_token_data to find whitelisted tokens. Amounts are in base units unless a tool says otherwise. \
         If you ever need to know your address, it is {wallet}. If you can't find an address or setting there, ask."
    )
}

/// Tool-calling loop over a chat model.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    model_name: String,
    tools: ToolSet,
    ctx: ToolContext,
    max_turns: usize,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, model_name: impl Into<String>, ctx: ToolContext) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            tools: ToolSet::standard(),
            ctx,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn name(&self) -> &'static str {
        AGENT_NAME
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::function(t.name(), t.description(), t.schema()))
            .collect()
    }

    /// Continue the conversation in `history` and return only the messages
    /// produced by this run. The caller owns the history.
    pub async fn run(&self, history: &[ChatMessage]) -> Result<Vec<ChatMessage>> {
        let system = ChatMessage::system(instructions(&self.ctx.client.signer_address.to_string()));
        let tools = self.tool_definitions();
        let mut produced: Vec<ChatMessage> = Vec::new();

        for turn in 0..self.max_turns {
            let mut messages = Vec::with_capacity(history.len() + produced.len() + 1);
            messages.push(system.clone());
            messages.extend_from_slice(history);
            messages.extend(produced.iter().cloned());

            let request = CompletionRequest {
                model: self.model_name.clone(),
                messages,
                tools: tools.clone(),
            };

            let mut reply = self.model.complete(&request).await?;
            reply.name = Some(AGENT_NAME.to_string());
            let calls = reply.tool_calls.clone();
            produced.push(reply);

            if calls.is_empty() {
                debug!(turn, "Agent finished without tool calls");
                return Ok(produced);
            }

            for call in &calls {
                let output = self.execute(call).await?;
                produced.push(ChatMessage::tool(call, output));
            }
        }

        warn!(max_turns = self.max_turns, "Agent stopped at turn limit");
        Ok(produced)
    }

    async fn execute(&self, call: &ToolCall) -> Result<String> {
        let name = call.function.name.as_str();
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "Model requested an unknown tool");
            return Ok(format!("Error: Tool {name} not found."));
        };

        let args: Value = if call.function.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&call.function.arguments)
                .with_context(|| format!("Invalid arguments for {name}: {}", call.function.arguments))?
        };

        info!(tool = name, %args, "Calling tool");
        let result = tool
            .call(&self.ctx, args)
            .await
            .with_context(|| format!("Tool {name} failed"))?;
        Ok(serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string()))
    }
}
