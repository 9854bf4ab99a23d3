//! Interactive front end: mode selection, chat REPL and autonomous loop.

use crate::agent::{Agent, AUTONOMOUS_THOUGHT};
use crate::llm::{ChatMessage, MessageRole};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Interactive chat
    Chat,
    /// Autonomous actions on a timer
    Auto,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "chat" => Ok(Mode::Chat),
            "2" | "auto" => Ok(Mode::Auto),
            other => Err(format!("Invalid choice: {other}")),
        }
    }
}

pub type StdinLines = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> StdinLines {
    BufReader::new(tokio::io::stdin()).lines()
}

fn prompt(text: &str) {
    print!("{text}");
    std::io::stdout().flush().ok();
}

/// Ask until a valid mode is entered. `None` when stdin closes.
pub async fn choose_mode(lines: &mut StdinLines) -> Result<Option<Mode>> {
    loop {
        println!("\nAvailable modes:");
        println!("1. chat    - Interactive chat mode");
        println!("2. auto    - Autonomous action mode");
        prompt("\nChoose a mode (enter number or name): ");

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match line.parse::<Mode>() {
            Ok(mode) => return Ok(Some(mode)),
            Err(_) => println!("Invalid choice. Please try again."),
        }
    }
}

pub async fn run_mode(
    agent: &Agent,
    mode: Mode,
    interval: Duration,
    lines: &mut StdinLines,
) -> Result<()> {
    println!("\nStarting {} mode...", format!("{mode:?}").to_lowercase());
    match mode {
        Mode::Chat => run_chat_loop(agent, lines).await,
        Mode::Auto => run_autonomous_loop(agent, interval).await,
    }
}

pub async fn run_chat_loop(agent: &Agent, lines: &mut StdinLines) -> Result<()> {
    let mut history: Vec<ChatMessage> = Vec::new();

    println!("Starting {} chat. Ctrl-C or EOF to exit.", agent.name());
    loop {
        prompt(&format!("{}: ", "User".dimmed()));
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let mut pending = history.clone();
        pending.push(ChatMessage::user(line));
        match agent.run(&pending).await {
            Ok(response) => {
                print_messages(&response);
                pending.extend(response);
                history = pending;
            }
            Err(e) => {
                error!("Agent run failed: {:#}", e);
                println!("{} {:#}", "Error:".red(), e);
            }
        }
    }
}

pub async fn run_autonomous_loop(agent: &Agent, interval: Duration) -> Result<()> {
    let mut history: Vec<ChatMessage> = Vec::new();
    println!("Starting autonomous {} loop...", agent.name());

    loop {
        history.push(ChatMessage::user(AUTONOMOUS_THOUGHT));
        println!("\n{} {}", "Agent's Thought:".dimmed(), AUTONOMOUS_THOUGHT);

        match agent.run(&history).await {
            Ok(response) => {
                print_messages(&response);
                history.extend(response);
            }
            Err(e) => {
                // Drop the unanswered thought so the history stays well-formed.
                history.pop();
                error!("Agent run failed: {:#}", e);
                println!("{} {:#}", "Error:".red(), e);
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// Assistant text in blue, tool calls in purple.
pub fn print_messages(messages: &[ChatMessage]) {
    for line in render_messages(messages) {
        println!("{line}");
    }
}

fn render_messages(messages: &[ChatMessage]) -> Vec<String> {
    let mut out = Vec::new();
    for message in messages.iter().filter(|m| m.role == MessageRole::Assistant) {
        let sender = message.name.as_deref().unwrap_or("assistant");

        if let Some(content) = message.content.as_deref().filter(|c| !c.is_empty()) {
            out.push(format!("{}: {}", sender.blue(), content));
        }

        for call in &message.tool_calls {
            let args = serde_json::from_str::<serde_json::Value>(&call.function.arguments)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .map(|obj| {
                    obj.iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_else(|| call.function.arguments.clone());
            out.push(format!("{}: {}({})", sender.blue(), call.function.name.magenta(), args));
        }
    }
    out
}
