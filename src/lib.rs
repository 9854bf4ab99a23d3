pub mod agent;
pub mod chains;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod ethereum;
pub mod llm;
pub mod server;
pub mod tokens;
pub mod tools;
pub mod transform;
pub mod units;

pub use agent::Agent;
pub use chains::{get_context, ChainContext};
pub use config::Config;
pub use tokens::{TokenRecord, TokenRegistry};
