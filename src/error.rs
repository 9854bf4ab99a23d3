use thiserror::Error;

/// Errors raised while loading the token file.
#[derive(Debug, Error)]
pub enum TokenRegistryError {
    #[error("failed to read token file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed token file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token {address} is listed under chain {group} but declares chain {declared}")]
    ChainMismatch {
        group: String,
        address: String,
        declared: String,
    },
}

/// Errors raised by the chain context table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainContextError {
    #[error("unsupported chain id: {0}")]
    UnsupportedChain(String),

    #[error("requested chain {requested} but the RPC node is on chain {connected}")]
    WrongNetwork { requested: String, connected: u64 },
}
