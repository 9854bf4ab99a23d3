//! In-process JSON-RPC node. Answers the calls the write tools make, records
//! every raw transaction and reports each one as mined successfully.

use alloy::{
    consensus::{TxEnvelope, TxLegacy},
    eips::eip2718::Decodable2718,
    primitives::{keccak256, Bytes, U256},
};
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Timestamp of the only block the node knows about.
pub const BLOCK_TIMESTAMP: u64 = 1_700_000_000;
pub const GAS_PRICE: u128 = 1_000_000_000;

const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Default)]
struct NodeLog {
    methods: Vec<String>,
    raw_transactions: Vec<Bytes>,
}

struct NodeState {
    chain_id: u64,
    allowance: U256,
    log: Mutex<NodeLog>,
}

pub struct MockNode {
    pub url: String,
    state: Arc<NodeState>,
}

impl MockNode {
    /// `allowance` is returned for every `eth_call`.
    pub async fn start(chain_id: u64, allowance: U256) -> Self {
        let state = Arc::new(NodeState {
            chain_id,
            allowance,
            log: Mutex::default(),
        });
        let app = Router::new()
            .route("/", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}", listener.local_addr().expect("addr"));
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { url, state }
    }

    pub fn count(&self, method: &str) -> usize {
        let log = self.state.log.lock().unwrap();
        log.methods.iter().filter(|m| *m == method).count()
    }

    /// Broadcast transactions, in order.
    pub fn transactions(&self) -> Vec<TxLegacy> {
        let log = self.state.log.lock().unwrap();
        log.raw_transactions
            .iter()
            .map(|raw| match TxEnvelope::decode_2718(&mut raw.as_ref()).expect("raw tx") {
                TxEnvelope::Legacy(signed) => signed.tx().clone(),
                other => panic!("expected a legacy transaction, got {other:?}"),
            })
            .collect()
    }
}

async fn handle(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = &request["params"];

    let result = {
        let mut log = state.log.lock().unwrap();
        log.methods.push(method.clone());
        match method.as_str() {
            "eth_chainId" => json!(format!("0x{:x}", state.chain_id)),
            "eth_getTransactionCount" => json!("0x0"),
            "eth_gasPrice" => json!(format!("0x{:x}", GAS_PRICE)),
            "eth_blockNumber" => json!("0x1"),
            "eth_getBlockByNumber" => block(),
            "eth_call" => json!(format!("0x{}", hex::encode(state.allowance.to_be_bytes::<32>()))),
            "eth_sendRawTransaction" => {
                let raw: Bytes = serde_json::from_value(params[0].clone()).expect("raw tx param");
                let hash = keccak256(&raw);
                log.raw_transactions.push(raw);
                json!(hash)
            }
            "eth_getTransactionReceipt" => receipt(&params[0]),
            _ => Value::Null,
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }))
}

fn block() -> Value {
    json!({
        "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
        "parentHash": ZERO_HASH,
        "sha3Uncles": ZERO_HASH,
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": ZERO_HASH,
        "transactionsRoot": ZERO_HASH,
        "receiptsRoot": ZERO_HASH,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x0",
        "number": "0x1",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "timestamp": format!("0x{:x}", BLOCK_TIMESTAMP),
        "extraData": "0x",
        "mixHash": ZERO_HASH,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x7",
        "uncles": [],
        "transactions": []
    })
}

fn receipt(tx_hash: &Value) -> Value {
    json!({
        "type": "0x0",
        "status": "0x1",
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": format!("0x{:x}", GAS_PRICE),
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": null,
        "contractAddress": null
    })
}
