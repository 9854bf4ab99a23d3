use crate::agent::Agent;
use crate::llm::ChatMessage;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared server state. The history lock is held for a whole agent run, so
/// concurrent chats are serialized.
pub struct AppState {
    pub agent: Agent,
    pub history: Mutex<Vec<ChatMessage>>,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            history: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WalletQuery {
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatQuery {
    message: String,
}

struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Chat request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("{:#}", self.0) })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/wallet", get(wallet))
        .route("/chat", get(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "API is working" }))
}

async fn wallet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WalletQuery>,
) -> Json<serde_json::Value> {
    let address = query
        .address
        .unwrap_or_else(|| state.agent.context().client.signer_address.to_string());
    Json(json!({ "data": address }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!(message = %query.message, "Message received");

    let mut history = state.history.lock().await;
    let mut pending = history.clone();
    pending.push(ChatMessage::user(query.message));

    let response = state.agent.run(&pending).await.map_err(ApiError)?;
    pending.extend(response.iter().cloned());
    *history = pending;

    Ok(Json(json!({ "result": "Processed", "response": response })))
}
