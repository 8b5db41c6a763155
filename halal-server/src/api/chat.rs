use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use super::{ApiError, UserId};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

pub async fn chat(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::debug!(user_id, "Chat message");
    let text = state.orchestrator().chat(&payload.message).await?;
    Ok(Json(ChatResponse { text }))
}
