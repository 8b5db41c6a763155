use axum::{extract::State, response::Json};
use halal_types::DailyInsight;

use crate::state::AppState;

pub async fn daily_insight(State(state): State<AppState>) -> Json<DailyInsight> {
    Json(state.orchestrator().daily_insight().await)
}
