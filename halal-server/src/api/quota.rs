use axum::{extract::State, response::Json};
use halal_types::QuotaStatus;

use super::{ApiError, UserId};
use crate::state::AppState;

pub async fn quota_status(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<QuotaStatus>, ApiError> {
    Ok(Json(state.orchestrator().quota_status(&user_id).await?))
}
