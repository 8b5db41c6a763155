use axum::{extract::State, response::Json};
use halal_core::orchestrator::photo::decode_image;
use halal_types::{BarcodeOutcome, ClassificationVerdict, VerdictStatus};
use serde::{Deserialize, Serialize};

use super::{ApiError, UserId};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BarcodeRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct PhotoRequest {
    /// Base64 or `data:` URL
    pub image: String,
}

#[derive(Deserialize)]
pub struct TextRequest {
    pub ingredients: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_ingredients: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_photo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VerdictStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_ingredients: Option<Vec<String>>,
}

impl From<BarcodeOutcome> for BarcodeResponse {
    fn from(outcome: BarcodeOutcome) -> Self {
        let empty = Self {
            found: false,
            has_ingredients: None,
            needs_photo: None,
            name: None,
            status: None,
            reason: None,
            flagged_ingredients: None,
        };
        match outcome {
            BarcodeOutcome::NotFound => empty,
            BarcodeOutcome::NeedsPhoto { name } => Self {
                found: true,
                has_ingredients: Some(false),
                needs_photo: Some(true),
                name: Some(name),
                ..empty
            },
            BarcodeOutcome::Classified { name, verdict } => Self {
                found: true,
                has_ingredients: Some(true),
                name: Some(name),
                status: Some(verdict.status),
                reason: Some(verdict.reason),
                flagged_ingredients: Some(verdict.flagged_ingredients),
                ..empty
            },
        }
    }
}

pub async fn classify_barcode(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<BarcodeRequest>,
) -> Result<Json<BarcodeResponse>, ApiError> {
    let outcome = state.orchestrator().classify_by_barcode(&user_id, &payload.code).await?;
    Ok(Json(outcome.into()))
}

pub async fn classify_photo(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<PhotoRequest>,
) -> Result<Json<ClassificationVerdict>, ApiError> {
    let image = decode_image(&payload.image)?;
    let verdict = state.orchestrator().classify_by_photo(&user_id, image).await?;
    Ok(Json(verdict))
}

pub async fn classify_text(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<TextRequest>,
) -> Result<Json<ClassificationVerdict>, ApiError> {
    let verdict = state.orchestrator().classify_by_text(&user_id, &payload.ingredients).await?;
    Ok(Json(verdict))
}
