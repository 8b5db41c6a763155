//! API Routes
//!
//! REST endpoints for the web UI. Classification endpoints identify the caller
//! by the `X-User-Id` header, which the fronting auth layer sets.

mod chat;
mod classify;
mod daily;
mod error;
mod quota;
mod user;


use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub use error::ApiError;
pub use user::{UserId, USER_ID_HEADER};

pub fn router() -> Router<AppState> {
    Router::new()
        // Classification (metered)
        .route("/barcode", post(classify::classify_barcode))
        .route("/photo", post(classify::classify_photo))
        .route("/text", post(classify::classify_text))
        // Advisory (not metered)
        .route("/chat", post(chat::chat))
        .route("/daily", get(daily::daily_insight))
        // Usage
        .route("/quota", get(quota::quota_status))
}
