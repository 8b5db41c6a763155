use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

/// Base64 inflates photos by a third; leave room above the decoded image cap.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    let app = Router::new()
        .nest("/api", api::router())
        .route("/health", get(health_check))
        .with_state(state);

    // SPA fallback: unknown paths serve index.html
    let app = match static_dir {
        Some(dir) => {
            let index_path = format!("{}/index.html", dir);
            app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            )
        },
        None => app,
    };

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "credentials": state.credential_count(),
        })),
    )
}
