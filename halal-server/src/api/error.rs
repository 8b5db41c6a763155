use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use halal_types::ClassifyError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

/// Handler error. Only the code and a generic message reach the client.
#[derive(Debug)]
pub enum ApiError {
    /// No caller identity on the request
    Unauthenticated,
    Classify(ClassifyError),
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        Self::Classify(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Classify(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::Unauthenticated => ErrorResponse {
                error: "UNAUTHENTICATED",
                message: "Sign in to continue.",
                retryable: false,
            },
            Self::Classify(err) => ErrorResponse {
                error: err.code(),
                message: err.user_message(),
                retryable: err.is_retryable(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Classify(err) = &self {
            if err.http_status_code() >= 500 {
                tracing::warn!("Request failed: {}", err);
            }
        }
        (self.status(), Json(self.body())).into_response()
    }
}
