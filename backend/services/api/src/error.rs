use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nextup_common::error::NextupError;

pub struct ApiError(pub NextupError);

impl From<NextupError> for ApiError {
    fn from(err: NextupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            NextupError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            NextupError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            NextupError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
