use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::error::ServiceError;

/// Client mistakes and unmet preconditions are 400; everything else is a 500
/// carrying the raw error text.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::debug!("Rejected request: {}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
