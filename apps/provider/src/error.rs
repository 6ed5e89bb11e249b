use authress_core::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Plugin RPC error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// RPC error wrapper around core application errors.
#[derive(Debug)]
pub struct PluginError(pub AppError);

impl From<AppError> for PluginError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for PluginError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::PRECONDITION_FAILED,
            AppError::Remote { .. } | AppError::Decode { .. } | AppError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard plugin RPC result type.
pub type PluginResult<T> = Result<T, PluginError>;
