use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::ApiError;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::InputError => StatusCode::BAD_REQUEST,
            ApiError::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RequestBody(status_code, _) => *status_code,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };

        (
            status_code,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_api_response(self, task: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_api_response(self, task: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            let message = format!("{:#}", e);
            error!(task = task, error = %message);
            ApiError::UpstreamError(message)
        })
    }
}
