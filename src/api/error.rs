use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::SolverError;

/// `{success:false, error:<message>, stack?:<dev-only>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub stack: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            stack: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
            stack: self.stack,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps the domain error taxonomy onto façade status codes.
impl From<SolverError> for ApiError {
    fn from(err: SolverError) -> Self {
        let status = match &err {
            SolverError::InvalidArgument(_) | SolverError::Parse(_) => StatusCode::BAD_REQUEST,
            SolverError::NotFound(_) => StatusCode::NOT_FOUND,
            SolverError::NoPool | SolverError::NoLiquidity | SolverError::InsufficientBalance(_) | SolverError::NoFeeCoin => {
                StatusCode::BAD_REQUEST
            }
            SolverError::Reverted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SolverError::Transient(_) | SolverError::Rpc(_) | SolverError::Http(_) | SolverError::WebSocket(_) | SolverError::Io(_) => {
                StatusCode::BAD_GATEWAY
            }
            SolverError::Fatal(_) | SolverError::Config(_) | SolverError::Env(_) | SolverError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        ApiError::new(status, err.to_string())
    }
}
