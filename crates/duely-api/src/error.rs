use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use duely_storage::StorageError;

/// Any request failure, rendered as a JSON `{"error": ...}` response
#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    /// The request was refused before reaching a handler: bad path or body
    Rejected { status: StatusCode, message: String },
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::InvalidReference(_) | StorageError::Invalid(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(
                StorageError::Sqlite(_) | StorageError::Poisoned | StorageError::Background(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Storage(err) => err.to_string(),
            Self::Rejected { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            log::error!("Request failed: {message}");
        } else {
            log::debug!("Request rejected ({status}): {message}");
        }

        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}
